mod cli;
mod page_range;
mod search_cmd;
mod shared;
mod tables_cmd;
mod text_cmd;
mod words_cmd;

use clap::Parser;
use cli::{Cli, Commands};
use tracing_subscriber::EnvFilter;

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "plumbline=warn",
        1 => "plumbline=debug",
        _ => "plumbline=trace",
    };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Text {
            ref file,
            ref pages,
            layout,
            format,
        } => text_cmd::run(file, pages.as_ref(), layout, format),
        Commands::Words {
            ref file,
            ref pages,
            x_tolerance,
            y_tolerance,
            ref split_at_punctuation,
            format,
        } => words_cmd::run(
            file,
            pages.as_ref(),
            x_tolerance,
            y_tolerance,
            split_at_punctuation.as_deref(),
            format,
        ),
        Commands::Tables {
            ref file,
            ref pages,
            ref settings,
            best,
            format,
        } => tables_cmd::run(file, pages.as_ref(), settings, best, format),
        Commands::Search {
            ref file,
            ref pattern,
            ref pages,
            literal,
            ignore_case,
            layout,
            format,
        } => search_cmd::run(
            file,
            pattern,
            pages.as_ref(),
            search_cmd::SearchFlags {
                literal,
                ignore_case,
                layout,
            },
            format,
        ),
    };

    if let Err(code) = result {
        std::process::exit(code);
    }
}
