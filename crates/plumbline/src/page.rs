//! Page type for accessing and analysing the content of one document page.

use std::sync::OnceLock;

use plumbline_core::{
    BBox, Char, Curve, Edge, Line, PageObject, Rect, Result, SearchMatch, SearchOptions, Table, TableFinder,
    TableSettings, TableText, TextOptions, Word, WordExtractor, WordOptions, derive_edges,
    extract_text, search_chars,
};
use tracing::trace;

use crate::cropped_page::{CroppedPage, FilterMode};

/// Derived data computed at most once per page.
#[derive(Debug, Default)]
pub(crate) struct PageCache {
    edges: OnceLock<Vec<Edge>>,
    words: OnceLock<Vec<Word>>,
}

impl PageCache {
    pub(crate) fn edges(&self, lines: &[Line], rects: &[Rect], curves: &[Curve]) -> &[Edge] {
        self.edges.get_or_init(|| {
            let edges = derive_edges(lines, rects, curves);
            trace!(edges = edges.len(), "cached page edges");
            edges
        })
    }

    pub(crate) fn words(&self, chars: &[Char]) -> &[Word] {
        self.words.get_or_init(|| {
            let words = WordExtractor::extract(chars, &WordOptions::default());
            trace!(words = words.len(), "cached page words");
            words
        })
    }
}

/// Read access to page content, plus every analysis built on top of it.
///
/// Implemented by [`Page`] and by the [`CroppedPage`] views derived from it,
/// so cropping composes: a cropped page can be cropped again.
pub trait PageData {
    /// 0-based index of the page in its document.
    fn page_number(&self) -> usize;

    /// Region of the page this value covers, in page coordinates.
    fn bbox(&self) -> BBox;

    fn chars(&self) -> &[Char];
    fn lines(&self) -> &[Line];
    fn rects(&self) -> &[Rect];
    fn curves(&self) -> &[Curve];

    /// Edges derived from all lines, rect sides and curve segments. Memoized.
    fn edges(&self) -> &[Edge];

    /// Words extracted with [`WordOptions::default`]. Memoized.
    fn words(&self) -> &[Word];

    fn width(&self) -> f64 {
        self.bbox().width()
    }

    fn height(&self) -> f64 {
        self.bbox().height()
    }

    /// All primitives as tagged objects: chars, then lines, rects and curves.
    fn objects(&self) -> Vec<PageObject> {
        let chars = self.chars().iter().cloned().map(PageObject::from);
        let lines = self.lines().iter().cloned().map(PageObject::from);
        let rects = self.rects().iter().cloned().map(PageObject::from);
        let curves = self.curves().iter().cloned().map(PageObject::from);
        chars.chain(lines).chain(rects).chain(curves).collect()
    }

    /// Extract words, reusing the memoized list when `options` are the defaults.
    fn extract_words(&self, options: &WordOptions) -> Vec<Word> {
        if *options == WordOptions::default() {
            self.words().to_vec()
        } else {
            WordExtractor::extract(self.chars(), options)
        }
    }

    /// Text of the page. In layout mode the grid is anchored at this page's
    /// bbox, which also sets the padded width and height unless given.
    fn extract_text(&self, options: &TextOptions) -> String {
        extract_text(self.chars(), &anchored(options, &self.bbox()))
    }

    /// Search the page text for `pattern`.
    fn search(
        &self,
        pattern: &str,
        options: &SearchOptions,
        text_options: &TextOptions,
    ) -> Result<Vec<SearchMatch>> {
        search_chars(
            self.chars(),
            pattern,
            options,
            &anchored(text_options, &self.bbox()),
        )
    }

    /// Table finder over this page's chars and edges, for inspecting the
    /// intermediate edges, intersections and cells.
    fn table_finder(&self, settings: &TableSettings) -> Result<TableFinder> {
        TableFinder::new(self.chars(), self.edges(), self.bbox(), settings)
    }

    fn find_tables(&self, settings: &TableSettings) -> Result<Vec<Table>> {
        Ok(self.table_finder(settings)?.find_tables())
    }

    /// The largest table, then topmost, then leftmost.
    fn find_table(&self, settings: &TableSettings) -> Result<Option<Table>> {
        Ok(self.table_finder(settings)?.find_table())
    }

    /// Cell text of every table on the page.
    fn extract_tables(&self, settings: &TableSettings) -> Result<Vec<TableText>> {
        let finder = self.table_finder(settings)?;
        let text_options = finder.settings().cell_text_options();
        Ok(finder
            .find_tables()
            .iter()
            .map(|t| t.extract(self.chars(), &text_options))
            .collect())
    }

    fn extract_table(&self, settings: &TableSettings) -> Result<Option<TableText>> {
        let finder = self.table_finder(settings)?;
        let text_options = finder.settings().cell_text_options();
        Ok(finder
            .find_table()
            .map(|t| t.extract(self.chars(), &text_options)))
    }

    /// Clip every object to `bbox`. Objects keep page coordinates.
    ///
    /// Fails when `bbox` has zero area or is not inside this page's bbox.
    fn crop(&self, bbox: BBox) -> Result<CroppedPage>
    where
        Self: Sized,
    {
        CroppedPage::from_parent(self, bbox, FilterMode::Crop)
    }

    /// Keep only objects lying entirely inside `bbox`.
    fn within_bbox(&self, bbox: BBox) -> Result<CroppedPage>
    where
        Self: Sized,
    {
        CroppedPage::from_parent(self, bbox, FilterMode::Within)
    }

    /// Keep only objects not touching `bbox`. The page bbox is unchanged.
    fn outside_bbox(&self, bbox: BBox) -> Result<CroppedPage>
    where
        Self: Sized,
    {
        CroppedPage::from_parent(self, bbox, FilterMode::Outside)
    }
}

fn anchored(options: &TextOptions, bbox: &BBox) -> TextOptions {
    if !options.layout {
        return options.clone();
    }
    TextOptions {
        x_shift: options.x_shift + bbox.x0,
        y_shift: options.y_shift + bbox.top,
        layout_width: options.layout_width.or(Some(bbox.width())),
        layout_height: options.layout_height.or(Some(bbox.height())),
        ..options.clone()
    }
}

/// A single page of a document.
///
/// Holds the page's characters and painted shapes as supplied by a parser,
/// in top-left coordinates. Derived edges and default words are computed on
/// first use and cached.
#[derive(Debug)]
pub struct Page {
    /// Page index (0-based).
    page_number: usize,
    /// Page width in points.
    width: f64,
    /// Page height in points.
    height: f64,
    chars: Vec<Char>,
    lines: Vec<Line>,
    rects: Vec<Rect>,
    curves: Vec<Curve>,
    cache: PageCache,
}

impl Page {
    /// Create a page holding only characters.
    pub fn new(page_number: usize, width: f64, height: f64, chars: Vec<Char>) -> Self {
        Self::with_geometry(
            page_number,
            width,
            height,
            chars,
            Vec::new(),
            Vec::new(),
            Vec::new(),
        )
    }

    /// Create a page with characters and geometry.
    pub fn with_geometry(
        page_number: usize,
        width: f64,
        height: f64,
        chars: Vec<Char>,
        lines: Vec<Line>,
        rects: Vec<Rect>,
        curves: Vec<Curve>,
    ) -> Self {
        Self {
            page_number,
            width,
            height,
            chars,
            lines,
            rects,
            curves,
            cache: PageCache::default(),
        }
    }
}

impl PageData for Page {
    fn page_number(&self) -> usize {
        self.page_number
    }

    fn bbox(&self) -> BBox {
        BBox::new(0.0, 0.0, self.width, self.height)
    }

    fn chars(&self) -> &[Char] {
        &self.chars
    }

    fn lines(&self) -> &[Line] {
        &self.lines
    }

    fn rects(&self) -> &[Rect] {
        &self.rects
    }

    fn curves(&self) -> &[Curve] {
        &self.curves
    }

    fn edges(&self) -> &[Edge] {
        self.cache.edges(&self.lines, &self.rects, &self.curves)
    }

    fn words(&self) -> &[Word] {
        self.cache.words(&self.chars)
    }
}
