use std::str::FromStr;

/// A 1-based page selection such as `1,3-5`, parsed from the command line.
///
/// Syntax is checked when parsing; bounds are checked against a document in
/// [`PageRange::indices`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRange {
    spans: Vec<(usize, usize)>,
}

fn page_number(text: &str) -> Result<usize, String> {
    let text = text.trim();
    let page: usize = text
        .parse()
        .map_err(|_| format!("invalid page number: '{text}'"))?;
    if page == 0 {
        return Err("page 0 is invalid (pages start at 1)".to_string());
    }
    Ok(page)
}

impl FromStr for PageRange {
    type Err = String;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let mut spans = Vec::new();
        for part in input.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let span = match part.split_once('-') {
                Some((start, end)) => (page_number(start)?, page_number(end)?),
                None => {
                    let page = page_number(part)?;
                    (page, page)
                }
            };
            if span.0 > span.1 {
                return Err(format!("descending page range: '{part}'"));
            }
            spans.push(span);
        }
        if spans.is_empty() {
            return Err("empty page range".to_string());
        }
        Ok(Self { spans })
    }
}

impl PageRange {
    /// Sorted, deduplicated 0-based page indices.
    pub fn indices(&self, page_count: usize) -> Result<Vec<usize>, String> {
        let mut pages = Vec::new();
        for &(start, end) in &self.spans {
            if end > page_count {
                return Err(format!(
                    "page {end} exceeds document page count ({page_count})"
                ));
            }
            pages.extend(start - 1..end);
        }
        pages.sort_unstable();
        pages.dedup();
        Ok(pages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn indices(input: &str, count: usize) -> Result<Vec<usize>, String> {
        input.parse::<PageRange>()?.indices(count)
    }

    #[test]
    fn single_page() {
        assert_eq!(indices("1", 5).unwrap(), vec![0]);
        assert_eq!(indices("3", 5).unwrap(), vec![2]);
    }

    #[test]
    fn mixed_ranges() {
        assert_eq!(
            indices("1-3,7,10-12", 12).unwrap(),
            vec![0, 1, 2, 6, 9, 10, 11]
        );
    }

    #[test]
    fn duplicates_and_whitespace() {
        assert_eq!(indices(" 2 , 1-2 ", 5).unwrap(), vec![0, 1]);
    }

    #[test]
    fn syntax_errors_fail_at_parse() {
        assert!("0".parse::<PageRange>().unwrap_err().contains("invalid"));
        assert!("a-3".parse::<PageRange>().unwrap_err().contains("invalid page number"));
        assert!("4-2".parse::<PageRange>().unwrap_err().contains("descending"));
        assert!(",".parse::<PageRange>().is_err());
    }

    #[test]
    fn page_exceeds_count() {
        let range: PageRange = "2-6".parse().unwrap();
        assert!(range.indices(5).unwrap_err().contains("exceeds"));
        assert_eq!(range.indices(6).unwrap().len(), 5);
    }
}
