//! CroppedPage: a spatially filtered view of a page.
//!
//! Created by [`PageData::crop`], [`PageData::within_bbox`] or
//! [`PageData::outside_bbox`]. Objects keep their page coordinates, so
//! boxes reported by a cropped page can be compared directly with the
//! parent's.

use plumbline_core::{
    BBox, Char, Curve, Edge, HasBBox, Line, PlumbError, Rect, Result, Word, crop_to_bbox,
    outside_bbox, within_bbox,
};
use tracing::debug;

use crate::page::{PageCache, PageData};

/// How objects are selected against the filter bbox.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FilterMode {
    /// Overlapping objects, clipped to the bbox.
    Crop,
    /// Objects fully contained in the bbox.
    Within,
    /// Objects with no overlap.
    Outside,
}

impl FilterMode {
    fn select<T: HasBBox + Clone>(self, objects: &[T], bbox: &BBox) -> Result<Vec<T>> {
        match self {
            FilterMode::Crop => crop_to_bbox(objects, bbox),
            FilterMode::Within => Ok(within_bbox(objects, bbox)),
            FilterMode::Outside => Ok(outside_bbox(objects, bbox)),
        }
    }
}

/// A spatially filtered view of a page.
#[derive(Debug)]
pub struct CroppedPage {
    page_number: usize,
    bbox: BBox,
    chars: Vec<Char>,
    lines: Vec<Line>,
    rects: Vec<Rect>,
    curves: Vec<Curve>,
    cache: PageCache,
}

impl CroppedPage {
    pub(crate) fn from_parent<P: PageData + ?Sized>(
        parent: &P,
        bbox: BBox,
        mode: FilterMode,
    ) -> Result<Self> {
        bbox.check_non_degenerate()?;
        let parent_bbox = parent.bbox();
        if mode != FilterMode::Outside && !parent_bbox.contains(&bbox) {
            return Err(PlumbError::InvalidGeometry(format!(
                "bounding box {bbox} is not within the parent bounding box {parent_bbox}"
            )));
        }

        let page = Self {
            page_number: parent.page_number(),
            bbox: if mode == FilterMode::Outside {
                parent_bbox
            } else {
                bbox
            },
            chars: mode.select(parent.chars(), &bbox)?,
            lines: mode.select(parent.lines(), &bbox)?,
            rects: mode.select(parent.rects(), &bbox)?,
            curves: mode.select(parent.curves(), &bbox)?,
            cache: PageCache::default(),
        };
        debug!(
            ?mode,
            %bbox,
            chars = page.chars.len(),
            shapes = page.lines.len() + page.rects.len() + page.curves.len(),
            "filtered page"
        );
        Ok(page)
    }
}

impl PageData for CroppedPage {
    fn page_number(&self) -> usize {
        self.page_number
    }

    fn bbox(&self) -> BBox {
        self.bbox
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Page;
    use plumbline_core::{TableSettings, TextOptions, WordOptions};

    fn make_char(text: &str, x0: f64, top: f64, x1: f64, bottom: f64) -> Char {
        Char::new(text, BBox::new(x0, top, x1, bottom), "TestFont", 12.0)
    }

    fn sample_page() -> Page {
        let chars = vec![
            make_char("A", 10.0, 10.0, 20.0, 22.0),
            make_char("B", 100.0, 100.0, 110.0, 112.0),
            make_char("C", 195.0, 10.0, 205.0, 22.0),
        ];
        let lines = vec![
            Line::new(0.0, 50.0, 300.0, 50.0),
            Line::new(120.0, 150.0, 180.0, 150.0),
        ];
        let rects = vec![Rect::new(20.0, 60.0, 80.0, 90.0)];
        Page::with_geometry(0, 300.0, 300.0, chars, lines, rects, vec![])
    }

    fn texts(page: &impl PageData) -> Vec<&str> {
        page.chars().iter().map(|c| c.text.as_str()).collect()
    }

    #[test]
    fn test_crop_clips_and_keeps_page_coordinates() {
        let page = sample_page();
        let cropped = page.crop(BBox::new(0.0, 0.0, 200.0, 200.0)).unwrap();
        assert_eq!(cropped.bbox(), BBox::new(0.0, 0.0, 200.0, 200.0));
        assert_eq!(texts(&cropped), vec!["A", "B", "C"]);
        // "C" straddles the right boundary and is clipped
        assert_eq!(cropped.chars()[2].bbox, BBox::new(195.0, 10.0, 200.0, 22.0));
        assert_eq!(cropped.chars()[0].bbox, page.chars()[0].bbox);
        assert_eq!(cropped.lines()[0].x1, 200.0);
        assert_eq!(cropped.rects().len(), 1);
    }

    #[test]
    fn test_crop_rejects_bad_boxes() {
        let page = sample_page();
        assert!(matches!(
            page.crop(BBox::new(10.0, 10.0, 10.0, 50.0)),
            Err(PlumbError::InvalidGeometry(_))
        ));
        assert!(matches!(
            page.crop(BBox::new(100.0, 100.0, 400.0, 200.0)),
            Err(PlumbError::InvalidGeometry(_))
        ));
        assert!(page.within_bbox(BBox::new(-5.0, 0.0, 50.0, 50.0)).is_err());
    }

    #[test]
    fn test_within_bbox_strict_containment() {
        let page = sample_page();
        let within = page.within_bbox(BBox::new(0.0, 0.0, 200.0, 200.0)).unwrap();
        assert_eq!(texts(&within), vec!["A", "B"]);
        assert_eq!(within.lines().len(), 1);
        assert_eq!(within.lines()[0].x0, 120.0);
        assert_eq!(within.rects().len(), 1);
    }

    #[test]
    fn test_outside_bbox_keeps_parent_bbox() {
        let page = sample_page();
        let outside = page.outside_bbox(BBox::new(90.0, 90.0, 400.0, 400.0)).unwrap();
        assert_eq!(outside.bbox(), page.bbox());
        assert_eq!(texts(&outside), vec!["A", "C"]);
        assert!(outside.lines().iter().all(|l| l.top == 50.0));
    }

    #[test]
    fn test_chained_crop() {
        let page = sample_page();
        let first = page.crop(BBox::new(0.0, 0.0, 150.0, 150.0)).unwrap();
        let second = first.crop(BBox::new(50.0, 50.0, 150.0, 150.0)).unwrap();
        assert_eq!(texts(&second), vec!["B"]);
        assert!(first.crop(BBox::new(0.0, 0.0, 200.0, 200.0)).is_err());
    }

    #[test]
    fn test_cropped_page_words_and_text() {
        let page = sample_page();
        let left = page.crop(BBox::new(0.0, 0.0, 150.0, 300.0)).unwrap();
        let words = left.extract_words(&WordOptions::default());
        assert_eq!(words.len(), 2);
        assert_eq!(words[1].bbox, BBox::new(100.0, 100.0, 110.0, 112.0));
        assert_eq!(left.extract_text(&TextOptions::default()), "A\nB");
    }

    #[test]
    fn test_cropped_layout_is_anchored_at_crop_origin() {
        let page = sample_page();
        let region = page.crop(BBox::new(100.0, 100.0, 130.0, 113.0)).unwrap();
        let options = TextOptions {
            layout: true,
            ..TextOptions::default()
        };
        // 30 / 7.25 rounds to 4 columns; one row
        assert_eq!(region.extract_text(&options), "B   ");
    }

    #[test]
    fn test_cropped_page_edges_and_tables() {
        let page = sample_page();
        let cropped = page.crop(BBox::new(0.0, 55.0, 100.0, 100.0)).unwrap();
        assert_eq!(cropped.edges().len(), 4);
        let tables = cropped.find_tables(&TableSettings::default()).unwrap();
        assert!(tables.is_empty());
    }
}
