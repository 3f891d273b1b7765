//! Layout parser
//!
//! Flattens the four-level OCR hierarchy (page → block → paragraph → word)
//! into an ordered sequence of word records. Reading order is exactly the
//! traversal order of the annotation; nothing is reordered or deduplicated.

use crate::ocr::types::{BoundingPoly, TextAnnotation};

/// A word observed by OCR, with the vertical extent of its bounding polygon.
///
/// The height is `max(vertex.y) - min(vertex.y)`: a bounding-box
/// approximation of glyph size, not a font metric. It is consistent for
/// words rendered at the same size under a not-too-skewed scan, which is all
/// the downstream classifier needs.
#[derive(Debug, Clone, PartialEq)]
pub struct WordRecord {
    pub text: String,
    pub height: f64,
}

/// Flatten an OCR annotation into word records in document reading order.
///
/// Pure structural traversal with no error conditions: an empty annotation
/// yields an empty vector. Structurally odd words (no symbols, fewer than
/// two polygon vertices) degrade to empty text or height 0 and are still
/// emitted; height-based filtering happens downstream, never here.
pub fn flatten(annotation: &TextAnnotation) -> Vec<WordRecord> {
    let mut records = Vec::new();
    for page in &annotation.pages {
        for block in &page.blocks {
            for paragraph in &block.paragraphs {
                for word in &paragraph.words {
                    let text: String = word.symbols.iter().map(|s| s.text.as_str()).collect();
                    records.push(WordRecord {
                        text,
                        height: polygon_height(&word.bounding_box),
                    });
                }
            }
        }
    }
    records
}

fn polygon_height(polygon: &BoundingPoly) -> f64 {
    if polygon.vertices.len() < 2 {
        return 0.0;
    }
    let mut min_y = f64::INFINITY;
    let mut max_y = f64::NEG_INFINITY;
    for vertex in &polygon.vertices {
        min_y = min_y.min(vertex.y);
        max_y = max_y.max(vertex.y);
    }
    max_y - min_y
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ocr::types::{Block, Page, Paragraph, Symbol, Vertex, Word};

    fn word(text: &str, height: f64) -> Word {
        Word {
            symbols: text
                .chars()
                .map(|c| Symbol {
                    text: c.to_string(),
                })
                .collect(),
            bounding_box: BoundingPoly {
                vertices: vec![
                    Vertex { x: 0.0, y: 0.0 },
                    Vertex { x: 40.0, y: 0.0 },
                    Vertex { x: 40.0, y: height },
                    Vertex { x: 0.0, y: height },
                ],
            },
        }
    }

    fn page_with(words: Vec<Word>) -> Page {
        Page {
            blocks: vec![Block {
                paragraphs: vec![Paragraph { words }],
            }],
        }
    }

    #[test]
    fn empty_annotation_yields_no_records() {
        assert!(flatten(&TextAnnotation::default()).is_empty());
    }

    #[test]
    fn preserves_reading_order_across_pages() {
        let annotation = TextAnnotation {
            pages: vec![
                page_with(vec![word("Alpha", 10.0)]),
                page_with(vec![word("Beta", 50.0)]),
            ],
            text: String::new(),
        };

        let records = flatten(&annotation);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].text, "Alpha");
        assert_eq!(records[0].height, 10.0);
        assert_eq!(records[1].text, "Beta");
        assert_eq!(records[1].height, 50.0);
    }

    #[test]
    fn concatenates_symbols_without_separator() {
        let records = flatten(&TextAnnotation {
            pages: vec![page_with(vec![word("Hello", 12.0)])],
            text: String::new(),
        });
        assert_eq!(records[0].text, "Hello");
    }

    #[test]
    fn flattening_is_idempotent() {
        let annotation = TextAnnotation {
            pages: vec![page_with(vec![word("Alpha", 10.0), word("Beta", 50.0)])],
            text: String::new(),
        };
        assert_eq!(flatten(&annotation), flatten(&annotation));
    }

    #[test]
    fn degenerate_bounding_box_yields_height_zero() {
        let mut w = word("x", 0.0);
        w.bounding_box.vertices = vec![Vertex { x: 3.0, y: 7.0 }];
        let records = flatten(&TextAnnotation {
            pages: vec![page_with(vec![w])],
            text: String::new(),
        });
        // still emitted, not filtered here
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].height, 0.0);
    }

    #[test]
    fn word_without_symbols_yields_empty_text() {
        let mut w = word("", 9.0);
        w.symbols.clear();
        let records = flatten(&TextAnnotation {
            pages: vec![page_with(vec![w])],
            text: String::new(),
        });
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].text, "");
        assert_eq!(records[0].height, 9.0);
    }
}
