//! OCR types
//!
//! Serde mirror of the Vision-style `fullTextAnnotation` hierarchy:
//! pages → blocks → paragraphs → words → symbols, with a bounding polygon
//! per word. Every field defaults when absent, since the wire format omits
//! zero-valued vertex coordinates and empty collections.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Full text annotation for one document
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TextAnnotation {
    pub pages: Vec<Page>,
    /// Whole-document plain text as reported by the OCR service. Unused by
    /// the body-text filter, which works from the hierarchy instead.
    pub text: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Page {
    pub blocks: Vec<Block>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Block {
    pub paragraphs: Vec<Paragraph>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Paragraph {
    pub words: Vec<Word>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Word {
    pub symbols: Vec<Symbol>,
    pub bounding_box: BoundingPoly,
}

/// A single recognized character
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Symbol {
    pub text: String,
}

/// Possibly non-axis-aligned quadrilateral around a word's glyphs
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BoundingPoly {
    pub vertices: Vec<Vertex>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Vertex {
    pub x: f64,
    pub y: f64,
}

/// OCR error types
#[derive(Debug, Error)]
pub enum OcrError {
    #[error("OCR request failed: {0}")]
    Http(String),

    #[error("OCR API error: {0}")]
    Api(String),

    #[error("Invalid OCR response: {0}")]
    InvalidResponse(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn omitted_vertex_coordinates_default_to_zero() {
        let annotation: TextAnnotation = serde_json::from_str(
            r#"{
                "pages": [{
                    "blocks": [{
                        "paragraphs": [{
                            "words": [{
                                "symbols": [{"text": "H"}, {"text": "i"}],
                                "boundingBox": {
                                    "vertices": [{}, {"x": 20}, {"x": 20, "y": 12}, {"y": 12}]
                                }
                            }]
                        }]
                    }]
                }],
                "text": "Hi"
            }"#,
        )
        .unwrap();

        let word = &annotation.pages[0].blocks[0].paragraphs[0].words[0];
        assert_eq!(word.symbols.len(), 2);
        assert_eq!(word.bounding_box.vertices[0].x, 0.0);
        assert_eq!(word.bounding_box.vertices[0].y, 0.0);
        assert_eq!(word.bounding_box.vertices[2].y, 12.0);
    }

    #[test]
    fn missing_fields_default_to_empty() {
        let annotation: TextAnnotation = serde_json::from_str("{}").unwrap();
        assert!(annotation.pages.is_empty());
        assert!(annotation.text.is_empty());
    }
}
