//! Document text extraction
//!
//! This module converts raw uploaded documents into a single normalized
//! UTF-8 text string:
//! - Plain text (UTF-8 pass-through)
//! - Markdown (syntax-stripped rendering)
//! - PDF (feature `pdf`)

mod markdown;

pub use markdown::*;

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;

/// Supported document formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentFormat {
    Plain,
    Pdf,
    Markdown,
}

impl std::fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DocumentFormat::Plain => write!(f, "plain"),
            DocumentFormat::Pdf => write!(f, "pdf"),
            DocumentFormat::Markdown => write!(f, "markdown"),
        }
    }
}

impl FromStr for DocumentFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "plain" | "txt" | "text" => Ok(DocumentFormat::Plain),
            "pdf" => Ok(DocumentFormat::Pdf),
            "markdown" | "md" => Ok(DocumentFormat::Markdown),
            other => Err(Error::UnsupportedFormat(other.to_string())),
        }
    }
}

impl DocumentFormat {
    /// Detect format from a file extension
    pub fn from_extension(path: &Path) -> Result<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("txt") | Some("text") => Ok(DocumentFormat::Plain),
            Some("md") | Some("markdown") | Some("mdx") => Ok(DocumentFormat::Markdown),
            Some("pdf") => Ok(DocumentFormat::Pdf),
            Some(other) => Err(Error::UnsupportedFormat(other.to_string())),
            None => Err(Error::UnsupportedFormat(format!(
                "no extension on {}",
                path.display()
            ))),
        }
    }
}

/// Extract normalized text from raw document bytes
pub fn extract_text(raw: &[u8], format: DocumentFormat) -> Result<String> {
    match format {
        DocumentFormat::Plain => decode_utf8(raw),
        DocumentFormat::Markdown => {
            let source = decode_utf8(raw)?;
            Ok(markdown_to_text(&source))
        }
        DocumentFormat::Pdf => extract_pdf(raw),
    }
}

fn decode_utf8(raw: &[u8]) -> Result<String> {
    String::from_utf8(raw.to_vec())
        .map_err(|e| Error::Extraction(format!("Invalid UTF-8: {}", e)))
}

#[cfg(feature = "pdf")]
fn extract_pdf(raw: &[u8]) -> Result<String> {
    let text = pdf_extract::extract_text_from_mem(raw)
        .map_err(|e| Error::Extraction(format!("PDF extraction failed: {}", e)))?;
    // Per-page text arrives newline-separated; collapse to single separators
    Ok(normalize_whitespace(&text))
}

#[cfg(not(feature = "pdf"))]
fn extract_pdf(_raw: &[u8]) -> Result<String> {
    Err(Error::UnsupportedFormat(
        "pdf (crate built without the 'pdf' feature)".to_string(),
    ))
}

/// Normalize whitespace: collapse runs into a single space, keep paragraph
/// breaks as double newlines
pub fn normalize_whitespace(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut last_was_whitespace = true;
    let mut newline_count = 0;

    for c in text.chars() {
        if c.is_whitespace() {
            if c == '\n' {
                newline_count += 1;
            }
            last_was_whitespace = true;
        } else {
            if last_was_whitespace && !result.is_empty() {
                if newline_count >= 2 {
                    result.push_str("\n\n");
                } else {
                    result.push(' ');
                }
            }
            newline_count = 0;
            result.push(c);
            last_was_whitespace = false;
        }
    }

    result.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_extension() {
        assert_eq!(
            DocumentFormat::from_extension(Path::new("notes.txt")).unwrap(),
            DocumentFormat::Plain
        );
        assert_eq!(
            DocumentFormat::from_extension(Path::new("guide.md")).unwrap(),
            DocumentFormat::Markdown
        );
        assert_eq!(
            DocumentFormat::from_extension(Path::new("manual.pdf")).unwrap(),
            DocumentFormat::Pdf
        );
    }

    #[test]
    fn test_unsupported_extension_is_named() {
        let err = DocumentFormat::from_extension(Path::new("logo.png")).unwrap_err();
        match err {
            Error::UnsupportedFormat(ext) => assert_eq!(ext, "png"),
            other => panic!("expected UnsupportedFormat, got {:?}", other),
        }
    }

    #[test]
    fn test_plain_passthrough() {
        let text = extract_text(b"Hello world.\n\nSecond paragraph.", DocumentFormat::Plain)
            .unwrap();
        assert_eq!(text, "Hello world.\n\nSecond paragraph.");
    }

    #[test]
    fn test_plain_invalid_utf8_fails() {
        let err = extract_text(&[0xff, 0xfe, 0x00], DocumentFormat::Plain).unwrap_err();
        assert!(matches!(err, Error::Extraction(_)));
    }

    #[test]
    fn test_normalize_whitespace() {
        let input = "Hello   world\n\n\n\ntest";
        assert_eq!(normalize_whitespace(input), "Hello world\n\ntest");
    }
}
