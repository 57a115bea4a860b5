//! Report rendering.
//!
//! Turning stored batches into a printable document is a narrow concern
//! behind the [`ReportRenderer`] trait, so alternative formats (PDF, HTML)
//! can be plugged in without touching the checker. The built-in
//! [`TextReportRenderer`] produces a plain-text document with one line per
//! link, batches separated by a blank line.

use crate::error::Result;
use crate::types::{BatchId, LinkInfo};
use std::fmt::Write;

/// Renders an ordered sequence of batches into a document byte stream.
///
/// Implementations must render batches in the given order and links in
/// their stored (submission) order.
pub trait ReportRenderer: Send + Sync {
    /// MIME type of the rendered document
    fn content_type(&self) -> &'static str;

    /// Suggested download filename for the rendered document
    fn filename(&self) -> &'static str;

    /// Render the batches into document bytes
    fn render(&self, batches: &[(BatchId, Vec<LinkInfo>)]) -> Result<Vec<u8>>;
}

/// A rendered report document plus the metadata needed to serve it.
#[derive(Debug, Clone)]
pub struct RenderedReport {
    /// Document contents
    pub bytes: Vec<u8>,
    /// MIME type of the document
    pub content_type: &'static str,
    /// Suggested download filename
    pub filename: &'static str,
}

/// Plain-text report renderer.
#[derive(Debug, Default, Clone, Copy)]
pub struct TextReportRenderer;

impl ReportRenderer for TextReportRenderer {
    fn content_type(&self) -> &'static str {
        "text/plain; charset=utf-8"
    }

    fn filename(&self) -> &'static str {
        "report.txt"
    }

    fn render(&self, batches: &[(BatchId, Vec<LinkInfo>)]) -> Result<Vec<u8>> {
        let mut out = String::new();
        let _ = writeln!(out, "Link availability report");
        let _ = writeln!(out);

        for (id, links) in batches {
            let _ = writeln!(out, "Batch {}", id);
            for link in links {
                let _ = writeln!(out, "{} - {}", link.url, link.status);
            }
            let _ = writeln!(out);
        }

        Ok(out.into_bytes())
    }
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::LinkStatus;

    #[test]
    fn test_text_report_lists_links_in_order() {
        let renderer = TextReportRenderer;
        let batches = vec![
            (
                BatchId(1),
                vec![
                    LinkInfo::new("a.example", LinkStatus::Available),
                    LinkInfo::new("b.example", LinkStatus::Unavailable),
                ],
            ),
            (
                BatchId(3),
                vec![LinkInfo::new("c.example", LinkStatus::Available)],
            ),
        ];

        let bytes = renderer.render(&batches).unwrap();
        let text = String::from_utf8(bytes).unwrap();

        assert!(text.contains("Batch 1"));
        assert!(text.contains("a.example - available"));
        assert!(text.contains("b.example - not available"));
        assert!(text.contains("Batch 3"));

        let a_pos = text.find("a.example").unwrap();
        let b_pos = text.find("b.example").unwrap();
        let c_pos = text.find("c.example").unwrap();
        assert!(a_pos < b_pos && b_pos < c_pos);
    }

    #[test]
    fn test_empty_report_still_renders() {
        let bytes = TextReportRenderer.render(&[]).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.contains("Link availability report"));
    }
}
