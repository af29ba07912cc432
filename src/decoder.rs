use std::path::Path;

use crate::error::{Error, Result};

/// Turns a locator into a page count.
///
/// Implementations may block; callers run them off the event thread.
pub trait DocumentDecoder: Send + Sync {
    fn page_count(&self, locator: &str) -> Result<u32>;
}

/// Reads PDF files from disk with `lopdf`.
#[derive(Debug, Default, Clone, Copy)]
pub struct PdfDecoder;

impl DocumentDecoder for PdfDecoder {
    fn page_count(&self, locator: &str) -> Result<u32> {
        let path = Path::new(locator);
        if !path.is_file() {
            return Err(Error::DocumentNotFound(locator.to_string()));
        }

        let doc = lopdf::Document::load(path).map_err(|e| {
            Error::DocumentCorrupt {
                locator: locator.to_string(),
                reason: e.to_string(),
            }
        })?;

        let pages = doc.get_pages().len();
        if pages == 0 {
            return Err(Error::DocumentCorrupt {
                locator: locator.to_string(),
                reason: "document has no pages".into(),
            });
        }

        tracing::debug!(locator, pages, "document decoded");
        Ok(u32::try_from(pages).unwrap_or(u32::MAX))
    }
}
