//! Document loading: bytes → document → the page to rasterise.

use crate::engine::{DocumentEngine, PageHandle, SourceDocument};
use crate::error::Pdf2ImgError;
use tracing::debug;

/// The page every conversion rasterises. Later pages are never inspected.
pub const FIRST_PAGE: usize = 0;

/// Decode `bytes` with `engine`.
pub fn load_document<'e, E>(
    engine: &'e E,
    bytes: Vec<u8>,
) -> Result<Box<dyn SourceDocument + 'e>, Pdf2ImgError>
where
    E: DocumentEngine + ?Sized,
{
    let len = bytes.len();
    let document = engine.load(bytes)?;
    debug!(
        "Decoded {} bytes into a document of {} pages",
        len,
        document.page_count()
    );
    Ok(document)
}

/// Open page `index`, failing with `PageNotFound` when the document is
/// shorter, whatever the engine itself would report.
pub fn open_page<'d>(
    document: &'d dyn SourceDocument,
    index: usize,
) -> Result<Box<dyn PageHandle + 'd>, Pdf2ImgError> {
    let total = document.page_count();
    if index >= total {
        return Err(Pdf2ImgError::PageNotFound { index, total });
    }
    document.page(index)
}
