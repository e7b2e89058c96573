use crate::error::IngestError;

const ERROR_PREFIX: &str = "Error processing PDF";

/// Concatenate page texts, terminating each page with a newline.
///
/// Line breaks the extractor leaves around a page are stripped first, so `N`
/// pages always yield `N` newline-terminated segments.
pub fn join_pages<I, S>(pages: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut text = String::new();
    for page in pages {
        text.push_str(page.as_ref().trim_matches(['\r', '\n']));
        text.push('\n');
    }
    text
}

/// Text shown in place of a document whose pages could not be decoded.
#[must_use]
pub fn inline_error(err: &IngestError) -> String {
    format!("{ERROR_PREFIX}: {err}")
}

#[must_use]
pub fn is_inline_error(text: &str) -> bool {
    text.starts_with(ERROR_PREFIX)
}

fn extract_pages(bytes: &[u8]) -> Result<Vec<String>, IngestError> {
    pdf_extract::extract_text_from_mem_by_pages(bytes).map_err(|e| IngestError::Pdf(e.to_string()))
}

/// Extract a PDF's text page by page.
///
/// Decoding failures, including a panic inside the parser, do not propagate:
/// the returned text is the inline error message instead.
pub async fn extract_text(bytes: Vec<u8>) -> String {
    let size = bytes.len();
    let result = tokio::task::spawn_blocking(move || extract_pages(&bytes))
        .await
        .map_err(|e| IngestError::Pdf(format!("parser aborted: {e}")))
        .and_then(|r| r);

    match result {
        Ok(pages) => {
            tracing::debug!(size, pages = pages.len(), "extracted PDF text");
            join_pages(pages)
        }
        Err(e) => {
            tracing::warn!(size, "PDF extraction failed: {e}");
            inline_error(&e)
        }
    }
}
