//! Turn uploaded files into session documents: PDF text or a local video file.

pub mod error;
pub mod pdf;
pub mod types;
pub mod video;

pub use error::IngestError;
pub use types::{Document, DocumentKind, Upload, VideoFile};

/// Default maximum upload size: 200 MiB.
pub const DEFAULT_MAX_FILE_SIZE: u64 = 200 * 1024 * 1024;

#[derive(Debug, Clone, Copy)]
pub struct Ingestor {
    pub max_file_size: u64,
}

impl Default for Ingestor {
    fn default() -> Self {
        Self {
            max_file_size: DEFAULT_MAX_FILE_SIZE,
        }
    }
}

impl Ingestor {
    #[must_use]
    pub fn new(max_file_size: u64) -> Self {
        Self { max_file_size }
    }

    /// Convert an upload into a document.
    ///
    /// A PDF that cannot be decoded still yields a document whose text is the
    /// inline error message.
    ///
    /// # Errors
    ///
    /// Returns `IngestError::UnsupportedFormat` for unknown extensions,
    /// `IngestError::FileTooLarge` above the size limit, and `IngestError::Io`
    /// if a video cannot be written to disk.
    pub async fn ingest(&self, upload: Upload) -> Result<Document, IngestError> {
        let size = upload.bytes.len() as u64;
        if size > self.max_file_size {
            return Err(IngestError::FileTooLarge(size));
        }

        let kind = upload
            .kind()
            .ok_or_else(|| IngestError::UnsupportedFormat(upload.name.clone()))?;
        tracing::info!(name = %upload.name, %kind, size, "ingesting upload");

        match kind {
            DocumentKind::Pdf => Ok(Document::Text(pdf::extract_text(upload.bytes).await)),
            DocumentKind::Video => {
                let ext = types::extension(&upload.name).unwrap_or_else(|| "mp4".into());
                let bytes = upload.bytes;
                let file = tokio::task::spawn_blocking(move || video::materialize(&bytes, &ext))
                    .await
                    .map_err(|e| IngestError::Io(std::io::Error::other(e)))??;
                Ok(Document::Video(file))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unsupported_extension_is_rejected() {
        let result = Ingestor::default()
            .ingest(Upload::new("notes.txt", b"hello".to_vec()))
            .await;
        assert!(matches!(result, Err(IngestError::UnsupportedFormat(name)) if name == "notes.txt"));
    }

    #[tokio::test]
    async fn oversized_upload_is_rejected() {
        let result = Ingestor::new(3)
            .ingest(Upload::new("a.pdf", b"%PDF-1.4".to_vec()))
            .await;
        assert!(matches!(result, Err(IngestError::FileTooLarge(8))));
    }

    #[tokio::test]
    async fn broken_pdf_yields_inline_error_document() {
        let doc = Ingestor::default()
            .ingest(Upload::new("broken.pdf", b"%PDF-garbage".to_vec()))
            .await
            .unwrap();
        assert_eq!(doc.kind(), DocumentKind::Pdf);
        assert!(pdf::is_inline_error(doc.text().unwrap()));
    }

    #[tokio::test]
    async fn video_is_materialized() {
        let doc = Ingestor::default()
            .ingest(Upload::new("Clip.MOV", b"frames".to_vec()))
            .await
            .unwrap();
        let video = doc.video().unwrap();
        assert_eq!(video.mime_type(), "video/quicktime");
        assert_eq!(std::fs::read(video.path()).unwrap(), b"frames");
        assert!(doc.text().is_none());
    }
}
