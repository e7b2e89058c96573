use std::path::Path;

use tempfile::TempPath;

use crate::error::IngestError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Video,
}

impl DocumentKind {
    /// Detect the kind from a file name's extension, case-insensitively.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let ext = extension(name)?;
        match ext.as_str() {
            "pdf" => Some(Self::Pdf),
            "mp4" | "mov" | "avi" => Some(Self::Video),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Video => "video",
        }
    }
}

impl std::fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

pub(crate) fn extension(name: &str) -> Option<String> {
    Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
}

pub(crate) fn video_mime_type(ext: &str) -> &'static str {
    match ext {
        "mov" => "video/quicktime",
        "avi" => "video/x-msvideo",
        _ => "video/mp4",
    }
}

/// Raw bytes of an uploaded file, keyed by its original file name.
#[derive(Clone)]
pub struct Upload {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl std::fmt::Debug for Upload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Upload")
            .field("name", &self.name)
            .field("size", &self.bytes.len())
            .finish()
    }
}

impl Upload {
    #[must_use]
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }

    /// Read a file from disk, using its file name as the upload name.
    ///
    /// # Errors
    ///
    /// Returns `IngestError::FileTooLarge` when the file exceeds `max_size`, or
    /// `IngestError::Io` if it cannot be read.
    pub async fn read(path: &Path, max_size: u64) -> Result<Self, IngestError> {
        let meta = tokio::fs::metadata(path).await?;
        if meta.len() > max_size {
            return Err(IngestError::FileTooLarge(meta.len()));
        }

        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .map(str::to_owned)
            .ok_or_else(|| IngestError::UnsupportedFormat(path.display().to_string()))?;
        let bytes = tokio::fs::read(path).await?;
        Ok(Self { name, bytes })
    }

    #[must_use]
    pub fn kind(&self) -> Option<DocumentKind> {
        DocumentKind::from_name(&self.name)
    }
}

/// A video written to a temporary file. The file is removed when this value is dropped.
#[derive(Debug)]
pub struct VideoFile {
    pub(crate) path: TempPath,
    pub(crate) mime_type: &'static str,
}

impl VideoFile {
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn mime_type(&self) -> &'static str {
        self.mime_type
    }
}

/// Ingested content: extracted text for PDFs, a local file for videos.
#[derive(Debug)]
pub enum Document {
    Text(String),
    Video(VideoFile),
}

impl Document {
    #[must_use]
    pub fn kind(&self) -> DocumentKind {
        match self {
            Self::Text(_) => DocumentKind::Pdf,
            Self::Video(_) => DocumentKind::Video,
        }
    }

    #[must_use]
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Video(_) => None,
        }
    }

    #[must_use]
    pub fn video(&self) -> Option<&VideoFile> {
        match self {
            Self::Video(video) => Some(video),
            Self::Text(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_from_name() {
        assert_eq!(DocumentKind::from_name("report.pdf"), Some(DocumentKind::Pdf));
        assert_eq!(DocumentKind::from_name("REPORT.PDF"), Some(DocumentKind::Pdf));
        assert_eq!(DocumentKind::from_name("clip.mov"), Some(DocumentKind::Video));
        assert_eq!(DocumentKind::from_name("clip.avi"), Some(DocumentKind::Video));
        assert_eq!(DocumentKind::from_name("notes.txt"), None);
        assert_eq!(DocumentKind::from_name("no_extension"), None);
    }

    #[test]
    fn mime_types() {
        assert_eq!(video_mime_type("mp4"), "video/mp4");
        assert_eq!(video_mime_type("mov"), "video/quicktime");
        assert_eq!(video_mime_type("avi"), "video/x-msvideo");
    }

    #[test]
    fn upload_debug_hides_bytes() {
        let upload = Upload::new("a.pdf", vec![1, 2, 3]);
        assert_eq!(format!("{upload:?}"), "Upload { name: \"a.pdf\", size: 3 }");
    }

    #[tokio::test]
    async fn read_uses_file_name() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("paper.pdf");
        std::fs::write(&file, b"%PDF").unwrap();

        let upload = Upload::read(&file, 1024).await.unwrap();
        assert_eq!(upload.name, "paper.pdf");
        assert_eq!(upload.bytes, b"%PDF");
        assert_eq!(upload.kind(), Some(DocumentKind::Pdf));
    }

    #[tokio::test]
    async fn read_rejects_large_files() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("big.pdf");
        std::fs::write(&file, b"0123456789").unwrap();

        let result = Upload::read(&file, 5).await;
        assert!(matches!(result, Err(IngestError::FileTooLarge(10))));
    }

    #[tokio::test]
    async fn read_missing_file_errors() {
        let result = Upload::read(Path::new("/nonexistent/file.pdf"), 1024).await;
        assert!(matches!(result, Err(IngestError::Io(_))));
    }
}
