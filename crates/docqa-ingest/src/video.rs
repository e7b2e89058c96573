use std::io::Write;

use crate::error::IngestError;
use crate::types::{VideoFile, video_mime_type};

/// Write video bytes verbatim to a new temporary file with a matching suffix.
///
/// # Errors
///
/// Returns `IngestError::Io` if the temporary file cannot be created or written.
pub fn materialize(bytes: &[u8], extension: &str) -> Result<VideoFile, IngestError> {
    let mut file = tempfile::Builder::new()
        .prefix("docqa-video-")
        .suffix(&format!(".{extension}"))
        .tempfile()?;
    file.write_all(bytes)?;
    file.flush()?;

    let path = file.into_temp_path();
    tracing::debug!(path = %path.display(), size = bytes.len(), "video written to temp file");

    Ok(VideoFile {
        path,
        mime_type: video_mime_type(extension),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_bytes_verbatim() {
        let video = materialize(b"\x00\x01binary", "mp4").unwrap();
        assert_eq!(std::fs::read(video.path()).unwrap(), b"\x00\x01binary");
        assert_eq!(video.mime_type(), "video/mp4");
        assert!(video.path().to_string_lossy().ends_with(".mp4"));
    }

    #[test]
    fn drop_removes_file() {
        let video = materialize(b"data", "mov").unwrap();
        let path = video.path().to_path_buf();
        assert!(path.exists());
        drop(video);
        assert!(!path.exists());
    }

    #[test]
    fn each_upload_gets_its_own_file() {
        let a = materialize(b"a", "avi").unwrap();
        let b = materialize(b"b", "avi").unwrap();
        assert_ne!(a.path(), b.path());
        assert_eq!(a.mime_type(), "video/x-msvideo");
    }
}
