//! Archive upload: the multipart form and byte-level progress reporting.

use bytes::Bytes;
use futures::stream::{self, StreamExt};
use reqwest::multipart::{Form, Part};
use reqwest::Body;
use std::path::Path;

use crate::error::ClientError;

/// Size of the chunks handed to the transport. Progress is reported once
/// per chunk.
pub const UPLOAD_CHUNK_SIZE: usize = 64 * 1024;

/// Name of the multipart field the server reads the archive from.
const FILE_FIELD: &str = "file";

/// A code archive ready to be uploaded.
#[derive(Debug, Clone)]
pub struct UploadArchive {
    pub file_name: String,
    pub bytes: Vec<u8>,
    /// Overrides the media type guessed from `file_name`
    pub content_type: Option<String>,
}

/// Progress of an upload in bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadProgress {
    /// Bytes handed to the transport so far
    pub loaded: u64,
    /// Size of the archive
    pub total: u64,
}

impl UploadProgress {
    /// Fraction uploaded, in `0.0..=1.0`.
    pub fn ratio(&self) -> f64 {
        if self.total == 0 {
            1.0
        } else {
            self.loaded as f64 / self.total as f64
        }
    }
}

impl UploadArchive {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
            content_type: None,
        }
    }

    pub fn with_media_type(mut self, media_type: impl Into<String>) -> Self {
        self.content_type = Some(media_type.into());
        self
    }

    /// Read an archive from disk. The file name sent to the server is the
    /// last component of `path`.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self, ClientError> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "archive.zip".to_string());
        Ok(Self::new(file_name, bytes))
    }

    pub fn len(&self) -> u64 {
        self.bytes.len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Media type sent with the file part, guessed from the file name
    /// unless set explicitly.
    pub fn media_type(&self) -> String {
        if let Some(media_type) = &self.content_type {
            return media_type.clone();
        }
        mime_guess::from_path(&self.file_name)
            .first_or_octet_stream()
            .essence_str()
            .to_string()
    }

    /// Build the multipart form, streaming the archive in chunks and calling
    /// `on_progress` after each chunk is handed over.
    pub fn into_form<F>(self, mut on_progress: F) -> Result<Form, ClientError>
    where
        F: FnMut(UploadProgress) + Send + Sync + 'static,
    {
        let media_type = self.media_type();
        let total = self.len();
        let chunks = split_chunks(Bytes::from(self.bytes));

        let mut loaded = 0u64;
        let body_stream = stream::iter(chunks).map(move |chunk| {
            loaded += chunk.len() as u64;
            on_progress(UploadProgress { loaded, total });
            Ok::<_, std::io::Error>(chunk)
        });

        let part = Part::stream_with_length(Body::wrap_stream(body_stream), total)
            .file_name(self.file_name)
            .mime_str(&media_type)
            .map_err(|e| ClientError::Config(format!("invalid media type {media_type:?}: {e}")))?;

        Ok(Form::new().part(FILE_FIELD, part))
    }
}

/// Cut `bytes` into views of at most [`UPLOAD_CHUNK_SIZE`] bytes sharing
/// the same buffer.
fn split_chunks(bytes: Bytes) -> Vec<Bytes> {
    (0..bytes.len())
        .step_by(UPLOAD_CHUNK_SIZE)
        .map(|start| bytes.slice(start..(start + UPLOAD_CHUNK_SIZE).min(bytes.len())))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_media_type_from_name() {
        assert_eq!(
            UploadArchive::new("project.zip", vec![]).media_type(),
            "application/zip"
        );
        assert_eq!(UploadArchive::new("notes.txt", vec![]).media_type(), "text/plain");
        assert_eq!(
            UploadArchive::new("no-extension", vec![]).media_type(),
            "application/octet-stream"
        );
    }

    #[test]
    fn test_explicit_media_type_wins() {
        let archive = UploadArchive::new("project.bin", vec![]).with_media_type("application/zip");
        assert_eq!(archive.media_type(), "application/zip");
    }

    #[test]
    fn test_invalid_media_type_is_config_error() {
        let archive =
            UploadArchive::new("project.zip", vec![1, 2, 3]).with_media_type("not a type");
        let result = archive.into_form(|_| {});
        assert!(matches!(result, Err(ClientError::Config(_))));
    }

    #[test]
    fn test_chunks_share_the_archive_buffer() {
        let bytes = Bytes::from(vec![7u8; UPLOAD_CHUNK_SIZE * 2 + 10]);
        let base = bytes.as_ptr();

        let chunks = split_chunks(bytes.clone());

        let lens: Vec<usize> = chunks.iter().map(Bytes::len).collect();
        assert_eq!(lens, vec![UPLOAD_CHUNK_SIZE, UPLOAD_CHUNK_SIZE, 10]);
        for (i, chunk) in chunks.iter().enumerate() {
            assert_eq!(chunk.as_ptr(), base.wrapping_add(i * UPLOAD_CHUNK_SIZE));
        }
        assert!(split_chunks(Bytes::new()).is_empty());
    }

    #[test]
    fn test_progress_ratio() {
        assert_eq!(UploadProgress { loaded: 5, total: 10 }.ratio(), 0.5);
        assert_eq!(UploadProgress { loaded: 0, total: 0 }.ratio(), 1.0);
    }

    #[tokio::test]
    async fn test_from_path_uses_file_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shapes.zip");
        std::fs::write(&path, b"PK\x03\x04").unwrap();

        let archive = UploadArchive::from_path(&path).await.unwrap();
        assert_eq!(archive.file_name, "shapes.zip");
        assert_eq!(archive.len(), 4);
    }

    #[tokio::test]
    async fn test_from_missing_path_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = UploadArchive::from_path(dir.path().join("missing.zip"))
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Io(_)));
    }
}
