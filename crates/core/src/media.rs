//! Evidence photo checks and inline encoding.
//!
//! Evidence is stored inline in its database row as a `data:` URL rather
//! than in blob storage. Base64 grows the payload by roughly a third, so
//! uploads are capped at [`MAX_EVIDENCE_BYTES`].

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use tokio::io::{AsyncRead, AsyncReadExt};

use crate::error::CoreError;

/// Largest accepted evidence file (2 MiB, inclusive).
pub const MAX_EVIDENCE_BYTES: u64 = 2 * 1024 * 1024;

/// Media types must start with this to count as an image.
pub const IMAGE_MEDIA_PREFIX: &str = "image/";

/// What the client told us about an uploaded file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvidenceMeta {
    pub file_name: String,
    pub media_type: String,
    pub size: u64,
}

/// An uploaded file: its metadata plus a reader over its bytes.
pub struct EvidenceFile<R> {
    pub meta: EvidenceMeta,
    pub reader: R,
}

#[derive(Debug, thiserror::Error)]
pub enum MediaError {
    #[error("Failed to read evidence file: {0}")]
    Read(#[from] std::io::Error),

    #[error("Evidence file exceeds the maximum size of {max} bytes")]
    TooLarge { max: u64 },
}

/// Check that the file is an image within the size cap.
pub fn check_evidence(meta: &EvidenceMeta) -> Result<(), CoreError> {
    if !meta.media_type.starts_with(IMAGE_MEDIA_PREFIX) {
        return Err(CoreError::Validation(format!(
            "Evidence must be an image (got '{}')",
            meta.media_type
        )));
    }
    if meta.size > MAX_EVIDENCE_BYTES {
        return Err(CoreError::Validation(format!(
            "Evidence image is too large: {} bytes (maximum {MAX_EVIDENCE_BYTES})",
            meta.size
        )));
    }
    Ok(())
}

/// Read the whole file and return it as a base64 `data:` URL.
///
/// Reads at most one byte past [`MAX_EVIDENCE_BYTES`]; a longer stream is
/// rejected whatever size the client declared.
pub async fn encode_data_url<R>(media_type: &str, reader: R) -> Result<String, MediaError>
where
    R: AsyncRead + Unpin,
{
    let mut bytes = Vec::new();
    reader
        .take(MAX_EVIDENCE_BYTES + 1)
        .read_to_end(&mut bytes)
        .await?;

    if bytes.len() as u64 > MAX_EVIDENCE_BYTES {
        return Err(MediaError::TooLarge {
            max: MAX_EVIDENCE_BYTES,
        });
    }

    Ok(format!("data:{media_type};base64,{}", BASE64.encode(&bytes)))
}
