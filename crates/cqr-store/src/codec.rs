//! Blob codec: how binary attachments become storable text.
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use cqr_core::MediaBlob;

use crate::StoreError;

pub trait BlobCodec: Send + Sync {
    fn encode(&self, blob: &MediaBlob) -> String;
    fn decode(&self, raw: &str) -> Result<MediaBlob, StoreError>;
}

/// `data:<mime>;base64,<payload>` URLs
#[derive(Debug, Clone, Copy, Default)]
pub struct DataUrlCodec;

impl BlobCodec for DataUrlCodec {
    fn encode(&self, blob: &MediaBlob) -> String {
        format!("data:{};base64,{}", blob.mime, STANDARD.encode(&blob.bytes))
    }

    fn decode(&self, raw: &str) -> Result<MediaBlob, StoreError> {
        let rest = raw
            .strip_prefix("data:")
            .ok_or_else(|| StoreError::Blob("missing data: prefix".to_string()))?;
        let (mime, payload) = rest
            .split_once(";base64,")
            .ok_or_else(|| StoreError::Blob("not a base64 data URL".to_string()))?;
        let bytes = STANDARD
            .decode(payload)
            .map_err(|e| StoreError::Blob(e.to_string()))?;
        Ok(MediaBlob::new(mime, bytes))
    }
}
