use base64::{Engine, engine::general_purpose::STANDARD};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Prefix every stored payload must carry.
pub const PDF_DATA_URL_PREFIX: &str = "data:application/pdf;base64,";

#[derive(Debug, Error, PartialEq)]
pub enum PayloadError {
    #[error("Invalid PDF data format: missing `{PDF_DATA_URL_PREFIX}` prefix")]
    InvalidFormat,
    #[error("Stored PDF data is not valid base64: {0}")]
    DecodeError(String),
}

/// A PDF encoded as a self-describing data URL, as kept in the document store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PdfPayload(String);

impl PdfPayload {
    /// Encodes raw PDF bytes.
    pub fn store(bytes: &[u8]) -> Self {
        Self(format!("{}{}", PDF_DATA_URL_PREFIX, STANDARD.encode(bytes)))
    }

    /// Wraps a string read back from the store. Validation happens on [`Self::load`].
    pub fn from_stored(encoded: String) -> Self {
        Self(encoded)
    }

    pub fn is_well_formed(&self) -> bool {
        self.0.starts_with(PDF_DATA_URL_PREFIX)
    }

    /// Decodes back to the original bytes.
    pub fn load(&self) -> Result<Vec<u8>, PayloadError> {
        let data = self
            .0
            .strip_prefix(PDF_DATA_URL_PREFIX)
            .ok_or(PayloadError::InvalidFormat)?;

        STANDARD
            .decode(data)
            .map_err(|e| PayloadError::DecodeError(e.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_arbitrary_bytes() {
        let samples: Vec<Vec<u8>> = vec![
            Vec::new(),
            vec![0u8],
            (0..=255u8).collect(),
            b"%PDF-1.5\n%\xe2\xe3\xcf\xd3\n".to_vec(),
            (0..100_000u32).map(|i| (i.wrapping_mul(31) % 251) as u8).collect(),
        ];

        for bytes in samples {
            let payload = PdfPayload::store(&bytes);
            assert!(payload.as_str().starts_with(PDF_DATA_URL_PREFIX));
            assert_eq!(payload.load().unwrap(), bytes);
        }
    }

    #[test]
    fn test_load_rejects_missing_prefix() {
        let payload = PdfPayload::from_stored("JVBERi0xLjU=".to_string());
        assert!(!payload.is_well_formed());
        assert_eq!(payload.load(), Err(PayloadError::InvalidFormat));
    }

    #[test]
    fn test_load_rejects_invalid_base64() {
        let payload = PdfPayload::from_stored(format!("{}not*base64!", PDF_DATA_URL_PREFIX));
        assert!(payload.is_well_formed());
        assert!(matches!(payload.load(), Err(PayloadError::DecodeError(_))));
    }

    #[test]
    fn test_stored_form_reloads() {
        let stored = PdfPayload::store(b"%PDF-1.7").as_str().to_string();
        let reloaded = PdfPayload::from_stored(stored);
        assert_eq!(reloaded.load().unwrap(), b"%PDF-1.7");
    }
}
