use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// SHA-256 of a document's raw bytes, stored hex-encoded.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentHash(String);

impl ContentHash {
    pub fn new(hash: String) -> Result<Self, String> {
        if hash.len() != 64 {
            return Err("Hash must be 64 characters long (SHA-256)".to_string());
        }

        if !hash.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err("Hash must contain only hexadecimal characters".to_string());
        }

        Ok(Self(hash.to_lowercase()))
    }

    pub fn from_bytes(data: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(data);
        Self(format!("{:x}", hasher.finalize()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ContentHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_hash_is_lowercased() {
        let hash_str = "A665A45920422F9D417E4867EFDC4FB8A04A1F3FFF1FA07E998E86F7F7A27AE3";
        let hash = ContentHash::new(hash_str.to_string()).unwrap();
        assert_eq!(hash.as_str(), hash_str.to_lowercase());
    }

    #[test]
    fn test_invalid_hash() {
        assert!(ContentHash::new("invalid".to_string()).is_err());
        assert!(
            ContentHash::new(
                "g665a45920422f9d417e4867efdc4fb8a04a1f3fff1fa07e998e86f7f7a27ae3".to_string()
            )
            .is_err()
        );
    }

    #[test]
    fn test_from_bytes_is_stable() {
        let first = ContentHash::from_bytes(b"%PDF-1.5 test data");
        let second = ContentHash::from_bytes(b"%PDF-1.5 test data");
        let other = ContentHash::from_bytes(b"%PDF-1.5 other data");

        assert_eq!(first.as_str().len(), 64);
        assert_eq!(first, second);
        assert_ne!(first, other);
    }
}
