//! 256-bit digests rendered as 64 lowercase hex characters
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;

use crate::SealError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    #[default]
    Sha256,
    Blake3,
}

impl HashAlgorithm {
    pub const ALL: [HashAlgorithm; 2] = [Self::Sha256, Self::Blake3];

    pub fn digest_hex(&self, input: &str) -> String {
        match self {
            Self::Sha256 => format!("{:x}", Sha256::digest(input.as_bytes())),
            Self::Blake3 => blake3::hash(input.as_bytes()).to_hex().to_string(),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sha256 => "sha256",
            Self::Blake3 => "blake3",
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HashAlgorithm {
    type Err = SealError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "").as_str() {
            "sha256" => Ok(Self::Sha256),
            "blake3" => Ok(Self::Blake3),
            other => Err(SealError::UnknownAlgorithm(other.to_string())),
        }
    }
}

/// Digest off the async executor; the caller suspends until it is done.
pub async fn digest_hex_async(algorithm: HashAlgorithm, input: String) -> Result<String, SealError> {
    tokio::task::spawn_blocking(move || algorithm.digest_hex(&input))
        .await
        .map_err(|e| SealError::Digest(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha256_known_vector() {
        assert_eq!(
            HashAlgorithm::Sha256.digest_hex(""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_fixed_length_lowercase() {
        for algorithm in [HashAlgorithm::Sha256, HashAlgorithm::Blake3] {
            let hex = algorithm.digest_hex(r#"{"grade":"M30"}"#);
            assert_eq!(hex.len(), 64);
            assert!(hex.chars().all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
            assert_eq!(hex, algorithm.digest_hex(r#"{"grade":"M30"}"#));
        }
    }

    #[test]
    fn test_algorithms_differ() {
        assert_ne!(
            HashAlgorithm::Sha256.digest_hex("x"),
            HashAlgorithm::Blake3.digest_hex("x")
        );
    }

    #[test]
    fn test_parse_algorithm() {
        assert_eq!("SHA-256".parse::<HashAlgorithm>().unwrap(), HashAlgorithm::Sha256);
        assert_eq!("blake3".parse::<HashAlgorithm>().unwrap(), HashAlgorithm::Blake3);
        assert!("md5".parse::<HashAlgorithm>().is_err());
    }

    #[tokio::test]
    async fn test_async_matches_sync() {
        let hex = digest_hex_async(HashAlgorithm::Sha256, "abc".to_string()).await.unwrap();
        assert_eq!(hex, HashAlgorithm::Sha256.digest_hex("abc"));
    }
}
