use std::str::FromStr;

use serde::Deserialize;

/// Digest used to fingerprint sources of `hash:` tasks.
///
/// - `Md5` (default): 32 hex characters, matching the filenames produced by
///   the usual `name.<md5>.ext` cache-busting convention.
/// - `Blake3`: 64 hex characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    #[default]
    Md5,
    Blake3,
}

impl FromStr for HashAlgorithm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "md5" => Ok(HashAlgorithm::Md5),
            "blake3" => Ok(HashAlgorithm::Blake3),
            other => Err(format!(
                "invalid hash_algorithm: {other} (expected \"md5\" or \"blake3\")"
            )),
        }
    }
}
