//! Snapshot checksum helper.

use sha2::{Digest, Sha256};

/// SHA-256 checksum of a serialized snapshot, hex-encoded.
///
/// Used to fingerprint the published event set of a batch so that an
/// already-published timetable can be verified against later reads.
pub fn calculate_checksum(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checksum_is_deterministic() {
        let a = calculate_checksum("payload");
        let b = calculate_checksum("payload");
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
    }

    #[test]
    fn test_checksum_differs_on_content() {
        assert_ne!(calculate_checksum("a"), calculate_checksum("b"));
    }
}
