//! SHA-256 content fingerprint for migration scripts.

use sha2::{Digest, Sha256};

/// Compute the SHA-256 hex digest of a script's SQL text.
///
/// Hashes the exact UTF-8 bytes; no whitespace or line-ending normalization.
pub fn compute_hash(sql_text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(sql_text.as_bytes());
    let result = hasher.finalize();
    format!("{:x}", result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_is_deterministic() {
        let sql = "CREATE TABLE users (id INTEGER);";
        assert_eq!(compute_hash(sql), compute_hash(sql));
    }

    #[test]
    fn test_hash_detects_single_byte_change() {
        assert_ne!(compute_hash("A"), compute_hash("A;"));
    }

    #[test]
    fn test_hash_is_lowercase_hex_sha256() {
        let hash = compute_hash("");
        assert_eq!(
            hash,
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
        assert_eq!(compute_hash("S1").len(), 64);
    }

    #[test]
    fn test_hash_is_line_ending_sensitive() {
        assert_ne!(compute_hash("SELECT 1;\n"), compute_hash("SELECT 1;\r\n"));
    }
}
