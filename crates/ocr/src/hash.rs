use sha2::{Digest, Sha256};

/// Bytes of the digest kept in a fingerprint (12 hex characters).
const FINGERPRINT_BYTES: usize = 6;

/// Short SHA-256 fingerprint used to correlate an upload across log lines
/// without logging the image itself.
pub fn fingerprint(data: &[u8]) -> String {
    Sha256::digest(data)[..FINGERPRINT_BYTES]
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fingerprint_is_short_lowercase_digest_prefix() {
        let fp = fingerprint(b"");
        assert_eq!(fp, "e3b0c44298fc");
        assert!(fp.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn different_uploads_differ() {
        assert_ne!(fingerprint(b"bill-a"), fingerprint(b"bill-b"));
        assert_eq!(fingerprint(b"bill-a"), fingerprint(b"bill-a"));
    }
}
