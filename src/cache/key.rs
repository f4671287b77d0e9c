//! Fingerprint derivation.

use sha2::{Digest, Sha256};

/// Bumped whenever the hashed layout changes, so stale keys can never alias new ones.
const FINGERPRINT_DOMAIN: &[u8] = b"grounded-qa/answers/v1";

/// Content address of one (document, ordered question list) pair.
///
/// A hex-encoded SHA-256 digest. Every field is length-prefixed before it is
/// hashed, so moving text across a field boundary (`["ab", "c"]` versus
/// `["a", "bc"]`) changes the digest.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Digest the document text and questions exactly as given.
    ///
    /// Callers normalize first; [`QueryRequest`](crate::types::QueryRequest)
    /// does that and exposes [`fingerprint`](crate::types::QueryRequest::fingerprint).
    pub fn compute<Q: AsRef<str>>(document: &str, questions: &[Q]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(FINGERPRINT_DOMAIN);
        update_field(&mut hasher, document.as_bytes());
        hasher.update((questions.len() as u64).to_le_bytes());
        for question in questions {
            update_field(&mut hasher, question.as_ref().as_bytes());
        }
        let hash: String = hasher
            .finalize()
            .iter()
            .map(|b| format!("{:02x}", b))
            .collect();
        Self(hash)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First few hex digits, enough to correlate log lines.
    pub fn short(&self) -> &str {
        self.0.get(..12).unwrap_or(&self.0)
    }
}

fn update_field(hasher: &mut Sha256, bytes: &[u8]) {
    hasher.update((bytes.len() as u64).to_le_bytes());
    hasher.update(bytes);
}

impl std::fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
