use sha2::{Digest, Sha256};

use crate::constants::gravatar::{BASE_URL, DEFAULT_IMAGE, RATING, SIZE};

/// Avatar URL for an email address (Gravatar accepts SHA-256 hashes of the
/// trimmed, lowercased address).
#[must_use]
pub fn avatar_url(email: &str) -> String {
    let normalized = email.trim().to_lowercase();
    let hash = hex::encode(Sha256::digest(normalized.as_bytes()));
    format!("{BASE_URL}/{hash}?s={SIZE}&d={DEFAULT_IMAGE}&r={RATING}")
}
