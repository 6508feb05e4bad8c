use rand::Rng;

/// Entropy of a generated key, matching the framework's recommended length
pub const DEFAULT_ENTROPY_BYTES: u16 = 50;

/// URL-safe alphabet; each character carries 6 bits
const ALPHABET: &[u8; 64] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-_";

/// Characters needed to carry `bytes` bytes of entropy
pub fn key_length(bytes: u16) -> usize {
    (usize::from(bytes) * 4).div_ceil(3)
}

/// Generate a URL-safe secret key with `bytes` bytes of entropy
pub fn generate_secret_key(bytes: u16) -> String {
    let mut rng = rand::rng();
    (0..key_length(bytes))
        .map(|_| char::from(ALPHABET[rng.random_range(0..ALPHABET.len())]))
        .collect()
}
