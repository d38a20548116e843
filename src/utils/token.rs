use rand::Rng;

/// Opaque reset token: 32 random bytes, hex-encoded. Unguessable and safe
/// to put in a URL path.
pub fn generate_reset_token() -> String {
    let mut bytes = [0u8; 32];
    rand::rng().fill(&mut bytes);
    hex::encode(bytes)
}
