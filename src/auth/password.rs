//! PBKDF2-HMAC-SHA256 password hashes.
//!
//! Stored form: `pbkdf2-sha256$<iterations>$<salt hex>$<hash hex>`.

use crate::error::AuthError;
use rand::RngCore;
use sha2::Sha256;
use subtle::ConstantTimeEq;

const SCHEME: &str = "pbkdf2-sha256";
const SALT_LEN: usize = 16;
const HASH_LEN: usize = 32;

pub fn hash_password(password: &str, iterations: u32) -> String {
    let mut salt = [0u8; SALT_LEN];
    rand::rng().fill_bytes(&mut salt);

    let mut hash = [0u8; HASH_LEN];
    pbkdf2::pbkdf2_hmac::<Sha256>(password.as_bytes(), &salt, iterations, &mut hash);

    format!(
        "{SCHEME}${iterations}${}${}",
        hex::encode(salt),
        hex::encode(hash)
    )
}

/// Check `password` against a stored hash in constant time.
pub fn verify_password(password: &str, stored: &str) -> Result<bool, AuthError> {
    let mut fields = stored.split('$');
    let (Some(scheme), Some(iterations), Some(salt), Some(expected), None) = (
        fields.next(),
        fields.next(),
        fields.next(),
        fields.next(),
        fields.next(),
    ) else {
        return Err(AuthError::MalformedHash);
    };

    if scheme != SCHEME {
        return Err(AuthError::MalformedHash);
    }
    let iterations = iterations
        .parse::<u32>()
        .ok()
        .filter(|n| *n > 0)
        .ok_or(AuthError::MalformedHash)?;
    let salt = hex::decode(salt).map_err(|_| AuthError::MalformedHash)?;
    let expected = hex::decode(expected).map_err(|_| AuthError::MalformedHash)?;
    if expected.is_empty() {
        return Err(AuthError::MalformedHash);
    }

    let mut actual = vec![0u8; expected.len()];
    pbkdf2::pbkdf2_hmac::<Sha256>(password.as_bytes(), &salt, iterations, &mut actual);
    Ok(actual.ct_eq(&expected).into())
}
