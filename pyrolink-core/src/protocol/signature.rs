use hmac::{Hmac, Mac};
use sha2::Sha256;

/// HMAC-SHA256 rendered as lower-case hex.
pub const SIGNATURE_LEN: usize = 64;

/// Signs a canonical message with a device secret. Used by the verifier and
/// by device simulators in tests.
pub fn sign(secret: &str, message: &[u8]) -> Option<String> {
    let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes()).ok()?;
    mac.update(message);
    Some(hex::encode(mac.finalize().into_bytes()))
}

/// Checks a supplied signature against the expected one for `message`.
///
/// Anything malformed (wrong length, non-hex, upper-case) simply fails to
/// match. The comparison is constant-time over the full length so the
/// mismatch position never shows up as a timing difference.
pub fn verify(secret: &str, message: &[u8], supplied: &str) -> bool {
    if supplied.len() != SIGNATURE_LEN {
        return false;
    }
    match sign(secret, message) {
        Some(expected) => timing_safe_eq(expected.as_bytes(), supplied.as_bytes()),
        None => false,
    }
}

fn timing_safe_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut out = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        out |= x ^ y;
    }
    out == 0
}
