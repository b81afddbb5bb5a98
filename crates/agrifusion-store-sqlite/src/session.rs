//! Bearer token generation and hashing.

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD as B64;
use rand_core::{OsRng, RngCore as _};
use sha2::{Digest as _, Sha256};

/// A fresh 256-bit token, base64url encoded without padding.
pub fn generate_token() -> String {
  let mut bytes = [0u8; 32];
  OsRng.fill_bytes(&mut bytes);
  B64.encode(bytes)
}

/// Hex SHA-256 of `token`; the only form in which tokens are stored.
pub fn hash_token(token: &str) -> String {
  hex::encode(Sha256::digest(token.as_bytes()))
}
