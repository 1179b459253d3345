use base64ct::{Base64, Encoding};
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Derive the per-request authenticator the directory requires on every
/// credentialed call: HMAC-SHA256 over `username || client_id`, keyed by the
/// application secret, base64-encoded.
///
/// The username is used verbatim, no case folding: the directory validates
/// the hash server-side against whatever casing it stored. Deterministic and
/// pure, safe to call concurrently.
#[must_use]
pub fn derive_secret_hash(app_secret: &str, app_client_id: &str, username: &str) -> String {
    let mut mac = HmacSha256::new_from_slice(app_secret.as_bytes())
        .expect("HMAC accepts keys of any length");

    mac.update(username.as_bytes());
    mac.update(app_client_id.as_bytes());

    Base64::encode_string(&mac.finalize().into_bytes())
}
