//! Generated credentials for annotator accounts.

use rand::Rng;

/// Length of passwords generated for new or reset annotator accounts.
pub const GENERATED_PASSWORD_LENGTH: usize = 10;

/// Generate a random alphanumeric password of `len` characters.
///
/// The plaintext is returned to the administrator once and never stored.
pub fn generate_password(len: usize) -> String {
    rand::rng()
        .sample_iter(&rand::distr::Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}
