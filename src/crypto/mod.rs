//! Cryptography for the secrets CLI.
//!
//! The store never depends on a cipher mechanism directly — it goes
//! through the narrow `Cipher` seam, implemented here by linking the
//! age file format natively (`age_cipher`). Identity and recipient
//! file handling live alongside:
//! - `identity` — the private X25519 key file (generate, load, perms)
//! - `recipients` — the versioned public-key manifest

pub mod age_cipher;
pub mod identity;
pub mod recipients;

use crate::errors::Result;

pub use age_cipher::AgeCipher;

/// The contract the credential store depends on: authenticated file
/// encryption to a set of recipient public keys, decryption with one
/// matching private identity.
pub trait Cipher {
    /// Encrypt `plaintext` so any of `recipients` can decrypt it.
    fn encrypt(
        &self,
        plaintext: &[u8],
        recipients: &[age::x25519::Recipient],
    ) -> Result<Vec<u8>>;

    /// Decrypt `ciphertext` with `identity`. Fails with
    /// `NoMatchingIdentity` if the identity was not a recipient.
    fn decrypt(
        &self,
        ciphertext: &[u8],
        identity: &age::x25519::Identity,
    ) -> Result<zeroize::Zeroizing<Vec<u8>>>;
}
