//! Age-format encryption backend.
//!
//! Artifacts are standard age v1 files (X25519 recipient stanzas,
//! ChaCha20-Poly1305 payload), so anything this tool writes can be
//! opened with the reference `age` binary and vice versa. Reads accept
//! both binary and ASCII-armored input; writes emit armor only when
//! configured to.

use std::io::{Read, Write};
use std::iter;

use age::armor::{ArmoredReader, ArmoredWriter, Format};
use zeroize::Zeroizing;

use crate::errors::{Result, SecretsError};

use super::Cipher;

/// The age cipher backend.
pub struct AgeCipher {
    /// Emit ASCII-armored ciphertext (friendlier to text-only channels).
    armor: bool,
}

impl AgeCipher {
    pub fn new(armor: bool) -> Self {
        Self { armor }
    }
}

impl Cipher for AgeCipher {
    fn encrypt(
        &self,
        plaintext: &[u8],
        recipients: &[age::x25519::Recipient],
    ) -> Result<Vec<u8>> {
        let boxed: Vec<Box<dyn age::Recipient + Send>> = recipients
            .iter()
            .map(|r| Box::new(r.clone()) as Box<dyn age::Recipient + Send>)
            .collect();

        let encryptor = age::Encryptor::with_recipients(boxed).ok_or_else(|| {
            SecretsError::EncryptionFailed("recipient set is empty".to_string())
        })?;

        let mut ciphertext = Vec::new();

        if self.armor {
            let armored = ArmoredWriter::wrap_output(&mut ciphertext, Format::AsciiArmor)
                .map_err(|e| SecretsError::EncryptionFailed(e.to_string()))?;
            let mut writer = encryptor
                .wrap_output(armored)
                .map_err(|e| SecretsError::EncryptionFailed(e.to_string()))?;
            writer
                .write_all(plaintext)
                .map_err(|e| SecretsError::EncryptionFailed(e.to_string()))?;
            let armored = writer
                .finish()
                .map_err(|e| SecretsError::EncryptionFailed(e.to_string()))?;
            armored
                .finish()
                .map_err(|e| SecretsError::EncryptionFailed(e.to_string()))?;
        } else {
            let mut writer = encryptor
                .wrap_output(&mut ciphertext)
                .map_err(|e| SecretsError::EncryptionFailed(e.to_string()))?;
            writer
                .write_all(plaintext)
                .map_err(|e| SecretsError::EncryptionFailed(e.to_string()))?;
            writer
                .finish()
                .map_err(|e| SecretsError::EncryptionFailed(e.to_string()))?;
        }

        Ok(ciphertext)
    }

    fn decrypt(
        &self,
        ciphertext: &[u8],
        identity: &age::x25519::Identity,
    ) -> Result<Zeroizing<Vec<u8>>> {
        // ArmoredReader transparently handles both armored and binary input.
        let decryptor = match age::Decryptor::new(ArmoredReader::new(ciphertext))
            .map_err(map_decrypt_error)?
        {
            age::Decryptor::Recipients(d) => d,
            age::Decryptor::Passphrase(_) => {
                return Err(SecretsError::DecryptionFailed(
                    "store is passphrase-encrypted, not recipient-encrypted".to_string(),
                ));
            }
        };

        let mut reader = decryptor
            .decrypt(iter::once(identity as &dyn age::Identity))
            .map_err(map_decrypt_error)?;

        let mut plaintext = Zeroizing::new(Vec::new());
        reader
            .read_to_end(&mut plaintext)
            .map_err(|e| SecretsError::DecryptionFailed(e.to_string()))?;

        Ok(plaintext)
    }
}

/// Map age decryption errors into the CLI taxonomy. A wrong identity is
/// the one case users can fix themselves, so it gets its own variant.
fn map_decrypt_error(e: age::DecryptError) -> SecretsError {
    match e {
        age::DecryptError::NoMatchingKeys => SecretsError::NoMatchingIdentity,
        other => SecretsError::DecryptionFailed(other.to_string()),
    }
}
