use crate::error::CipherError;
use aes::Aes256;
use aes_gcm::{
    AeadInPlace, AesGcm, KeyInit, Nonce, Tag,
    aead::consts::U16,
};
use log::warn;
use models::grade::RevealedGrade;
use pbkdf2::pbkdf2_hmac;
use rand::{RngCore, rngs::OsRng};
use sha2::Sha256;
use std::fmt::{Debug, Formatter, Result as FmtResult};

/// AES-256-GCM with a 16-byte IV, matching the stored ciphertext format
type Aes256Gcm16 = AesGcm<Aes256, U16>;

/// Environment variables checked for the secret, in order
pub const SECRET_VARS: [&str; 2] = [
    "GRADE_ENCRYPTION_SECRET",
    "NEXT_PUBLIC_GRADE_ENCRYPTION_SECRET",
];

const PBKDF2_ROUNDS: u32 = 10_000;
const KEY_LEN: usize = 32;
const IV_LEN: usize = 16;
const TAG_LEN: usize = 16;

/// Encrypts grades at rest with a key derived from a server secret and the owning user's id.
///
/// Stored values look like `hex(iv):hex(ciphertext):hex(tag)`. Anything without a `:` is a
/// legacy plaintext grade and is passed through unchanged on decryption.
#[derive(Clone)]
pub struct GradeCipher {
    secret: String,
}

impl Debug for GradeCipher {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("GradeCipher")
            .field("secret", &"<redacted>")
            .finish()
    }
}

impl GradeCipher {
    pub fn new(secret: impl Into<String>) -> Result<Self, CipherError> {
        let secret = secret.into();
        if secret.is_empty() {
            return Err(CipherError::MissingSecret);
        }
        Ok(Self { secret })
    }

    /// Reads the secret from the environment (and `.env`), see [`SECRET_VARS`]
    pub fn from_env() -> Result<Self, CipherError> {
        let secret = SECRET_VARS
            .iter()
            .filter_map(|name| dotenvy::var(name).ok())
            .find(|value| !value.is_empty())
            .ok_or(CipherError::MissingSecret)?;

        Self::new(secret)
    }

    /// Derives the key for one user. Reuse it when handling many of that user's grades
    pub fn for_user(&self, user_id: &str) -> UserKey {
        let mut key = [0u8; KEY_LEN];
        pbkdf2_hmac::<Sha256>(
            user_id.as_bytes(),
            self.secret.as_bytes(),
            PBKDF2_ROUNDS,
            &mut key,
        );
        UserKey { key }
    }

    pub fn encrypt(&self, plaintext: &str, user_id: &str) -> Result<String, CipherError> {
        self.for_user(user_id).encrypt(plaintext)
    }

    pub fn decrypt(&self, stored: &str, user_id: &str) -> Result<String, CipherError> {
        self.for_user(user_id).decrypt(stored)
    }

    /// Decrypts a stored column value for display, never failing
    pub fn reveal(&self, stored: Option<&str>, user_id: &str) -> RevealedGrade {
        self.for_user(user_id).reveal(stored)
    }
}

/// A derived per-user key
#[derive(Clone)]
pub struct UserKey {
    key: [u8; KEY_LEN],
}

impl Debug for UserKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("UserKey").finish_non_exhaustive()
    }
}

impl UserKey {
    fn cipher(&self) -> Result<Aes256Gcm16, CipherError> {
        Aes256Gcm16::new_from_slice(&self.key).map_err(|_| CipherError::Encryption)
    }

    /// Encrypts with a fresh random IV, so equal grades never produce equal ciphertext
    pub fn encrypt(&self, plaintext: &str) -> Result<String, CipherError> {
        let mut iv = [0u8; IV_LEN];
        OsRng.fill_bytes(&mut iv);

        let mut buffer = plaintext.as_bytes().to_vec();
        let tag = self
            .cipher()?
            .encrypt_in_place_detached(Nonce::<U16>::from_slice(&iv), b"", &mut buffer)
            .map_err(|_| CipherError::Encryption)?;

        Ok(format!(
            "{}:{}:{}",
            hex::encode(iv),
            hex::encode(buffer),
            hex::encode(tag)
        ))
    }

    pub fn decrypt(&self, stored: &str) -> Result<String, CipherError> {
        if !stored.contains(':') {
            return Ok(stored.to_string());
        }

        let mut parts = stored.split(':');
        let (Some(iv), Some(data), Some(tag), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(CipherError::Malformed);
        };

        let iv = hex::decode(iv)?;
        let mut buffer = hex::decode(data)?;
        let tag = hex::decode(tag)?;

        if iv.len() != IV_LEN || tag.len() != TAG_LEN {
            return Err(CipherError::Malformed);
        }

        self.cipher()?
            .decrypt_in_place_detached(
                Nonce::<U16>::from_slice(&iv),
                b"",
                &mut buffer,
                Tag::from_slice(&tag),
            )
            .map_err(|_| CipherError::Authentication)?;

        String::from_utf8(buffer).map_err(|_| CipherError::InvalidUtf8)
    }

    /// `None` or blank values are in-progress markers; failures become the error sentinel
    pub fn reveal(&self, stored: Option<&str>) -> RevealedGrade {
        let Some(stored) = stored.filter(|s| !s.trim().is_empty()) else {
            return RevealedGrade::Empty;
        };

        match self.decrypt(stored) {
            Ok(value) => RevealedGrade::Value(value),
            Err(e) => {
                warn!("Failed to decrypt grade: {}", e);
                RevealedGrade::Error
            }
        }
    }
}
