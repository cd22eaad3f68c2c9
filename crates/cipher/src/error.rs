use models::error::EngineError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CipherError {
    #[error("Grade encryption environment variable is not set")]
    MissingSecret,

    #[error("Invalid encrypted grade format")]
    Malformed,

    #[error("Encrypted grade is not valid hex")]
    InvalidHex(#[from] hex::FromHexError),

    /// Wrong key (secret or user) or tampered ciphertext
    #[error("Encrypted grade failed authentication")]
    Authentication,

    #[error("Decrypted grade is not valid UTF-8")]
    InvalidUtf8,

    #[error("Failed to encrypt grade")]
    Encryption,
}

impl From<CipherError> for EngineError {
    fn from(err: CipherError) -> Self {
        EngineError::Cipher(err.to_string())
    }
}
