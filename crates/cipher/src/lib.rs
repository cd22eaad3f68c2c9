mod error;
mod grade_cipher;

pub use error::CipherError;
pub use grade_cipher::{GradeCipher, SECRET_VARS, UserKey};
