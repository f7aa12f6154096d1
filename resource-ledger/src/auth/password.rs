// パスワードハッシュ化と検証（bcrypt実装）

use crate::common::error::LedgerError;
use bcrypt::{hash, verify};

/// パスワードハッシュ化のコスト（12推奨、200-300ms）
#[cfg(not(test))]
const HASH_COST: u32 = 12;
#[cfg(test)]
const HASH_COST: u32 = 4;

/// パスワードの最小文字数
pub const PASSWORD_MIN_CHARS: usize = 6;
/// パスワードの最大文字数
pub const PASSWORD_MAX_CHARS: usize = 50;

/// パスワードをbcryptでハッシュ化
///
/// # Arguments
/// * `password` - ハッシュ化するパスワード
///
/// # Returns
/// * `Ok(String)` - bcryptハッシュ文字列（$2b$で始まる）
/// * `Err(LedgerError)` - ハッシュ化失敗
pub fn hash_password(password: &str) -> Result<String, LedgerError> {
    hash(password, HASH_COST)
        .map_err(|e| LedgerError::PasswordHash(format!("Failed to hash password: {}", e)))
}

/// パスワードを検証
///
/// # Returns
/// * `Ok(true)` - パスワード一致
/// * `Ok(false)` - パスワード不一致
/// * `Err(LedgerError)` - 検証失敗（ハッシュ形式不正など）
pub fn verify_password(password: &str, hash: &str) -> Result<bool, LedgerError> {
    verify(password, hash)
        .map_err(|e| LedgerError::PasswordHash(format!("Failed to verify password: {}", e)))
}

/// パスワードの長さ制約を検証
pub fn validate_password(password: &str) -> Result<(), LedgerError> {
    let len = password.chars().count();
    if !(PASSWORD_MIN_CHARS..=PASSWORD_MAX_CHARS).contains(&len) {
        return Err(LedgerError::Validation(format!(
            "password must be {}-{} characters",
            PASSWORD_MIN_CHARS, PASSWORD_MAX_CHARS
        )));
    }
    Ok(())
}
