//! ユーザー入力の検証

use crate::common::error::LedgerError;

/// ユーザー名の最小文字数
pub const USERNAME_MIN_CHARS: usize = 3;
/// ユーザー名の最大文字数
pub const USERNAME_MAX_CHARS: usize = 50;

/// ユーザー名の長さ制約を検証
pub fn validate_username(username: &str) -> Result<(), LedgerError> {
    let len = username.chars().count();
    if !(USERNAME_MIN_CHARS..=USERNAME_MAX_CHARS).contains(&len) || username.trim().is_empty() {
        return Err(LedgerError::Validation(format!(
            "username must be {}-{} characters",
            USERNAME_MIN_CHARS, USERNAME_MAX_CHARS
        )));
    }
    Ok(())
}

/// メールアドレスとして解釈できるか
///
/// 形式のみの判定: `local@label.label[.label...]`。ドメインは2つ以上のラベルを持ち、
/// 空のラベル（`a@.x`, `a@b..c`, `a@b.`）は受け付けない。
pub fn is_valid_email(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    let mut labels = 0;
    for label in domain.split('.') {
        if label.is_empty() {
            return false;
        }
        labels += 1;
    }
    labels >= 2
}

/// メールアドレス形式を検証
pub fn validate_email(email: &str) -> Result<(), LedgerError> {
    if !is_valid_email(email) {
        return Err(LedgerError::Validation("email must be a valid address".to_string()));
    }
    Ok(())
}
