// JWT生成と検証（jsonwebtoken実装）

use crate::common::auth::Claims;
use crate::common::error::LedgerError;
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};

/// JWTトークンを生成
///
/// # Arguments
/// * `user_id` - ユーザーID（sub claim）
/// * `username` - ユーザー名
/// * `secret` - JWTシークレットキー
/// * `expiration_hours` - 有効期限（時間）
///
/// # Returns
/// * `Ok(String)` - JWTトークン
/// * `Err(LedgerError)` - 生成失敗
pub fn create_jwt(
    user_id: i64,
    username: &str,
    secret: &str,
    expiration_hours: i64,
) -> Result<String, LedgerError> {
    let expiration = Utc::now()
        .checked_add_signed(chrono::Duration::hours(expiration_hours))
        .ok_or_else(|| LedgerError::Jwt("Failed to calculate expiration time".to_string()))?
        .timestamp() as usize;

    let claims = Claims {
        sub: user_id.to_string(),
        username: username.to_string(),
        exp: expiration,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| LedgerError::Jwt(format!("Failed to create JWT: {}", e)))
}

/// JWTトークンを検証
///
/// # Returns
/// * `Ok(Claims)` - 検証済みクレーム
/// * `Err(LedgerError)` - 検証失敗（無効なトークン、期限切れなど）
pub fn verify_jwt(token: &str, secret: &str) -> Result<Claims, LedgerError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| LedgerError::Jwt(format!("Failed to verify JWT: {}", e)))
}
