// 認証関連のデータモデル

use crate::common::error::LedgerError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// ユーザー
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// ユーザーID
    pub id: i64,
    /// ユーザー名
    pub username: String,
    /// メールアドレス
    pub email: String,
    /// パスワードハッシュ（bcrypt）
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// 氏名（任意）
    pub names: String,
    /// 作成日時
    pub created_at: DateTime<Utc>,
    /// 更新日時
    pub updated_at: DateTime<Utc>,
}

/// JWTクレーム
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// ユーザーID（JWT sub claim）
    pub sub: String,
    /// ユーザー名
    pub username: String,
    /// 有効期限（Unix timestamp、JWT exp claim）
    pub exp: usize,
}

/// 検証済みの操作ユーザー
///
/// 認証ミドルウェアがClaimsから一度だけ生成し、以降はコアへ
/// プレーンな識別子として渡される。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActorId(pub i64);

impl std::fmt::Display for ActorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// リクエストごとの認証済みユーザー
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActingUser {
    /// ユーザーID
    pub id: ActorId,
    /// ユーザー名（ログ用）
    pub username: String,
}

impl From<&User> for ActingUser {
    fn from(user: &User) -> Self {
        Self {
            id: ActorId(user.id),
            username: user.username.clone(),
        }
    }
}

impl TryFrom<&Claims> for ActingUser {
    type Error = LedgerError;

    fn try_from(claims: &Claims) -> Result<Self, Self::Error> {
        let id = claims
            .sub
            .parse::<i64>()
            .map_err(|_| LedgerError::Jwt(format!("Invalid subject claim: {}", claims.sub)))?;
        Ok(Self {
            id: ActorId(id),
            username: claims.username.clone(),
        })
    }
}
