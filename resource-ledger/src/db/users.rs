// ユーザーCRUD操作

use super::{format_timestamp, parse_timestamp};
use crate::common::auth::User;
use crate::common::error::{is_unique_violation, LedgerError, LedgerResult};
use crate::types::user::is_valid_email;
use chrono::Utc;
use sqlx::SqlitePool;

const USER_COLUMNS: &str = "id, username, email, password_hash, names, created_at, updated_at";

/// ユーザーを作成
///
/// # Arguments
/// * `pool` - データベース接続プール
/// * `username` - ユーザー名
/// * `email` - メールアドレス
/// * `password_hash` - bcryptハッシュ化されたパスワード
/// * `names` - 氏名
///
/// # Returns
/// * `Ok(User)` - 作成されたユーザー
/// * `Err(LedgerError::Conflict)` - ユーザー名またはメールアドレスが重複
pub async fn create(
    pool: &SqlitePool,
    username: &str,
    email: &str,
    password_hash: &str,
    names: &str,
) -> LedgerResult<User> {
    let now = Utc::now();
    let ts = format_timestamp(&now);

    let result = sqlx::query(
        "INSERT INTO users (username, email, password_hash, names, created_at, updated_at)
         VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(username)
    .bind(email)
    .bind(password_hash)
    .bind(names)
    .bind(&ts)
    .bind(&ts)
    .execute(pool)
    .await
    .map_err(|e| {
        if is_unique_violation(&e) {
            LedgerError::Conflict(format!(
                "Username '{}' or email '{}' already exists",
                username, email
            ))
        } else {
            LedgerError::store("Failed to create user", e)
        }
    })?;

    let created_at = parse_timestamp(&ts)?;
    Ok(User {
        id: result.last_insert_rowid(),
        username: username.to_string(),
        email: email.to_string(),
        password_hash: password_hash.to_string(),
        names: names.to_string(),
        created_at,
        updated_at: created_at,
    })
}

/// IDでユーザーを検索
pub async fn find_by_id(pool: &SqlitePool, id: i64) -> LedgerResult<Option<User>> {
    find_one(pool, "id = ?", Bind::Int(id)).await
}

/// ユーザー名でユーザーを検索
pub async fn find_by_username(pool: &SqlitePool, username: &str) -> LedgerResult<Option<User>> {
    find_one(pool, "username = ?", Bind::Text(username)).await
}

/// メールアドレスでユーザーを検索
pub async fn find_by_email(pool: &SqlitePool, email: &str) -> LedgerResult<Option<User>> {
    find_one(pool, "email = ?", Bind::Text(email)).await
}

/// ログイン識別子（メールアドレスまたはユーザー名）でユーザーを検索
///
/// メールアドレスとして解釈できる識別子はメールアドレスで、それ以外はユーザー名で検索する。
pub async fn find_by_identity(pool: &SqlitePool, identity: &str) -> LedgerResult<Option<User>> {
    if is_valid_email(identity) {
        find_by_email(pool, identity).await
    } else {
        find_by_username(pool, identity).await
    }
}

/// すべてのユーザーを取得（ID昇順）
pub async fn list(pool: &SqlitePool) -> LedgerResult<Vec<User>> {
    let rows = sqlx::query_as::<_, UserRow>(&format!(
        "SELECT {} FROM users ORDER BY id ASC",
        USER_COLUMNS
    ))
    .fetch_all(pool)
    .await
    .map_err(|e| LedgerError::store("Failed to list users", e))?;

    rows.into_iter().map(UserRow::into_user).collect()
}

/// ユーザー更新内容（Noneのフィールドは変更しない）
#[derive(Debug, Clone, Copy, Default)]
pub struct UserChanges<'a> {
    /// 新しいユーザー名
    pub username: Option<&'a str>,
    /// 新しいメールアドレス
    pub email: Option<&'a str>,
    /// 新しい氏名
    pub names: Option<&'a str>,
    /// 新しいパスワードハッシュ
    pub password_hash: Option<&'a str>,
}

/// ユーザーを更新
///
/// # Arguments
/// * `pool` - データベース接続プール
/// * `id` - ユーザーID
/// * `changes` - 更新内容
///
/// # Returns
/// * `Ok(User)` - 更新されたユーザー
/// * `Err(LedgerError::NotFound)` - ユーザーが存在しない
/// * `Err(LedgerError::Conflict)` - ユーザー名またはメールアドレスが重複
pub async fn update(pool: &SqlitePool, id: i64, changes: UserChanges<'_>) -> LedgerResult<User> {
    let current = find_by_id(pool, id)
        .await?
        .ok_or_else(|| LedgerError::NotFound(format!("user {}", id)))?;

    let new_username = changes.username.unwrap_or(&current.username);
    let new_email = changes.email.unwrap_or(&current.email);
    let new_names = changes.names.unwrap_or(&current.names);
    let new_password_hash = changes.password_hash.unwrap_or(&current.password_hash);
    let now = Utc::now();

    sqlx::query(
        "UPDATE users SET username = ?, email = ?, names = ?, password_hash = ?, updated_at = ?
         WHERE id = ?",
    )
    .bind(new_username)
    .bind(new_email)
    .bind(new_names)
    .bind(new_password_hash)
    .bind(format_timestamp(&now))
    .bind(id)
    .execute(pool)
    .await
    .map_err(|e| {
        if is_unique_violation(&e) {
            LedgerError::Conflict(format!(
                "Username '{}' or email '{}' already exists",
                new_username, new_email
            ))
        } else {
            LedgerError::store("Failed to update user", e)
        }
    })?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| LedgerError::NotFound(format!("user {}", id)))
}

/// ユーザーを削除
///
/// 履歴エントリは外部キーを持たないため、削除後もそのユーザーの操作履歴は残る。
pub async fn delete(pool: &SqlitePool, id: i64) -> LedgerResult<()> {
    let result = sqlx::query("DELETE FROM users WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await
        .map_err(|e| LedgerError::store("Failed to delete user", e))?;

    if result.rows_affected() == 0 {
        return Err(LedgerError::NotFound(format!("user {}", id)));
    }
    Ok(())
}

/// ユーザー数を取得
pub async fn count(pool: &SqlitePool) -> LedgerResult<i64> {
    sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(pool)
        .await
        .map_err(|e| LedgerError::store("Failed to count users", e))
}

enum Bind<'a> {
    Int(i64),
    Text(&'a str),
}

async fn find_one(pool: &SqlitePool, condition: &str, value: Bind<'_>) -> LedgerResult<Option<User>> {
    let sql = format!("SELECT {} FROM users WHERE {}", USER_COLUMNS, condition);
    let query = sqlx::query_as::<_, UserRow>(&sql);
    let query = match value {
        Bind::Int(v) => query.bind(v),
        Bind::Text(v) => query.bind(v),
    };
    let row = query
        .fetch_optional(pool)
        .await
        .map_err(|e| LedgerError::store("Failed to find user", e))?;

    row.map(UserRow::into_user).transpose()
}

// SQLiteからの行取得用の内部型
#[derive(sqlx::FromRow)]
struct UserRow {
    id: i64,
    username: String,
    email: String,
    password_hash: String,
    names: String,
    created_at: String,
    updated_at: String,
}

impl UserRow {
    fn into_user(self) -> LedgerResult<User> {
        Ok(User {
            id: self.id,
            username: self.username,
            email: self.email,
            password_hash: self.password_hash,
            names: self.names,
            created_at: parse_timestamp(&self.created_at)?,
            updated_at: parse_timestamp(&self.updated_at)?,
        })
    }
}
