//! Repository traitパターン定義
//!
//! DB操作を抽象化し、テスタビリティを向上させるためのtrait群。
//! 各traitは既存のフリー関数に対応する。
//!
//! リソースと履歴のtraitは`&mut SqliteConnection`を受け取る。呼び出し側が
//! 開始したトランザクションの中で、リソース変更と履歴追記を同一単位として
//! 実行するため。

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{SqliteConnection, SqlitePool};

use super::users::UserChanges;
use crate::audit::types::{NewHistoryEntry, ResourceHistoryEntry};
use crate::common::auth::User;
use crate::common::error::LedgerResult;
use crate::types::resource::{NewResource, Resource};

// ---------------------------------------------------------------------------
// ResourceStore
// ---------------------------------------------------------------------------

/// 現在のリソース状態を保持するストア
#[async_trait]
pub trait ResourceStore: Send + Sync {
    /// リソースを作成して採番済みのリソースを返す
    async fn insert(
        &self,
        conn: &mut SqliteConnection,
        candidate: &NewResource,
        now: DateTime<Utc>,
    ) -> LedgerResult<Resource>;
    /// IDで未削除のリソースを取得
    async fn find(&self, conn: &mut SqliteConnection, id: i64) -> LedgerResult<Option<Resource>>;
    /// 未削除のリソース一覧
    async fn list(&self, conn: &mut SqliteConnection) -> LedgerResult<Vec<Resource>>;
    /// 未削除のリソース数
    async fn count(&self, conn: &mut SqliteConnection) -> LedgerResult<i64>;
    /// リソースの全フィールドを保存
    async fn save(&self, conn: &mut SqliteConnection, resource: &Resource) -> LedgerResult<()>;
    /// リソースを論理削除
    async fn soft_delete(
        &self,
        conn: &mut SqliteConnection,
        id: i64,
        at: DateTime<Utc>,
    ) -> LedgerResult<()>;
}

// ---------------------------------------------------------------------------
// HistoryStore
// ---------------------------------------------------------------------------

/// 追記専用の変更履歴ストア
#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// 履歴エントリを追記して採番されたIDを返す
    async fn append(&self, conn: &mut SqliteConnection, entry: &NewHistoryEntry)
        -> LedgerResult<i64>;
    /// リソースの履歴一覧（新しい順）
    async fn list_by_resource(
        &self,
        conn: &mut SqliteConnection,
        resource_id: i64,
    ) -> LedgerResult<Vec<ResourceHistoryEntry>>;
}

// ---------------------------------------------------------------------------
// UserRepository
// ---------------------------------------------------------------------------

/// ユーザーCRUD操作のRepository trait
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// ユーザーを作成
    async fn create_user(
        &self,
        username: &str,
        email: &str,
        password_hash: &str,
        names: &str,
    ) -> LedgerResult<User>;
    /// IDでユーザーを取得
    async fn find_by_id(&self, id: i64) -> LedgerResult<Option<User>>;
    /// ログイン識別子（メールアドレスまたはユーザー名）でユーザーを取得
    async fn find_by_identity(&self, identity: &str) -> LedgerResult<Option<User>>;
    /// ユーザー一覧
    async fn list_users(&self) -> LedgerResult<Vec<User>>;
    /// ユーザーを更新
    async fn update_user(&self, id: i64, changes: UserChanges<'_>) -> LedgerResult<User>;
    /// ユーザーを削除
    async fn delete_user(&self, id: i64) -> LedgerResult<()>;
    /// ユーザーが1人も存在しないか
    async fn is_first_boot(&self) -> LedgerResult<bool>;
}

// ===========================================================================
// SQLite implementations
// ===========================================================================

/// SQLiteの`resources`テーブルによるResourceStore
#[derive(Debug, Clone, Copy, Default)]
pub struct SqliteResourceStore;

#[async_trait]
impl ResourceStore for SqliteResourceStore {
    async fn insert(
        &self,
        conn: &mut SqliteConnection,
        candidate: &NewResource,
        now: DateTime<Utc>,
    ) -> LedgerResult<Resource> {
        super::resources::insert(conn, candidate, now).await
    }

    async fn find(&self, conn: &mut SqliteConnection, id: i64) -> LedgerResult<Option<Resource>> {
        super::resources::find(conn, id).await
    }

    async fn list(&self, conn: &mut SqliteConnection) -> LedgerResult<Vec<Resource>> {
        super::resources::list(conn).await
    }

    async fn count(&self, conn: &mut SqliteConnection) -> LedgerResult<i64> {
        super::resources::count(conn).await
    }

    async fn save(&self, conn: &mut SqliteConnection, resource: &Resource) -> LedgerResult<()> {
        super::resources::save(conn, resource).await
    }

    async fn soft_delete(
        &self,
        conn: &mut SqliteConnection,
        id: i64,
        at: DateTime<Utc>,
    ) -> LedgerResult<()> {
        super::resources::soft_delete(conn, id, at).await
    }
}

/// SQLiteの`resource_history`テーブルによるHistoryStore
#[derive(Debug, Clone, Copy, Default)]
pub struct SqliteHistoryStore;

#[async_trait]
impl HistoryStore for SqliteHistoryStore {
    async fn append(
        &self,
        conn: &mut SqliteConnection,
        entry: &NewHistoryEntry,
    ) -> LedgerResult<i64> {
        super::resource_history::append(conn, entry).await
    }

    async fn list_by_resource(
        &self,
        conn: &mut SqliteConnection,
        resource_id: i64,
    ) -> LedgerResult<Vec<ResourceHistoryEntry>> {
        super::resource_history::list_by_resource(conn, resource_id).await
    }
}

#[async_trait]
impl UserRepository for SqlitePool {
    async fn create_user(
        &self,
        username: &str,
        email: &str,
        password_hash: &str,
        names: &str,
    ) -> LedgerResult<User> {
        super::users::create(self, username, email, password_hash, names).await
    }

    async fn find_by_id(&self, id: i64) -> LedgerResult<Option<User>> {
        super::users::find_by_id(self, id).await
    }

    async fn find_by_identity(&self, identity: &str) -> LedgerResult<Option<User>> {
        super::users::find_by_identity(self, identity).await
    }

    async fn list_users(&self) -> LedgerResult<Vec<User>> {
        super::users::list(self).await
    }

    async fn update_user(&self, id: i64, changes: UserChanges<'_>) -> LedgerResult<User> {
        super::users::update(self, id, changes).await
    }

    async fn delete_user(&self, id: i64) -> LedgerResult<()> {
        super::users::delete(self, id).await
    }

    async fn is_first_boot(&self) -> LedgerResult<bool> {
        Ok(super::users::count(self).await? == 0)
    }
}
