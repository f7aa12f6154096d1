//! リソースサービス
//!
//! リソースの作成・更新・削除を、履歴の追記と同一トランザクションで実行する。
//!
//! 変更操作の手順:
//! 1. 入力検証（失敗時はストレージに触れない）
//! 2. 更新/削除では現在のリソースを取得（存在しなければトランザクションを開かずNotFound）
//! 3. トランザクション開始
//! 4. リソース変更（更新/削除では変更前の状態をトランザクション内で再取得）
//! 5. 履歴を追記
//! 6. 4-5のいずれかが失敗したらロールバック
//! 7. コミット後にのみ結果を返す

use crate::audit::recorder::{AuditRecorder, Change};
use crate::audit::types::{HistoryAction, ResourceHistoryEntry};
use crate::common::auth::ActingUser;
use crate::common::error::{LedgerError, LedgerResult};
use crate::db::traits::{HistoryStore, ResourceStore, SqliteHistoryStore, SqliteResourceStore};
use crate::types::resource::{changed_fields, NewResource, Resource, ResourceUpdate};
use chrono::Utc;
use sqlx::{Sqlite, SqlitePool, Transaction};
use std::sync::Arc;
use tracing::{info, warn};

/// リソースサービス
#[derive(Clone)]
pub struct ResourceService {
    pool: SqlitePool,
    resources: Arc<dyn ResourceStore>,
    recorder: AuditRecorder,
}

impl ResourceService {
    /// ストアとレコーダーを注入してサービスを作成
    pub fn new(
        pool: SqlitePool,
        resources: Arc<dyn ResourceStore>,
        history: Arc<dyn HistoryStore>,
    ) -> Self {
        Self {
            pool,
            resources,
            recorder: AuditRecorder::new(history),
        }
    }

    /// SQLiteストアを使うサービスを作成
    pub fn sqlite(pool: SqlitePool) -> Self {
        Self::new(
            pool,
            Arc::new(SqliteResourceStore),
            Arc::new(SqliteHistoryStore),
        )
    }

    /// リソースを作成
    ///
    /// # Returns
    /// * `Ok(Resource)` - コミット済みのリソース
    /// * `Err(LedgerError::Validation)` - 入力制約違反
    /// * `Err(LedgerError::DuplicateName)` - 名前が重複
    pub async fn create(&self, actor: &ActingUser, candidate: NewResource) -> LedgerResult<Resource> {
        candidate.validate()?;

        let mut tx = self.begin().await?;
        let outcome = async {
            let created = self.resources.insert(&mut tx, &candidate, Utc::now()).await?;
            let description = format!("Resource '{}' created", created.name);
            self.recorder
                .record(
                    &mut tx,
                    Change {
                        resource_id: created.id,
                        action: HistoryAction::Create,
                        actor: actor.id,
                        before: None,
                        after: Some(&created),
                        description: &description,
                    },
                )
                .await?;
            Ok::<_, LedgerError>(created)
        }
        .await;

        let created = finish(tx, outcome).await?;
        info!(
            resource_id = created.id,
            actor = %actor.id,
            "Resource created: {}",
            created.name
        );
        Ok(created)
    }

    /// IDでリソースを取得
    pub async fn get(&self, id: i64) -> LedgerResult<Resource> {
        let mut conn = self.acquire().await?;
        self.resources
            .find(&mut conn, id)
            .await?
            .ok_or_else(|| LedgerError::NotFound(format!("resource {}", id)))
    }

    /// 未削除のリソース一覧
    pub async fn list(&self) -> LedgerResult<Vec<Resource>> {
        let mut conn = self.acquire().await?;
        self.resources.list(&mut conn).await
    }

    /// 未削除のリソース数
    pub async fn count(&self) -> LedgerResult<i64> {
        let mut conn = self.acquire().await?;
        self.resources.count(&mut conn).await
    }

    /// リソースを部分更新
    ///
    /// 指定されたフィールドのみ上書きする。変更がなくてもUPDATE履歴は1件記録される。
    pub async fn update(
        &self,
        actor: &ActingUser,
        id: i64,
        update: ResourceUpdate,
    ) -> LedgerResult<Resource> {
        update.validate()?;
        self.require_live(id).await?;

        let mut tx = self.begin().await?;
        let outcome = async {
            let before = self
                .resources
                .find(&mut tx, id)
                .await?
                .ok_or_else(|| LedgerError::NotFound(format!("resource {}", id)))?;
            let after = update.apply_to(&before, Utc::now());
            self.resources.save(&mut tx, &after).await?;

            let description = describe_update(&before, &after);
            self.recorder
                .record(
                    &mut tx,
                    Change {
                        resource_id: id,
                        action: HistoryAction::Update,
                        actor: actor.id,
                        before: Some(&before),
                        after: Some(&after),
                        description: &description,
                    },
                )
                .await?;
            Ok::<_, LedgerError>(after)
        }
        .await;

        let updated = finish(tx, outcome).await?;
        info!(resource_id = id, actor = %actor.id, "Resource updated: {}", updated.name);
        Ok(updated)
    }

    /// リソースを論理削除
    ///
    /// # Returns
    /// * `Ok(Resource)` - 削除直前の状態
    /// * `Err(LedgerError::NotFound)` - 存在しない、または削除済み
    pub async fn delete(&self, actor: &ActingUser, id: i64) -> LedgerResult<Resource> {
        self.require_live(id).await?;

        let mut tx = self.begin().await?;
        let outcome = async {
            let before = self
                .resources
                .find(&mut tx, id)
                .await?
                .ok_or_else(|| LedgerError::NotFound(format!("resource {}", id)))?;
            self.resources.soft_delete(&mut tx, id, Utc::now()).await?;

            let description = format!("Resource '{}' deleted", before.name);
            self.recorder
                .record(
                    &mut tx,
                    Change {
                        resource_id: id,
                        action: HistoryAction::Delete,
                        actor: actor.id,
                        before: Some(&before),
                        after: None,
                        description: &description,
                    },
                )
                .await?;
            Ok::<_, LedgerError>(before)
        }
        .await;

        let deleted = finish(tx, outcome).await?;
        info!(resource_id = id, actor = %actor.id, "Resource deleted: {}", deleted.name);
        Ok(deleted)
    }

    /// リソースの変更履歴（新しい順）
    ///
    /// 削除済みリソースの履歴も返す。
    pub async fn history(&self, id: i64) -> LedgerResult<Vec<ResourceHistoryEntry>> {
        let mut conn = self.acquire().await?;
        self.recorder.store().list_by_resource(&mut conn, id).await
    }

    async fn require_live(&self, id: i64) -> LedgerResult<()> {
        let mut conn = self.acquire().await?;
        match self.resources.find(&mut conn, id).await? {
            Some(_) => Ok(()),
            None => Err(LedgerError::NotFound(format!("resource {}", id))),
        }
    }

    async fn acquire(&self) -> LedgerResult<sqlx::pool::PoolConnection<Sqlite>> {
        self.pool
            .acquire()
            .await
            .map_err(|e| LedgerError::store("Failed to acquire connection", e))
    }

    /// 書き込みロックを取得した状態でトランザクションを開始する
    ///
    /// 同一リソースへの並行変更は開始時点で直列化され、後にコミットした方が勝つ。
    async fn begin(&self) -> LedgerResult<Transaction<'static, Sqlite>> {
        self.pool
            .begin_with("BEGIN IMMEDIATE")
            .await
            .map_err(|e| LedgerError::store("Failed to begin transaction", e))
    }
}

/// 結果に応じてコミットまたはロールバックする
async fn finish<T>(tx: Transaction<'static, Sqlite>, outcome: LedgerResult<T>) -> LedgerResult<T> {
    match outcome {
        Ok(value) => {
            tx.commit()
                .await
                .map_err(|e| LedgerError::store("Failed to commit transaction", e))?;
            Ok(value)
        }
        Err(err) => {
            if let Err(rollback_err) = tx.rollback().await {
                warn!("Failed to roll back transaction: {}", rollback_err);
            }
            warn!(error_type = err.error_type(), "Resource mutation rolled back: {}", err);
            Err(err)
        }
    }
}

fn describe_update(before: &Resource, after: &Resource) -> String {
    let fields = changed_fields(before, after);
    if fields.is_empty() {
        format!("Resource '{}' updated (no changes)", after.name)
    } else {
        format!("Resource '{}' updated ({})", after.name, fields.join(", "))
    }
}
