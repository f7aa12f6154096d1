//! 変更履歴レコーダー
//!
//! 呼び出し側のトランザクション接続上で履歴を同期的に追記する。
//! 追記が失敗した場合、呼び出し側はトランザクション全体をロールバックする。

use crate::audit::snapshot;
use crate::audit::types::{HistoryAction, NewHistoryEntry};
use crate::common::auth::ActorId;
use crate::common::error::{LedgerError, LedgerResult};
use crate::db::traits::HistoryStore;
use crate::types::resource::Resource;
use chrono::Utc;
use sqlx::SqliteConnection;
use std::sync::Arc;

/// 記録対象の1件の変更
#[derive(Debug, Clone, Copy)]
pub struct Change<'a> {
    /// 対象リソースID
    pub resource_id: i64,
    /// 操作種別
    pub action: HistoryAction,
    /// 操作ユーザー
    pub actor: ActorId,
    /// 変更前の状態（CREATEではNone）
    pub before: Option<&'a Resource>,
    /// 変更後の状態（DELETEではNone）
    pub after: Option<&'a Resource>,
    /// 説明
    pub description: &'a str,
}

/// 変更履歴レコーダー
#[derive(Clone)]
pub struct AuditRecorder {
    history: Arc<dyn HistoryStore>,
}

impl AuditRecorder {
    /// 新しいレコーダーを作成
    pub fn new(history: Arc<dyn HistoryStore>) -> Self {
        Self { history }
    }

    /// 内部の履歴ストア
    pub fn store(&self) -> &Arc<dyn HistoryStore> {
        &self.history
    }

    /// 変更を1件追記する
    ///
    /// # Returns
    /// * `Ok(i64)` - 追記された履歴エントリID
    /// * `Err(LedgerError::Internal)` - 操作種別とスナップショットの組み合わせが不正
    /// * `Err(LedgerError::Serialization)` - スナップショットのエンコード失敗
    /// * `Err(LedgerError::StoreWrite)` - 追記失敗
    pub async fn record(&self, conn: &mut SqliteConnection, change: Change<'_>) -> LedgerResult<i64> {
        if !change
            .action
            .accepts_snapshots(change.before.is_some(), change.after.is_some())
        {
            return Err(LedgerError::Internal(format!(
                "{} entry for resource {} has inconsistent snapshots",
                change.action, change.resource_id
            )));
        }

        let entry = NewHistoryEntry {
            resource_id: change.resource_id,
            action: change.action,
            actor: change.actor,
            old_data: change.before.map(snapshot::encode).transpose()?,
            new_data: change.after.map(snapshot::encode).transpose()?,
            timestamp: Utc::now(),
            description: change.description.to_string(),
        };

        let id = self.history.append(conn, &entry).await?;
        tracing::debug!(
            history_id = id,
            resource_id = entry.resource_id,
            action = %entry.action,
            actor = %entry.actor,
            "History entry appended"
        );
        Ok(id)
    }
}
