// リソース変更履歴ストア
//
// 追記と読み取りのみを提供する。UPDATE/DELETEはスキーマ側のトリガーで拒否される。

use super::{format_timestamp, parse_timestamp};
use crate::audit::types::{HistoryAction, NewHistoryEntry, ResourceHistoryEntry};
use crate::common::error::{LedgerError, LedgerResult};
use sqlx::SqliteConnection;

/// 履歴エントリを追記
///
/// # Returns
/// * `Ok(i64)` - 採番されたエントリID
/// * `Err(LedgerError::StoreWrite)` - 書き込み失敗
pub async fn append(conn: &mut SqliteConnection, entry: &NewHistoryEntry) -> LedgerResult<i64> {
    let result = sqlx::query(
        "INSERT INTO resource_history
            (resource_id, action, user_id, old_data, new_data, timestamp, description)
         VALUES (?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(entry.resource_id)
    .bind(entry.action.as_str())
    .bind(entry.actor.0)
    .bind(&entry.old_data)
    .bind(&entry.new_data)
    .bind(format_timestamp(&entry.timestamp))
    .bind(&entry.description)
    .execute(&mut *conn)
    .await
    .map_err(|e| LedgerError::store("Failed to append history entry", e))?;

    Ok(result.last_insert_rowid())
}

/// リソースの履歴一覧（新しい順、同時刻はID降順）
///
/// リソースが論理削除済みでも履歴は返す。リソース行も履歴も一切ない
/// IDに対しては`NotFound`を返す。
pub async fn list_by_resource(
    conn: &mut SqliteConnection,
    resource_id: i64,
) -> LedgerResult<Vec<ResourceHistoryEntry>> {
    let rows = sqlx::query_as::<_, HistoryRow>(
        "SELECT h.id, h.resource_id, h.action, h.user_id, u.username AS actor_username,
                h.old_data, h.new_data, h.timestamp, h.description
         FROM resource_history h
         LEFT JOIN users u ON u.id = h.user_id
         WHERE h.resource_id = ?
         ORDER BY h.timestamp DESC, h.id DESC",
    )
    .bind(resource_id)
    .fetch_all(&mut *conn)
    .await
    .map_err(|e| LedgerError::store("Failed to list history", e))?;

    if rows.is_empty() && !super::resources::exists_including_deleted(conn, resource_id).await? {
        return Err(LedgerError::NotFound(format!("resource {}", resource_id)));
    }

    rows.into_iter().map(HistoryRow::into_entry).collect()
}

/// リソースの履歴件数
pub async fn count_for_resource(conn: &mut SqliteConnection, resource_id: i64) -> LedgerResult<i64> {
    sqlx::query_scalar("SELECT COUNT(*) FROM resource_history WHERE resource_id = ?")
        .bind(resource_id)
        .fetch_one(&mut *conn)
        .await
        .map_err(|e| LedgerError::store("Failed to count history", e))
}

#[derive(sqlx::FromRow)]
struct HistoryRow {
    id: i64,
    resource_id: i64,
    action: String,
    user_id: i64,
    actor_username: Option<String>,
    old_data: Option<String>,
    new_data: Option<String>,
    timestamp: String,
    description: String,
}

impl HistoryRow {
    fn into_entry(self) -> LedgerResult<ResourceHistoryEntry> {
        Ok(ResourceHistoryEntry {
            id: self.id,
            resource_id: self.resource_id,
            action: self.action.parse::<HistoryAction>()?,
            user_id: self.user_id,
            actor_username: self.actor_username,
            old_data: self.old_data,
            new_data: self.new_data,
            timestamp: parse_timestamp(&self.timestamp)?,
            description: self.description,
        })
    }
}
