// リソースストア: 現在のリソース状態を保持する
//
// すべての関数は`&mut SqliteConnection`を受け取り、呼び出し側の
// トランザクション内で実行できる。

use super::{format_timestamp, parse_timestamp};
use crate::common::error::{is_unique_violation, LedgerError, LedgerResult};
use crate::types::resource::{NewResource, Resource};
use chrono::{DateTime, Utc};
use sqlx::SqliteConnection;

const RESOURCE_COLUMNS: &str =
    "id, name, description, unit, quantity, created_at, updated_at, deleted_at";

/// リソースを作成
///
/// # Returns
/// * `Ok(Resource)` - 採番済みのリソース
/// * `Err(LedgerError::DuplicateName)` - 未削除リソースと名前が重複
/// * `Err(LedgerError::StoreWrite)` - 書き込み失敗
pub async fn insert(
    conn: &mut SqliteConnection,
    candidate: &NewResource,
    now: DateTime<Utc>,
) -> LedgerResult<Resource> {
    let ts = format_timestamp(&now);
    let result = sqlx::query(
        "INSERT INTO resources (name, description, unit, quantity, created_at, updated_at, deleted_at)
         VALUES (?, ?, ?, ?, ?, ?, NULL)",
    )
    .bind(&candidate.name)
    .bind(&candidate.description)
    .bind(&candidate.unit)
    .bind(candidate.quantity)
    .bind(&ts)
    .bind(&ts)
    .execute(&mut *conn)
    .await
    .map_err(|e| map_write_error(e, &candidate.name, "Failed to create resource"))?;

    Ok(Resource {
        id: result.last_insert_rowid(),
        name: candidate.name.clone(),
        description: candidate.description.clone(),
        unit: candidate.unit.clone(),
        quantity: candidate.quantity,
        created_at: parse_timestamp(&ts)?,
        updated_at: parse_timestamp(&ts)?,
        deleted_at: None,
    })
}

/// IDで未削除のリソースを取得
pub async fn find(conn: &mut SqliteConnection, id: i64) -> LedgerResult<Option<Resource>> {
    let row = sqlx::query_as::<_, ResourceRow>(&format!(
        "SELECT {} FROM resources WHERE id = ? AND deleted_at IS NULL",
        RESOURCE_COLUMNS
    ))
    .bind(id)
    .fetch_optional(&mut *conn)
    .await
    .map_err(|e| LedgerError::store("Failed to find resource", e))?;

    row.map(ResourceRow::into_resource).transpose()
}

/// 論理削除済みを含めてリソース行が存在するか
pub async fn exists_including_deleted(conn: &mut SqliteConnection, id: i64) -> LedgerResult<bool> {
    let exists: i64 = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM resources WHERE id = ?)")
        .bind(id)
        .fetch_one(&mut *conn)
        .await
        .map_err(|e| LedgerError::store("Failed to check resource", e))?;
    Ok(exists != 0)
}

/// 未削除のリソース一覧（ID昇順）
pub async fn list(conn: &mut SqliteConnection) -> LedgerResult<Vec<Resource>> {
    let rows = sqlx::query_as::<_, ResourceRow>(&format!(
        "SELECT {} FROM resources WHERE deleted_at IS NULL ORDER BY id ASC",
        RESOURCE_COLUMNS
    ))
    .fetch_all(&mut *conn)
    .await
    .map_err(|e| LedgerError::store("Failed to list resources", e))?;

    rows.into_iter().map(ResourceRow::into_resource).collect()
}

/// 未削除のリソース数
pub async fn count(conn: &mut SqliteConnection) -> LedgerResult<i64> {
    sqlx::query_scalar("SELECT COUNT(*) FROM resources WHERE deleted_at IS NULL")
        .fetch_one(&mut *conn)
        .await
        .map_err(|e| LedgerError::store("Failed to count resources", e))
}

/// リソースの全フィールドを保存（更新）
///
/// # Returns
/// * `Err(LedgerError::NotFound)` - 対象が存在しない、または削除済み
/// * `Err(LedgerError::DuplicateName)` - 名前変更が他リソースと衝突
pub async fn save(conn: &mut SqliteConnection, resource: &Resource) -> LedgerResult<()> {
    let result = sqlx::query(
        "UPDATE resources SET name = ?, description = ?, unit = ?, quantity = ?, updated_at = ?
         WHERE id = ? AND deleted_at IS NULL",
    )
    .bind(&resource.name)
    .bind(&resource.description)
    .bind(&resource.unit)
    .bind(resource.quantity)
    .bind(format_timestamp(&resource.updated_at))
    .bind(resource.id)
    .execute(&mut *conn)
    .await
    .map_err(|e| map_write_error(e, &resource.name, "Failed to update resource"))?;

    if result.rows_affected() == 0 {
        return Err(LedgerError::NotFound(format!("resource {}", resource.id)));
    }
    Ok(())
}

/// リソースを論理削除
pub async fn soft_delete(
    conn: &mut SqliteConnection,
    id: i64,
    at: DateTime<Utc>,
) -> LedgerResult<()> {
    let ts = format_timestamp(&at);
    let result = sqlx::query(
        "UPDATE resources SET deleted_at = ?, updated_at = ? WHERE id = ? AND deleted_at IS NULL",
    )
    .bind(&ts)
    .bind(&ts)
    .bind(id)
    .execute(&mut *conn)
    .await
    .map_err(|e| LedgerError::store("Failed to delete resource", e))?;

    if result.rows_affected() == 0 {
        return Err(LedgerError::NotFound(format!("resource {}", id)));
    }
    Ok(())
}

fn map_write_error(err: sqlx::Error, name: &str, context: &str) -> LedgerError {
    if is_unique_violation(&err) {
        LedgerError::DuplicateName(format!("Resource '{}' already exists", name))
    } else {
        LedgerError::store(context, err)
    }
}

// SQLiteからの行取得用の内部型
#[derive(sqlx::FromRow)]
struct ResourceRow {
    id: i64,
    name: String,
    description: String,
    unit: String,
    quantity: i64,
    created_at: String,
    updated_at: String,
    deleted_at: Option<String>,
}

impl ResourceRow {
    fn into_resource(self) -> LedgerResult<Resource> {
        Ok(Resource {
            id: self.id,
            name: self.name,
            description: self.description,
            unit: self.unit,
            quantity: self.quantity,
            created_at: parse_timestamp(&self.created_at)?,
            updated_at: parse_timestamp(&self.updated_at)?,
            deleted_at: self.deleted_at.as_deref().map(parse_timestamp).transpose()?,
        })
    }
}
