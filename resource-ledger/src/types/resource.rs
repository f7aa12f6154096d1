//! 在庫リソースの型定義と入力検証

use crate::common::error::LedgerError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// リソース名の最小文字数
pub const NAME_MIN_CHARS: usize = 2;
/// リソース名の最大文字数
pub const NAME_MAX_CHARS: usize = 100;
/// 単位の最小文字数
pub const UNIT_MIN_CHARS: usize = 1;
/// 単位の最大文字数
pub const UNIT_MAX_CHARS: usize = 20;

/// 在庫リソース
///
/// 履歴スナップショットにもこの構造体全体がそのまま保存される。
/// `alias`はバージョンタグなしで保存された旧形式スナップショット
/// （`ID`/`CreatedAt`等の大文字キー）を読み戻すためのもの。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    /// リソースID
    #[serde(alias = "ID")]
    pub id: i64,
    /// 名前（未削除リソース間で一意）
    pub name: String,
    /// 説明
    #[serde(default)]
    pub description: String,
    /// 単位（kg, l など）
    pub unit: String,
    /// 数量（0以上）
    pub quantity: i64,
    /// 作成日時
    #[serde(alias = "CreatedAt")]
    pub created_at: DateTime<Utc>,
    /// 更新日時
    #[serde(alias = "UpdatedAt")]
    pub updated_at: DateTime<Utc>,
    /// 論理削除日時
    #[serde(alias = "DeletedAt", default, skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
}

/// リソース作成入力
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewResource {
    /// 名前
    pub name: String,
    /// 説明
    #[serde(default)]
    pub description: String,
    /// 単位
    pub unit: String,
    /// 数量
    #[serde(default)]
    pub quantity: i64,
}

impl NewResource {
    /// 入力制約を検証する（ストレージに触れる前に呼ぶ）
    pub fn validate(&self) -> Result<(), LedgerError> {
        validate_name(&self.name)?;
        validate_unit(&self.unit)?;
        validate_quantity(self.quantity)
    }
}

/// リソース部分更新入力
///
/// `None`のフィールドは変更しない。「存在しない」と「空/ゼロ」を区別する。
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ResourceUpdate {
    /// 名前
    pub name: Option<String>,
    /// 説明
    pub description: Option<String>,
    /// 単位
    pub unit: Option<String>,
    /// 数量
    pub quantity: Option<i64>,
}

impl ResourceUpdate {
    /// 指定されたフィールドのみ検証する
    pub fn validate(&self) -> Result<(), LedgerError> {
        if let Some(name) = &self.name {
            validate_name(name)?;
        }
        if let Some(unit) = &self.unit {
            validate_unit(unit)?;
        }
        if let Some(quantity) = self.quantity {
            validate_quantity(quantity)?;
        }
        Ok(())
    }

    /// 現在の状態に更新を適用した新しい状態を返す
    pub fn apply_to(&self, current: &Resource, now: DateTime<Utc>) -> Resource {
        Resource {
            id: current.id,
            name: self.name.clone().unwrap_or_else(|| current.name.clone()),
            description: self
                .description
                .clone()
                .unwrap_or_else(|| current.description.clone()),
            unit: self.unit.clone().unwrap_or_else(|| current.unit.clone()),
            quantity: self.quantity.unwrap_or(current.quantity),
            created_at: current.created_at,
            updated_at: now,
            deleted_at: current.deleted_at,
        }
    }
}

/// 2つのスナップショット間で値が変わったユーザー可視フィールド名
pub fn changed_fields(before: &Resource, after: &Resource) -> Vec<&'static str> {
    let mut fields = Vec::new();
    if before.name != after.name {
        fields.push("name");
    }
    if before.description != after.description {
        fields.push("description");
    }
    if before.unit != after.unit {
        fields.push("unit");
    }
    if before.quantity != after.quantity {
        fields.push("quantity");
    }
    fields
}

fn validate_name(name: &str) -> Result<(), LedgerError> {
    let len = name.chars().count();
    if !(NAME_MIN_CHARS..=NAME_MAX_CHARS).contains(&len) || name.trim().is_empty() {
        return Err(LedgerError::Validation(format!(
            "name must be {}-{} characters",
            NAME_MIN_CHARS, NAME_MAX_CHARS
        )));
    }
    Ok(())
}

fn validate_unit(unit: &str) -> Result<(), LedgerError> {
    let len = unit.chars().count();
    if !(UNIT_MIN_CHARS..=UNIT_MAX_CHARS).contains(&len) || unit.trim().is_empty() {
        return Err(LedgerError::Validation(format!(
            "unit must be {}-{} characters",
            UNIT_MIN_CHARS, UNIT_MAX_CHARS
        )));
    }
    Ok(())
}

fn validate_quantity(quantity: i64) -> Result<(), LedgerError> {
    if quantity < 0 {
        return Err(LedgerError::Validation(
            "quantity must not be negative".to_string(),
        ));
    }
    Ok(())
}
