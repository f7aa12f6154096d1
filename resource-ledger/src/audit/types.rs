//! リソース変更履歴の型定義

use crate::audit::snapshot;
use crate::common::auth::ActorId;
use crate::common::error::LedgerError;
use crate::types::resource::Resource;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 操作種別
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HistoryAction {
    /// 作成
    Create,
    /// 更新
    Update,
    /// 削除
    Delete,
}

impl HistoryAction {
    /// DB保存用の文字列
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "CREATE",
            Self::Update => "UPDATE",
            Self::Delete => "DELETE",
        }
    }

    /// 操作種別に対してbefore/afterの有無が正しいか
    ///
    /// CREATEはafterのみ、DELETEはbeforeのみ、UPDATEは両方。
    pub fn accepts_snapshots(&self, has_before: bool, has_after: bool) -> bool {
        match self {
            Self::Create => !has_before && has_after,
            Self::Update => has_before && has_after,
            Self::Delete => has_before && !has_after,
        }
    }
}

impl std::str::FromStr for HistoryAction {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CREATE" => Ok(Self::Create),
            "UPDATE" => Ok(Self::Update),
            "DELETE" => Ok(Self::Delete),
            other => Err(LedgerError::Serialization(format!(
                "Unknown history action: {}",
                other
            ))),
        }
    }
}

impl std::fmt::Display for HistoryAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// 追記前の履歴エントリ（IDはDB挿入時に採番）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewHistoryEntry {
    /// 対象リソースID
    pub resource_id: i64,
    /// 操作種別
    pub action: HistoryAction,
    /// 操作ユーザー
    pub actor: ActorId,
    /// 変更前スナップショット（エンコード済み）
    pub old_data: Option<String>,
    /// 変更後スナップショット（エンコード済み）
    pub new_data: Option<String>,
    /// 記録日時
    pub timestamp: DateTime<Utc>,
    /// 説明
    pub description: String,
}

/// 保存済みの履歴エントリ
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceHistoryEntry {
    /// エントリID
    pub id: i64,
    /// 対象リソースID
    pub resource_id: i64,
    /// 操作種別
    pub action: HistoryAction,
    /// 操作ユーザーID
    pub user_id: i64,
    /// 操作ユーザー名（ユーザーが削除済みならNone）
    pub actor_username: Option<String>,
    /// 変更前スナップショット（エンコード済み、CREATEではNone）
    pub old_data: Option<String>,
    /// 変更後スナップショット（エンコード済み、DELETEではNone）
    pub new_data: Option<String>,
    /// 記録日時
    pub timestamp: DateTime<Utc>,
    /// 説明
    pub description: String,
}

impl ResourceHistoryEntry {
    /// 変更前スナップショットをデコードする
    pub fn before(&self) -> Result<Option<Resource>, LedgerError> {
        self.old_data.as_deref().map(snapshot::decode).transpose()
    }

    /// 変更後スナップショットをデコードする
    pub fn after(&self) -> Result<Option<Resource>, LedgerError> {
        self.new_data.as_deref().map(snapshot::decode).transpose()
    }
}
