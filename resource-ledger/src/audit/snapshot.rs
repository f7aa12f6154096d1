//! 履歴スナップショットのエンコード/デコード
//!
//! スナップショットは差分ではなくリソース全体を保存する。保存形式は
//! `{"schema_version": N, "resource": {...}}` のエンベロープで、
//! 将来リソースのスキーマが変わっても古い履歴を読み戻せるようにする。
//! バージョンタグのない素のリソースJSON（旧形式）もversion 0として受け付ける。

use crate::common::error::LedgerError;
use crate::types::resource::Resource;
use serde::{Deserialize, Serialize};

/// 現在のスナップショットスキーマバージョン
pub const SNAPSHOT_SCHEMA_VERSION: u32 = 1;

#[derive(Serialize)]
struct SnapshotEnvelopeRef<'a> {
    schema_version: u32,
    resource: &'a Resource,
}

#[derive(Deserialize)]
struct SnapshotEnvelope {
    schema_version: u32,
    resource: serde_json::Value,
}

/// リソースをスナップショット文字列にエンコードする
pub fn encode(resource: &Resource) -> Result<String, LedgerError> {
    serde_json::to_string(&SnapshotEnvelopeRef {
        schema_version: SNAPSHOT_SCHEMA_VERSION,
        resource,
    })
    .map_err(|e| LedgerError::Serialization(format!("Failed to encode snapshot: {}", e)))
}

/// スナップショット文字列をリソースにデコードする
pub fn decode(raw: &str) -> Result<Resource, LedgerError> {
    let value: serde_json::Value = serde_json::from_str(raw)
        .map_err(|e| LedgerError::Serialization(format!("Malformed snapshot: {}", e)))?;

    let is_envelope = value
        .as_object()
        .is_some_and(|obj| obj.contains_key("schema_version"));

    let resource = if is_envelope {
        let envelope: SnapshotEnvelope = serde_json::from_value(value)
            .map_err(|e| LedgerError::Serialization(format!("Malformed snapshot: {}", e)))?;
        match envelope.schema_version {
            1 => envelope.resource,
            other => {
                return Err(LedgerError::Serialization(format!(
                    "Unsupported snapshot schema version: {}",
                    other
                )))
            }
        }
    } else {
        // version 0: バージョンタグなしで保存された旧形式
        value
    };

    serde_json::from_value(resource)
        .map_err(|e| LedgerError::Serialization(format!("Malformed snapshot resource: {}", e)))
}
