//! サンプルデータ投入
//!
//! リソースは必ず`ResourceService`経由で作成するので、各サンプルには
//! 管理者に帰属するCREATE履歴が残る。

use crate::common::auth::{ActingUser, User};
use crate::common::error::{LedgerError, LedgerResult};
use crate::service::ResourceService;
use crate::types::resource::NewResource;

/// サンプルリソース（名前, 説明, 単位, 数量）
const SAMPLE_RESOURCES: &[(&str, &str, &str, i64)] = &[
    ("Steel", "High-grade structural steel", "kg", 1000),
    ("Aluminium", "Aluminium sheets for production", "kg", 500),
    ("Copper", "Copper wire and cable", "m", 2000),
    ("PVC plastic", "Polyvinyl chloride for pipe manufacturing", "kg", 750),
    ("Glass", "Sheet glass of various thickness", "m2", 300),
    ("Electricity", "Electric power consumption", "kWh", 5000),
    ("Natural gas", "Gas for heating and production", "m3", 1200),
    ("Diesel fuel", "Fuel for generators and machinery", "l", 800),
    ("Coal", "Hard coal for the boiler house", "t", 50),
    ("Process water", "Technical water for production", "l", 10000),
    ("Drinking water", "Purified drinking water", "l", 2000),
    ("Sulfuric acid", "Sulfuric acid for chemical processes", "l", 150),
    ("Cement", "Portland cement M400", "t", 20),
    ("Sand", "River sand for construction", "m3", 100),
    ("Bricks", "Red ceramic bricks", "pcs", 5000),
    ("A4 paper", "White office paper", "pack", 100),
    ("Printer cartridges", "Cartridges for office printers", "pcs", 25),
    ("Bolts", "M8-M20 bolts of various length", "pcs", 1000),
    ("Nuts", "M8-M20 nuts", "pcs", 1200),
    ("Servers", "Rack server hardware", "pcs", 5),
    ("Monitors", "24 inch LCD monitors", "pcs", 30),
];

/// サンプルリソースの一覧
pub fn sample_resources() -> Vec<NewResource> {
    SAMPLE_RESOURCES
        .iter()
        .map(|(name, description, unit, quantity)| NewResource {
            name: (*name).to_string(),
            description: (*description).to_string(),
            unit: (*unit).to_string(),
            quantity: *quantity,
        })
        .collect()
}

/// リソースが1件もない場合のみサンプルを投入する
///
/// # Arguments
/// * `service` - リソースサービス
/// * `admin` - 作成者として記録するユーザー
///
/// # Returns
/// * `Ok(n)` - 作成したリソース数（既存データがあれば0）
/// * `Err(LedgerError)` - 作成失敗（それまでに作成したリソースはコミット済み）
pub async fn seed_if_empty(service: &ResourceService, admin: &User) -> LedgerResult<usize> {
    if service.count().await? > 0 {
        tracing::debug!("Resources already exist, skipping seed data");
        return Ok(0);
    }

    let actor = ActingUser::from(admin);
    let mut created = 0;
    for candidate in sample_resources() {
        match service.create(&actor, candidate).await {
            Ok(_) => created += 1,
            Err(LedgerError::DuplicateName(msg)) => {
                tracing::warn!("Skipping seed resource: {}", msg);
            }
            Err(e) => return Err(e),
        }
    }

    tracing::info!(count = created, actor = %actor.id, "Seeded sample resources");
    Ok(created)
}
