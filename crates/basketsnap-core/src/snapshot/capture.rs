//! Balance grid capture

use basketsnap_core_types::RunId;

use crate::errors::{HarnessError, Result};
use crate::registry::{AssetRegistry, EntityRegistry};
use crate::snapshot::model::{BalanceRecord, BalanceSnapshot};
use crate::source::BalanceSource;

/// Capture the full entities × assets balance grid
///
/// Queries `source` exactly once per pair, entities in the outer loop and
/// assets in the inner loop, both in registration order. The query sequence
/// is never reordered or deduplicated, even when addresses repeat.
///
/// # Errors
///
/// Returns `BalanceQuery` naming the first failing `(entity, asset)` pair.
/// No partial snapshot is produced.
pub fn capture(
    label: &str,
    run_id: Option<&RunId>,
    entities: &EntityRegistry,
    assets: &AssetRegistry,
    source: &impl BalanceSource,
) -> Result<BalanceSnapshot> {
    let entities = entities.all();
    let assets = assets.all();
    let mut records = Vec::with_capacity(entities.len() * assets.len());

    for entity in &entities {
        for asset in &assets {
            let balance = source
                .read_balance(entity.address, asset.contract_address)
                .map_err(|source| HarnessError::BalanceQuery {
                    entity: entity.name.clone(),
                    asset: asset.name.clone(),
                    source,
                })?;
            records.push(BalanceRecord::new(&entity.name, &asset.name, balance));
        }
    }

    Ok(BalanceSnapshot::captured(
        label.to_string(),
        run_id.cloned(),
        records,
    ))
}
