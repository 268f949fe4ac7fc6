pub mod storage;

use crate::config::RelayConfig;
use crate::services::relay::RelayHandler;
use crate::services::skip_rules::SkipRules;
use tracing::info;

/// Wire the provider clients and skip rules into a handler.
pub async fn setup_relay(config: &RelayConfig) -> anyhow::Result<RelayHandler> {
    let skip_rules = SkipRules::new(&config.skip_patterns)?;
    info!(
        "⏭️  Skip rules: {}",
        skip_rules.patterns().collect::<Vec<_>>().join(", ")
    );

    let source = storage::setup_source(config).await?;
    let archive = storage::setup_archive(config).await;

    Ok(
        RelayHandler::new(source, archive, skip_rules, config.storage_class)
            .with_scratch_dir(config.scratch_dir.clone()),
    )
}
