//! Engine diagnostic: report the installed GAMS release and whether each
//! model variant can run against it.

use anyhow::Result;
use message_gams::config::Config;
use message_gams::engine::GamsEngine;
use message_gams::model::{source_version, ModelVariant};
use message_gams::telemetry::init_tracing;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let cfg = Config::load()?;
    let engine = GamsEngine::from_config(&cfg.engine);

    let release = engine.release().await?;
    info!(%release, executable = %engine.executable().display(), "GAMS engine detected");

    for variant in ModelVariant::ALL {
        match variant.min_gams_release() {
            Some(required) if release < required => {
                warn!(model = variant.name(), %required, %release, "installed engine is too old");
            }
            Some(required) => {
                info!(model = variant.name(), %required, "engine satisfies minimum release");
            }
            None => info!(model = variant.name(), "no minimum engine release"),
        }
    }

    match source_version(&cfg.model.dir).await {
        Ok(version) => info!(%version, dir = %cfg.model.dir.display(), "model source version"),
        Err(err) => warn!(%err, dir = %cfg.model.dir.display(), "model source version unavailable"),
    }

    Ok(())
}
