//! Aurora - headless module runner
//!
//! Loads a module from a JSON content file, enters it with a player
//! character and ticks the runtime until the module exits, the tick limit is
//! reached or Ctrl-C is pressed.

mod playback;

use anyhow::Context;
use aurora_areas::HeadlessRenderer;
use aurora_config::EngineConfig;
use aurora_core::TracingDiagnostics;
use aurora_module::{Engine, LoggingConsumer, Module};
use aurora_scripting::CallTable;
use playback::{PlaybackVm, RunnerContent};
use std::sync::Arc;
use std::time::Instant;
use tokio::time::MissedTickBehavior;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

fn load_config() -> (EngineConfig, Option<String>) {
    match std::env::args().nth(1) {
        Some(path) => match EngineConfig::load_from_file(&path) {
            Ok(config) => (config, None),
            Err(e) => (EngineConfig::default(), Some(format!("{}: {}", path, e))),
        },
        None => match EngineConfig::load_default() {
            Ok(config) => (config, None),
            Err(e) => (EngineConfig::default(), Some(e.to_string())),
        },
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let (config, config_error) = load_config();

    let filter = EnvFilter::try_from_default_env()
        .ok()
        .or_else(|| EnvFilter::try_new(&config.log_level).ok())
        .unwrap_or_else(|| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("🚀 Aurora starting up...");
    info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    if let Some(e) = config_error {
        warn!("⚠️  Failed to load configuration: {}", e);
        warn!("   Using default configuration");
    }
    config.display();

    if config.module.is_empty() {
        anyhow::bail!("no module configured (set `module = ...` in config/engine.txt)");
    }

    info!("📂 Loading content from {}...", config.content_file.display());
    let content = RunnerContent::load(&config.content_file)?;
    info!(
        "✓ {} modules, {} areas, {} scripts",
        content.content.modules.len(),
        content.content.areas.len(),
        content.scripts.len()
    );

    let call_table = Arc::new(CallTable::new());
    let vm = PlaybackVm::new(Arc::clone(&call_table), content.scripts);

    let mut module = Module::new(
        Box::new(content.content),
        Arc::new(HeadlessRenderer::new()),
        Arc::new(TracingDiagnostics),
    );
    module.set_texture_pack(config.texture_pack);

    let mut engine = Engine::new(call_table, module, Box::new(vm), Box::new(LoggingConsumer))
        .context("registering host functions")?;
    info!("✓ {} host functions registered", engine.functions().len());

    info!("🎮 Entering module \"{}\"...", config.module);
    engine
        .start(&config.module, config.entry_location.clone(), &config.pc_tag)
        .with_context(|| format!("starting module {}", config.module))?;
    info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    let started = Instant::now();
    let mut interval = tokio::time::interval(config.tick_interval());
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            _ = interval.tick() => {
                let now = started.elapsed().as_millis() as u64;
                if !engine.tick(now) {
                    info!("Module requested exit");
                    break;
                }
                if config.max_ticks > 0 && engine.ticks() >= config.max_ticks {
                    info!("Reached {} ticks", config.max_ticks);
                    break;
                }
            }
            _ = &mut ctrl_c => {
                info!("Interrupted");
                break;
            }
        }
    }

    engine.shutdown();
    info!("👋 Aurora shutting down gracefully");
    Ok(())
}
