use std::convert::Infallible;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use automata_core::impls::TracingPlatform;
use automata_core::{
    CardPriority, EntryPoint, ExitManager, RunnerConfig, Script, ScriptError, ScriptOutcome,
};
use clap::Parser;
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "automata", about = "Run a demo script mode until it exits or Ctrl+C")]
struct Args {
    /// Number of loop iterations before the script exits on its own.
    #[arg(long, default_value_t = 5)]
    runs: u32,

    /// Delay between iterations, in milliseconds.
    #[arg(long, default_value_t = 500)]
    interval_ms: u64,

    /// Fail with an unexpected error at this iteration.
    #[arg(long)]
    fail_at: Option<u32>,

    /// Card priority used by the demo, e.g. "WB, B, RB".
    #[arg(long, default_value = CardPriority::DEFAULT)]
    card_priority: String,

    /// Rearrange cards flag stored alongside the priority.
    #[arg(long)]
    rearrange: bool,

    /// TOML file overriding the user-facing messages.
    #[arg(long)]
    config: Option<PathBuf>,
}

/// Demo script: "plays" one battle per iteration.
struct DemoBattle {
    runs: u32,
    interval: Duration,
    fail_at: Option<u32>,
}

#[async_trait]
impl Script for DemoBattle {
    async fn script(&mut self, exit: &ExitManager) -> Result<Infallible, ScriptError> {
        let mut done = 0;
        loop {
            exit.check()?;
            if done >= self.runs {
                return Err(ScriptError::exit(format!("Completed {done} runs")));
            }

            done += 1;
            if Some(done) == self.fail_at {
                let err = anyhow::anyhow!("battle screen not found").context(format!("run {done}"));
                return Err(ScriptError::unexpected(err));
            }
            info!(run = done, "battle finished");

            exit.wait(self.interval).await?;
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => RunnerConfig::load(path)
            .with_context(|| format!("failed to load {}", path.display()))?,
        None => RunnerConfig::default(),
    };

    let priority: CardPriority = args
        .card_priority
        .parse()
        .context("invalid --card-priority")?;
    let item = priority.into_list_item(args.rearrange);
    info!(priority = %item, rearrange = item.rearrange_cards, "card priority loaded");

    let script = DemoBattle {
        runs: args.runs,
        interval: Duration::from_millis(args.interval_ms),
        fail_at: args.fail_at,
    };

    let entry = EntryPoint::builder(script, Arc::new(TracingPlatform::new()))
        .config(config)
        .on_exit(|outcome: &ScriptOutcome| info!(state = ?outcome.state(), "exit listener called"))
        .build();
    let handle = entry.run()?;

    let stopper = entry.exit_manager().clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Ctrl+C received, stopping");
            stopper.exit();
        }
    });

    let outcome = handle.join().await?;
    info!(state = ?outcome.state(), "script finished");
    Ok(())
}

fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    use tracing_subscriber::fmt;

    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("automata_core=info,automata_cli=info,warn")),
        )
        .with_target(false)
        .init();
}
