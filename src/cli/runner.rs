//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands};
use crate::config::TapConfig;
use crate::engine::{SyncConfig, SyncEngine};
use crate::error::{Error, Result};
use crate::http::{HttpClient, HttpClientConfig};
use crate::output::JsonLinesSink;
use crate::state::StateManager;
use crate::streams::StreamRegistry;
use std::io::Write;
use tokio::sync::watch;
use tracing::{debug, info, warn};

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::Discover => self.discover(),
            Commands::Read { streams, fail_fast } => self.read(streams, *fail_fast).await,
        }
    }

    /// Load configuration
    fn load_config(&self) -> Result<TapConfig> {
        // Inline config takes precedence
        if let Some(json) = &self.cli.config_json {
            return TapConfig::from_json(json);
        }
        if let Some(path) = &self.cli.config {
            return TapConfig::from_file(path);
        }
        Err(Error::config(
            "No configuration provided (use --config or --config-json)",
        ))
    }

    /// Load state
    fn load_state(&self) -> Result<StateManager> {
        // Inline state takes precedence
        if let Some(state_json) = &self.cli.state_json {
            StateManager::from_json(state_json)
        } else if let Some(path) = &self.cli.state {
            StateManager::from_file(path)
        } else {
            Ok(StateManager::in_memory())
        }
    }

    /// Print the catalog
    fn discover(&self) -> Result<()> {
        let catalog = StreamRegistry::default().catalog();
        let json = serde_json::to_string_pretty(&catalog)
            .map_err(|e| Error::output(format!("Failed to serialize catalog: {e}")))?;

        let mut stdout = std::io::stdout().lock();
        writeln!(stdout, "{json}")?;
        Ok(())
    }

    /// Read data
    async fn read(&self, streams: &[String], fail_fast: bool) -> Result<()> {
        let config = self.load_config()?;
        config.validate()?;
        let state = self.load_state()?;

        if let Some(name) = &config.survey_name {
            info!(survey = %name, "Reading survey");
        }

        let client = HttpClient::with_config(HttpClientConfig::for_tap(&config))?;
        let engine = SyncEngine::new(client, config, state)
            .with_config(SyncConfig::new().with_fail_fast(fail_fast))
            .with_cancellation(interrupt_signal());

        let selection = (!streams.is_empty()).then_some(streams);
        let mut sink = JsonLinesSink::stdout();
        let report = engine.run(&mut sink, selection).await?;

        report.into_result().map(|_| ())
    }
}

/// Channel flipped to `true` on Ctrl-C
fn interrupt_signal() -> watch::Receiver<bool> {
    let (tx, rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received, stopping after the current page");
            if tx.send(true).is_err() {
                debug!("Interrupt received after the sync finished");
            }
        }
    });
    rx
}
