//! patchview CLI
//!
//! Inspect, check, render and replay input against `.pd` patches.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use patchview_app::{parse_script, play, PatchView, ViewerConfig};
use patchview_core::{ManualClock, RecordingContext, SystemClock};
use patchview_widgets::{CallbackSink, Severity};

mod report;
mod watch;

#[derive(Parser)]
#[command(name = "patchview")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Pure Data patch viewer", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file (defaults to patchview.toml next to the patch)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the widgets a patch decodes to
    Inspect {
        /// Patch file
        patch: PathBuf,
    },

    /// Report lines that could not be decoded
    Check {
        /// Patch file
        patch: PathBuf,

        /// Fail when any line was skipped
        #[arg(long)]
        strict: bool,
    },

    /// Draw one frame and print the draw commands
    Render {
        /// Patch file
        patch: PathBuf,
    },

    /// Replay a script of pointer and key events
    Play {
        /// Patch file
        patch: PathBuf,

        /// Event script
        script: PathBuf,
    },

    /// Reload the patch whenever it changes on disk
    Watch {
        /// Patch file
        patch: PathBuf,
    },
}

impl Commands {
    fn patch(&self) -> &Path {
        match self {
            Commands::Inspect { patch }
            | Commands::Check { patch, .. }
            | Commands::Render { patch }
            | Commands::Play { patch, .. }
            | Commands::Watch { patch } => patch,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Config discovery logs before its own log_filter is known; route those
    // events through a subscriber built from the command line and RUST_LOG
    let bootstrap = tracing_subscriber::fmt()
        .with_env_filter(env_filter(cli.verbose, DEFAULT_LOG_FILTER))
        .finish();
    let config = tracing::subscriber::with_default(bootstrap, || {
        load_config(cli.config.as_deref(), cli.command.patch())
    })?;

    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(env_filter(cli.verbose, &config.viewer.log_filter))
        .init();

    match cli.command {
        Commands::Inspect { patch } => cmd_inspect(&patch, &config),
        Commands::Check { patch, strict } => cmd_check(&patch, &config, strict),
        Commands::Render { patch } => cmd_render(&patch, config),
        Commands::Play { patch, script } => cmd_play(&patch, &script, config),
        Commands::Watch { patch } => watch::run(&patch, config),
    }
}

const DEFAULT_LOG_FILTER: &str = "info";

fn env_filter(verbose: bool, configured: &str) -> EnvFilter {
    if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(configured))
    }
}

/// `--config` when given, else `patchview.toml` next to the patch
fn load_config(explicit: Option<&Path>, patch: &Path) -> Result<ViewerConfig> {
    let config = match explicit {
        Some(path) => ViewerConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => ViewerConfig::discover(patch.parent().unwrap_or(Path::new("")))?,
    };
    debug!(log_filter = %config.viewer.log_filter, "configuration ready");
    Ok(config)
}

fn cmd_inspect(patch: &Path, config: &ViewerConfig) -> Result<()> {
    let (decoder, relative) = config.patch_decoder(patch, SystemClock::shared());
    let output = decoder
        .load_checked(&relative)
        .with_context(|| format!("Failed to load {}", patch.display()))?;

    print!("{}", report::widget_table(&output.widgets));
    println!(
        "{} widgets ({} including includes), {} diagnostics",
        output.widgets.len(),
        output.leaf_count(),
        output.diagnostics.len()
    );
    Ok(())
}

fn cmd_check(patch: &Path, config: &ViewerConfig, strict: bool) -> Result<()> {
    let (decoder, relative) = config.patch_decoder(patch, SystemClock::shared());
    let output = decoder.load_with_diagnostics(&relative);

    for diagnostic in &output.diagnostics {
        if diagnostic.severity == Severity::Info && !strict {
            continue;
        }
        println!("{diagnostic}");
    }

    let warnings = output.warnings().count();
    println!(
        "{}: {} widgets, {} warnings",
        patch.display(),
        output.leaf_count(),
        warnings
    );

    if output.has_errors() {
        anyhow::bail!("{} could not be loaded", patch.display());
    }
    if strict && warnings > 0 {
        anyhow::bail!("{} has {} skipped lines or fields", patch.display(), warnings);
    }
    Ok(())
}

fn cmd_render(patch: &Path, config: ViewerConfig) -> Result<()> {
    let viewport = config.viewport();
    let mut view = PatchView::with_config(config, SystemClock::shared())?;
    view.load(patch)
        .with_context(|| format!("Failed to load {}", patch.display()))?;

    let mut ctx = RecordingContext::new(viewport);
    view.tick();
    view.draw(&mut ctx);

    for command in ctx.commands() {
        println!("{command}");
    }
    info!("{} draw commands", ctx.commands().len());
    Ok(())
}

fn cmd_play(patch: &Path, script: &Path, config: ViewerConfig) -> Result<()> {
    let clock = Arc::new(ManualClock::new(0));
    let mut view = PatchView::with_config(config, clock.clone())?;
    view.load(patch)
        .with_context(|| format!("Failed to load {}", patch.display()))?;
    view.connect_sink(Arc::new(CallbackSink::new(
        |symbol, value| println!("{symbol} {value}"),
        |symbol, text| println!("{symbol} {text}"),
    )));

    let text = fs::read_to_string(script)
        .with_context(|| format!("Failed to read {}", script.display()))?;
    let steps = parse_script(&text)?;
    let report = play(&mut view, &steps, &clock);

    info!(
        steps = report.steps,
        handled = report.handled,
        keys = report.keys,
        elapsed_ms = report.elapsed_ms,
        "script finished"
    );
    println!("{}", view.status());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{self, Write};
    use std::sync::Mutex;

    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_config_discovery_is_logged() {
        let buf = SharedBuf::default();
        let writer = buf.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::new("debug"))
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();

        let config = tracing::subscriber::with_default(subscriber, || {
            load_config(None, Path::new("no/such/dir/main.pd"))
        })
        .unwrap();
        assert_eq!(config, ViewerConfig::default());

        let logged = String::from_utf8(buf.0.lock().unwrap().clone()).unwrap();
        assert!(logged.contains("no config file"), "{logged}");
        assert!(logged.contains("configuration ready"), "{logged}");
    }

    #[test]
    fn test_explicit_config_must_exist() {
        assert!(load_config(Some(Path::new("no/such/patchview.toml")), Path::new("main.pd")).is_err());
    }
}
