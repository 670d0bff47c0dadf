//! `patchview watch`: reload on change

use std::path::Path;
use std::sync::mpsc;
use std::time::Duration;

use anyhow::{Context, Result};
use notify::event::{EventKind, ModifyKind};
use notify::{RecursiveMode, Watcher};
use tracing::{info, warn};

use patchview_app::{PatchView, ViewerConfig};
use patchview_core::SystemClock;

/// Writes often arrive as several events; wait this long before reloading
const SETTLE: Duration = Duration::from_millis(100);

pub fn run(patch: &Path, config: ViewerConfig) -> Result<()> {
    let mut view = PatchView::with_config(config, SystemClock::shared())?;
    view.load(patch)
        .with_context(|| format!("Failed to load {}", patch.display()))?;
    println!("{}", view.status());

    let (tx, rx) = mpsc::channel();
    let mut watcher = notify::recommended_watcher(move |res: notify::Result<notify::Event>| {
        if let Ok(event) = res {
            let relevant = matches!(
                event.kind,
                EventKind::Modify(ModifyKind::Data(_)) | EventKind::Create(_)
            ) && event
                .paths
                .iter()
                .any(|p| p.extension().is_some_and(|ext| ext == "pd"));
            if relevant {
                let _ = tx.send(());
            }
        }
    })?;

    // includes live next to the patch
    let dir = match patch.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    watcher.watch(dir, RecursiveMode::NonRecursive)?;
    info!(dir = %dir.display(), "watching for changes");

    while rx.recv().is_ok() {
        std::thread::sleep(SETTLE);
        while rx.try_recv().is_ok() {}

        match view.reload() {
            Ok(diagnostics) => {
                for diagnostic in &diagnostics {
                    println!("{diagnostic}");
                }
                println!("{}", view.status());
            }
            Err(err) => warn!(error = %err, "reload failed"),
        }
    }
    Ok(())
}
