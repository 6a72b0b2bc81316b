use std::path::Path;

use tokio::process::Command;
use tokio::sync::watch;
use tracing::{info, warn};

use crate::config::SplitConfig;
use crate::error::CueSplitError;

/// External binary that cuts the media file along the cue sheet.
pub const SPLITTER: &str = "shnsplit";

/// Run the splitter over a cue/media pair and signal completion.
///
/// Per-track files land in `config.workdir` named
/// `<split_template><nn>.wav`. The splitter's exit status never aborts the
/// pipeline; completion is signaled regardless so the watcher and the
/// dispatcher can drain what was produced.
pub async fn run_split(
    cue: &Path,
    media: &Path,
    config: &SplitConfig,
    done: watch::Sender<bool>,
) -> Result<(), CueSplitError> {
    let result = async {
        let output = Command::new(SPLITTER)
            .arg("-f")
            .arg(cue)
            .arg("-o")
            .arg("wav")
            .arg("-a")
            .arg(&config.split_template)
            .arg("-d")
            .arg(&config.workdir)
            .arg(media)
            .output()
            .await?;
        if output.status.success() {
            info!("split of {} finished", media.display());
        } else {
            warn!(
                "splitter exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }
        Ok(())
    }
    .await;
    let _ = done.send(true);
    result
}
