use std::path::PathBuf;
use std::time::Duration;

/// Version string used for `--version` and as the comment-tag fallback.
pub fn build_id() -> String {
    format!("cuesplit-{}", env!("CARGO_PKG_VERSION"))
}

/// Tunables for the split/encode pipeline.
///
/// Threaded explicitly through the watcher, dispatcher and command builders
/// so tests can substitute deterministic values.
#[derive(Debug, Clone)]
pub struct SplitConfig {
    /// Comment tag written when the cue sheet has no REM COMMENT.
    pub comment_tag: String,
    /// Directory the splitter writes into and the watcher scans.
    pub workdir: PathBuf,
    /// Name prefix of per-track intermediate files.
    pub split_template: String,
    /// Scan cadence for the watcher.
    pub poll_interval: Duration,
    /// Minimum visible candidates before the earliest is trusted as complete.
    pub stability_threshold: usize,
    /// File names the watcher must never release (splitter artifacts).
    pub junk: Vec<String>,
}

impl Default for SplitConfig {
    fn default() -> Self {
        let split_template = String::from("split-track");
        Self {
            comment_tag: build_id(),
            workdir: PathBuf::from("."),
            // shntool writes a 00 pregap file when tracks carry INDEX 00
            junk: vec![format!("{split_template}00.wav")],
            split_template,
            poll_interval: Duration::from_millis(100),
            stability_threshold: 2,
        }
    }
}
