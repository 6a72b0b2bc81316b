//! Staging pipeline between the external splitter and the encoder.
//!
//! Three tasks run concurrently: the splitter (opaque, see [`crate::split`]),
//! a watcher that releases per-track files once they look complete, and a
//! dispatcher that encodes them strictly in release order. The pending queue
//! is an unbounded mpsc channel with the watcher as sole producer and the
//! dispatcher as sole consumer; dropping the sender ends the consumer loop.

use std::collections::HashSet;
use std::io;
use std::path::PathBuf;
use std::process::ExitStatus;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tokio::sync::{mpsc, watch};
use tokio::time::sleep;
use tracing::{debug, info};

use crate::config::SplitConfig;
use crate::cue::AlbumMetadata;
use crate::encoder::{build_encode_command, Codec};
use crate::error::CueSplitError;
use crate::pair::FilePair;
use crate::split::{run_split, SPLITTER};
use crate::text::check_dep;

/// Process seam for encoder invocations, mockable in tests.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(&self, command: &str) -> io::Result<ExitStatus>;
}

/// Runs a composed command line through the shell, swallowing its output.
pub struct ShellRunner;

#[async_trait]
impl CommandRunner for ShellRunner {
    async fn run(&self, command: &str) -> io::Result<ExitStatus> {
        let output = Command::new("sh").arg("-c").arg(command).output().await?;
        Ok(output.status)
    }
}

/// A released split file together with its positional track index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodeJob {
    pub source: PathBuf,
    pub track_index: usize,
}

/// Polls the work directory for per-track files written by the splitter.
///
/// A discovered file is trusted as complete only once enough
/// lexicographically later siblings exist (the splitter has moved on);
/// when the producer reports completion the tail is released
/// unconditionally since nothing will ever arrive to validate it.
pub struct SplitWatcher {
    dir: PathBuf,
    template: String,
    junk: Vec<String>,
    poll_interval: Duration,
    stability_threshold: usize,
}

impl SplitWatcher {
    pub fn new(config: &SplitConfig) -> Self {
        Self {
            dir: config.workdir.clone(),
            template: config.split_template.clone(),
            junk: config.junk.clone(),
            poll_interval: config.poll_interval,
            stability_threshold: config.stability_threshold,
        }
    }

    /// Unreleased candidates matching the name template, in release order.
    async fn scan(&self, released: &HashSet<PathBuf>) -> io::Result<Vec<PathBuf>> {
        let mut candidates = Vec::new();
        let mut entries = tokio::fs::read_dir(&self.dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if !name.starts_with(self.template.as_str()) || !name.ends_with(".wav") {
                continue;
            }
            if self.junk.iter().any(|junk| junk == name) {
                continue;
            }
            if released.contains(&path) {
                continue;
            }
            candidates.push(path);
        }
        candidates.sort();
        Ok(candidates)
    }

    /// Poll until the producer completes, feeding released files to `releases`.
    ///
    /// At most one file is released per tick, and only while at least
    /// `stability_threshold` candidates are visible. After completion one
    /// final scan drains the remainder in lexicographic order.
    pub async fn watch(
        &self,
        done: watch::Receiver<bool>,
        releases: mpsc::UnboundedSender<PathBuf>,
    ) -> Result<(), CueSplitError> {
        let mut released: HashSet<PathBuf> = HashSet::new();
        loop {
            let finished = *done.borrow();
            let candidates = self.scan(&released).await?;
            if candidates.len() >= self.stability_threshold {
                let earliest = candidates[0].clone();
                debug!("releasing {}", earliest.display());
                released.insert(earliest.clone());
                if releases.send(earliest).is_err() {
                    return Ok(());
                }
            }
            if finished {
                break;
            }
            sleep(self.poll_interval).await;
        }
        for path in self.scan(&released).await? {
            debug!("releasing {} at producer completion", path.display());
            released.insert(path.clone());
            if releases.send(path).is_err() {
                return Ok(());
            }
        }
        Ok(())
    }
}

/// Sequentially encodes released files in FIFO order.
///
/// Track indices are positional: 0-based, advanced once per dequeued file.
/// Split output order matches parse order by construction, which is what
/// keeps positional tagging correct.
pub struct EncodeDispatcher<'a> {
    pub metadata: &'a AlbumMetadata,
    pub codec: Codec,
    pub opts: Option<&'a str>,
    pub comment_tag: &'a str,
    pub runner: &'a dyn CommandRunner,
}

impl EncodeDispatcher<'_> {
    /// Drain the queue, returning the destination names in encode order.
    ///
    /// A non-zero encoder exit aborts the run and leaves the consumed
    /// source file in place for inspection.
    pub async fn run(
        &self,
        mut jobs: mpsc::UnboundedReceiver<PathBuf>,
    ) -> Result<Vec<String>, CueSplitError> {
        let mut produced = Vec::new();
        let mut track_index = 0usize;
        while let Some(source) = jobs.recv().await {
            let job = EncodeJob {
                source,
                track_index,
            };
            let (dest, command) = build_encode_command(
                self.metadata,
                job.track_index,
                &job.source,
                self.codec,
                self.opts,
                self.comment_tag,
            )?;
            debug!("running: {command}");
            let status = self.runner.run(&command).await?;
            if !status.success() {
                return Err(CueSplitError::Codec { command, status });
            }
            tokio::fs::remove_file(&job.source).await?;
            info!("{} -> {}", job.source.display(), dest);
            produced.push(dest);
            track_index += 1;
        }
        Ok(produced)
    }
}

/// Split the media file and encode every released track.
///
/// Spawns the splitter and the watcher as background tasks and drives the
/// dispatcher on the current one; background failures surface after the
/// dispatcher finishes.
pub async fn split_and_encode(
    pair: &FilePair,
    metadata: &AlbumMetadata,
    codec: Codec,
    opts: Option<&str>,
    config: &SplitConfig,
) -> Result<Vec<String>, CueSplitError> {
    let (Some(cue), Some(media)) = (pair.cue.clone(), pair.media.clone()) else {
        return Ok(Vec::new());
    };
    for dep in [SPLITTER, codec.binary()] {
        if !check_dep(dep) {
            return Err(CueSplitError::MissingDependency(dep.to_string()));
        }
    }

    let (done_tx, done_rx) = watch::channel(false);
    let (release_tx, release_rx) = mpsc::unbounded_channel();

    let split_config = config.clone();
    let split_task =
        tokio::spawn(async move { run_split(&cue, &media, &split_config, done_tx).await });

    let watcher = SplitWatcher::new(config);
    let watch_task = tokio::spawn(async move { watcher.watch(done_rx, release_tx).await });

    let dispatcher = EncodeDispatcher {
        metadata,
        codec,
        opts,
        comment_tag: &config.comment_tag,
        runner: &ShellRunner,
    };
    let produced = dispatcher.run(release_rx).await;

    split_task.await.map_err(io::Error::other)??;
    watch_task.await.map_err(io::Error::other)??;
    produced
}
