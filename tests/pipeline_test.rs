// Staged pipeline: a simulated splitter writes per-track files over time
// while the watcher releases them and the dispatcher encodes them in order.

use std::io;
use std::process::ExitStatus;
use std::os::unix::process::ExitStatusExt;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{mpsc, watch};
use tokio::time::sleep;

use cuesplit::config::SplitConfig;
use cuesplit::cue::parse_cue;
use cuesplit::encoder::Codec;
use cuesplit::pipeline::{CommandRunner, EncodeDispatcher, SplitWatcher};

const SHEET: &str = r#"PERFORMER "Artist"
TITLE "Album"
REM GENRE Electronic
REM DATE 1998
  TRACK 01 AUDIO
    TITLE "First"
    PERFORMER "Artist"
    INDEX 01 00:00:00
  TRACK 02 AUDIO
    TITLE "Second"
    PERFORMER "Artist"
    INDEX 01 03:10:00
  TRACK 03 AUDIO
    TITLE "Third"
    PERFORMER "Artist"
    INDEX 01 07:45:33
"#;

struct RecordingRunner {
    commands: Mutex<Vec<String>>,
}

#[async_trait]
impl CommandRunner for RecordingRunner {
    async fn run(&self, command: &str) -> io::Result<ExitStatus> {
        self.commands.lock().unwrap().push(command.to_string());
        Ok(ExitStatus::from_raw(0))
    }
}

#[tokio::test]
async fn test_files_staged_by_a_live_producer_are_encoded_in_split_order() {
    let dir = tempfile::tempdir().unwrap();
    let config = SplitConfig {
        workdir: dir.path().to_path_buf(),
        poll_interval: Duration::from_millis(10),
        ..SplitConfig::default()
    };

    let lines: Vec<String> = SHEET.lines().map(|l| l.to_string()).collect();
    let metadata = parse_cue(&lines);
    assert_eq!(metadata.tracks.len(), 3);

    let (done_tx, done_rx) = watch::channel(false);
    let (release_tx, release_rx) = mpsc::unbounded_channel();

    let watcher = SplitWatcher::new(&config);
    let watch_task = tokio::spawn(async move { watcher.watch(done_rx, release_tx).await });

    // splitter stand-in: a pregap artifact first, then one track at a time
    let workdir = dir.path().to_path_buf();
    let producer = tokio::spawn(async move {
        std::fs::write(workdir.join("split-track00.wav"), b"pregap").unwrap();
        for name in ["split-track01.wav", "split-track02.wav", "split-track03.wav"] {
            std::fs::write(workdir.join(name), b"RIFF").unwrap();
            sleep(Duration::from_millis(40)).await;
        }
        done_tx.send(true).unwrap();
    });

    let runner = RecordingRunner {
        commands: Mutex::new(Vec::new()),
    };
    let dispatcher = EncodeDispatcher {
        metadata: &metadata,
        codec: Codec::Vorbis,
        opts: None,
        comment_tag: "test-build",
        runner: &runner,
    };
    let produced = dispatcher.run(release_rx).await.unwrap();

    producer.await.unwrap();
    watch_task.await.unwrap().unwrap();

    assert_eq!(
        produced,
        vec![
            "01 - Artist - First.ogg",
            "02 - Artist - Second.ogg",
            "03 - Artist - Third.ogg",
        ]
    );

    let commands = runner.commands.lock().unwrap();
    assert_eq!(commands.len(), 3);
    assert!(commands[0].contains("split-track01.wav"));
    assert!(commands[1].contains("split-track02.wav"));
    assert!(commands[2].contains("split-track03.wav"));
    assert!(commands[2].contains("--comment tracknumber=\"3/3\""));

    // consumed intermediates are gone, the excluded artifact survives
    assert!(!dir.path().join("split-track01.wav").exists());
    assert!(!dir.path().join("split-track03.wav").exists());
    assert!(dir.path().join("split-track00.wav").exists());
}
