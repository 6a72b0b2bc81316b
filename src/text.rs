use std::path::Path;

use chardetng::EncodingDetector;
use encoding_rs::Encoding;
use tokio::process::Command;
use tracing::debug;

use crate::error::CueSplitError;

/// Check whether an external binary is reachable through PATH.
pub fn check_dep(name: &str) -> bool {
    let Some(paths) = std::env::var_os("PATH") else {
        return false;
    };
    std::env::split_paths(&paths).any(|dir| dir.join(name).exists())
}

/// Ask the external classifier for the MIME type of `path`.
///
/// Any stderr output from the classifier is treated as fatal.
pub async fn classify(path: &Path) -> Result<String, CueSplitError> {
    if !check_dep("file") {
        return Err(CueSplitError::MissingDependency("file".to_string()));
    }
    let output = Command::new("file")
        .arg("-b")
        .arg("--mime-type")
        .arg(path)
        .output()
        .await?;
    if !output.stderr.is_empty() {
        return Err(CueSplitError::Classifier(
            String::from_utf8_lossy(&output.stderr).trim().to_string(),
        ));
    }
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

/// Decode raw bytes into lines using a detected character encoding.
///
/// Returns `None` when the guessed encoding cannot decode the content.
/// Trailing line terminators and whitespace are stripped from each line.
pub fn decode_lines(bytes: &[u8]) -> Option<Vec<String>> {
    let encoding = match Encoding::for_bom(bytes) {
        Some((encoding, _)) => encoding,
        None => {
            let mut detector = EncodingDetector::new();
            detector.feed(bytes, true);
            detector.guess(None, true)
        }
    };
    debug!("detected sidecar encoding {}", encoding.name());

    let (text, _, had_errors) = encoding.decode(bytes);
    if had_errors {
        return None;
    }
    Some(text.lines().map(|line| line.trim_end().to_string()).collect())
}

/// Read a sidecar as lines of text.
///
/// Hard failures (missing classifier, classifier diagnostics, non-text
/// content) propagate. An unreadable or undecodable sidecar is the
/// recoverable `Ok(None)`: the caller reports "no metadata" instead of
/// crashing.
pub async fn read_cue_lines(path: &Path) -> Result<Option<Vec<String>>, CueSplitError> {
    let mime = classify(path).await?;
    if mime != "text/plain" {
        return Err(CueSplitError::UnsupportedType(mime));
    }
    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(_) => return Ok(None),
    };
    Ok(decode_lines(&bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_lines_ascii() {
        let lines = decode_lines(b"PERFORMER \"Artist\"\nTITLE \"Album\"\n").unwrap();
        assert_eq!(lines, vec!["PERFORMER \"Artist\"", "TITLE \"Album\""]);
    }

    #[test]
    fn test_decode_lines_strips_crlf() {
        let lines = decode_lines(b"TITLE \"Album\"\r\n  TRACK 01 AUDIO\r\n").unwrap();
        assert_eq!(lines, vec!["TITLE \"Album\"", "  TRACK 01 AUDIO"]);
    }

    #[test]
    fn test_decode_lines_utf8() {
        let text = "PERFORMER \"Аквариум\"\nTITLE \"Синий альбом\"\n";
        let lines = decode_lines(text.as_bytes()).unwrap();
        assert_eq!(lines[0], "PERFORMER \"Аквариум\"");
        assert_eq!(lines[1], "TITLE \"Синий альбом\"");
    }

    #[test]
    fn test_decode_lines_honors_a_bom() {
        let mut bytes = vec![0xEF, 0xBB, 0xBF];
        bytes.extend_from_slice("TITLE \"Album\"\n".as_bytes());
        let lines = decode_lines(&bytes).unwrap();
        assert_eq!(lines, vec!["TITLE \"Album\""]);
    }

    #[test]
    fn test_check_dep_rejects_unknown_binary() {
        assert!(!check_dep("definitely-not-a-real-binary-name"));
    }
}
