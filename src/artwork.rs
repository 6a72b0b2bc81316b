use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp", "gif", "bmp"];
const COVER_STEMS: &[&str] = &["cover", "front", "folder"];

/// Check if a file is an image based on extension
fn is_image_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

fn is_cover_name(path: &Path) -> bool {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .map(|stem| COVER_STEMS.contains(&stem.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Look for a front-cover image next to the media file.
///
/// Candidates are conventional names (`cover`, `front`, `folder`) with an
/// image extension; the lexicographically first match wins so the result is
/// deterministic.
pub fn find_front_cover(dir: &Path) -> Option<PathBuf> {
    let entries = fs::read_dir(dir).ok()?;

    let mut candidates: Vec<PathBuf> = entries
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && is_image_file(path) && is_cover_name(path))
        .collect();
    candidates.sort();

    if let Some(found) = candidates.first() {
        debug!("found front cover {}", found.display());
    }
    candidates.into_iter().next()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_finds_conventional_cover_names() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("album.flac"), b"fLaC").unwrap();
        fs::write(dir.path().join("Front.PNG"), b"png").unwrap();

        let cover = find_front_cover(dir.path()).unwrap();
        assert_eq!(cover.file_name().unwrap(), "Front.PNG");
    }

    #[test]
    fn test_ignores_non_cover_images_and_audio() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("back.jpg"), b"jpg").unwrap();
        fs::write(dir.path().join("cover.txt"), b"not an image").unwrap();
        fs::write(dir.path().join("album.wav"), b"RIFF").unwrap();

        assert_eq!(find_front_cover(dir.path()), None);
    }

    #[test]
    fn test_deterministic_when_several_candidates_exist() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("front.png"), b"png").unwrap();
        fs::write(dir.path().join("cover.jpg"), b"jpg").unwrap();

        let cover = find_front_cover(dir.path()).unwrap();
        assert_eq!(cover.file_name().unwrap(), "cover.jpg");
    }
}
