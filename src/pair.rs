use std::path::{Path, PathBuf};

use crate::error::CueSplitError;

/// Sidecar extensions, in pairing priority order.
pub const CUE_EXTENSIONS: &[&str] = &["cue", "cue~"];
/// Media extensions, in pairing priority order.
pub const MEDIA_EXTENSIONS: &[&str] = &["wav", "flac"];

/// A sidecar/media pairing sharing a directory and basename.
///
/// Either both sides are set or neither is. An unmatched sibling is not an
/// error: it yields an incomplete pairing that callers must check.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilePair {
    pub cue: Option<PathBuf>,
    pub media: Option<PathBuf>,
}

impl FilePair {
    pub fn is_complete(&self) -> bool {
        self.cue.is_some() && self.media.is_some()
    }
}

/// Locate the sibling of `path`, whichever side of the pair was given.
///
/// The given path is resolved through symlinks first; the sibling search is
/// purely by shared basename in the same directory, trying extensions in
/// priority order.
pub fn resolve_pair(path: &Path) -> Result<FilePair, CueSplitError> {
    if !path.exists() {
        return Err(CueSplitError::MissingInput(path.to_path_buf()));
    }
    let source = path.canonicalize()?;
    let dir = source.parent().map(Path::to_path_buf).unwrap_or_default();
    let stem = match source.file_stem().and_then(|s| s.to_str()) {
        Some(stem) => stem.to_string(),
        None => return Ok(FilePair::default()),
    };
    let ext = source
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default();

    if CUE_EXTENSIONS.contains(&ext) {
        for media_ext in MEDIA_EXTENSIONS {
            let candidate = dir.join(format!("{stem}.{media_ext}"));
            if candidate.exists() {
                return Ok(FilePair {
                    cue: Some(source),
                    media: Some(candidate),
                });
            }
        }
    } else if MEDIA_EXTENSIONS.contains(&ext) {
        for cue_ext in CUE_EXTENSIONS {
            let candidate = dir.join(format!("{stem}.{cue_ext}"));
            if candidate.exists() {
                return Ok(FilePair {
                    cue: Some(candidate),
                    media: Some(source),
                });
            }
        }
    }

    Ok(FilePair::default())
}
