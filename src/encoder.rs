use std::path::Path;

use regex::Regex;

use crate::cue::{AlbumMetadata, TrackRecord};
use crate::error::CueSplitError;

/// The supported output encoders, each with its own tagging dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Codec {
    Flac,
    Mp3,
    Opus,
    Vorbis,
}

impl Codec {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "flac" => Some(Codec::Flac),
            "mp3" => Some(Codec::Mp3),
            "opus" => Some(Codec::Opus),
            "vorbis" => Some(Codec::Vorbis),
            _ => None,
        }
    }

    /// External binary this codec shells out to.
    pub fn binary(&self) -> &'static str {
        match self {
            Codec::Flac => "flac",
            Codec::Mp3 => "lame",
            Codec::Opus => "opusenc",
            Codec::Vorbis => "oggenc",
        }
    }

    fn builder(&self) -> &'static dyn CommandBuilder {
        match self {
            Codec::Flac => &FlacBuilder,
            Codec::Mp3 => &Mp3Builder,
            Codec::Opus => &OpusBuilder,
            Codec::Vorbis => &VorbisBuilder,
        }
    }
}

/// Replace filesystem-hostile characters with `~` in a name segment.
pub fn sanitize_name(segment: &str) -> String {
    let re = Regex::new(r"[\\/|?<>*:]").unwrap();
    re.replace_all(segment, "~").into_owned()
}

/// Output file name: `<number> - <performer> - <title><ext>`.
fn track_file_name(track: &TrackRecord, extension: &str) -> String {
    format!(
        "{} - {} - {}{}",
        track.number,
        sanitize_name(track.performer.as_deref().unwrap_or_default()),
        sanitize_name(track.title.as_deref().unwrap_or_default()),
        extension
    )
}

/// Tag values resolved once per track and shared by every codec dialect.
///
/// Absent sidecar fields render as empty strings; the comment falls back to
/// the configured build identifier.
struct TrackTags {
    artist: String,
    album: String,
    genre: String,
    title: String,
    track: String,
    date: String,
    comment: String,
    cover: Option<String>,
}

impl TrackTags {
    fn resolve(metadata: &AlbumMetadata, track: &TrackRecord, comment_tag: &str) -> Self {
        // the capture grammar guarantees digits, so the numeric parse holds
        let number = track.number.parse::<u32>().unwrap_or_default();
        Self {
            artist: track.performer.clone().unwrap_or_default(),
            album: metadata.title.clone().unwrap_or_default(),
            genre: metadata.genre.clone().unwrap_or_default(),
            title: track.title.clone().unwrap_or_default(),
            track: format!("{}/{}", number, metadata.tracks.len()),
            date: metadata.date.clone().unwrap_or_default(),
            comment: metadata
                .comment
                .clone()
                .unwrap_or_else(|| comment_tag.to_string()),
            cover: metadata
                .cover_front
                .as_ref()
                .map(|p| p.to_string_lossy().into_owned()),
        }
    }
}

/// One implementation per codec supplies flag spelling, quoting and argument
/// order; field assembly lives in [`TrackTags`] and is never duplicated.
trait CommandBuilder {
    fn extension(&self) -> &'static str;
    fn command(&self, tags: &TrackTags, source: &str, dest: &str, opts: Option<&str>) -> String;
}

struct FlacBuilder;

impl CommandBuilder for FlacBuilder {
    fn extension(&self) -> &'static str {
        ".flac"
    }

    fn command(&self, tags: &TrackTags, source: &str, dest: &str, opts: Option<&str>) -> String {
        let picture = tags
            .cover
            .as_deref()
            .map(|pic| format!(" --picture=\"3||front cover||{pic}\""))
            .unwrap_or_default();
        format!(
            "flac {} -f -o \"{}\" --tag=artist=\"{}\" --tag=album=\"{}\" --tag=genre=\"{}\" \
             --tag=title=\"{}\" --tag=tracknumber=\"{}\" --tag=date=\"{}\" --tag=comment=\"{}\"{} {}",
            opts.unwrap_or("-8"),
            dest,
            tags.artist,
            tags.album,
            tags.genre,
            tags.title,
            tags.track,
            tags.date,
            tags.comment,
            picture,
            source
        )
    }
}

struct Mp3Builder;

impl CommandBuilder for Mp3Builder {
    fn extension(&self) -> &'static str {
        ".mp3"
    }

    fn command(&self, tags: &TrackTags, source: &str, dest: &str, opts: Option<&str>) -> String {
        let picture = tags
            .cover
            .as_deref()
            .map(|pic| format!(" --ti \"{pic}\""))
            .unwrap_or_default();
        format!(
            "lame {} --lowpass -1 --noreplaygain --id3v2-only --id3v2-utf16 --ta \"{}\" \
             --tl \"{}\" --tg \"{}\" --tt \"{}\" --tn \"{}\" --ty \"{}\" --tv \"COMM=={}\"{} {} \"{}\"",
            opts.unwrap_or("-b 320"),
            tags.artist,
            tags.album,
            tags.genre,
            tags.title,
            tags.track,
            tags.date,
            tags.comment,
            picture,
            source,
            dest
        )
    }
}

struct OpusBuilder;

impl CommandBuilder for OpusBuilder {
    fn extension(&self) -> &'static str {
        ".opus"
    }

    fn command(&self, tags: &TrackTags, source: &str, dest: &str, opts: Option<&str>) -> String {
        let opts = opts.map(|o| format!(" {o}")).unwrap_or_default();
        let picture = tags
            .cover
            .as_deref()
            .map(|pic| format!(" --picture \"3||front cover||{pic}\""))
            .unwrap_or_default();
        format!(
            "opusenc{} --artist \"{}\" --album \"{}\" --genre \"{}\" --title \"{}\" \
             --comment tracknumber=\"{}\" --date \"{}\" --comment comment=\"{}\"{} {} \"{}\"",
            opts,
            tags.artist,
            tags.album,
            tags.genre,
            tags.title,
            tags.track,
            tags.date,
            tags.comment,
            picture,
            source,
            dest
        )
    }
}

struct VorbisBuilder;

impl CommandBuilder for VorbisBuilder {
    fn extension(&self) -> &'static str {
        ".ogg"
    }

    // oggenc has no cover-art flag, the picture reference is dropped here
    fn command(&self, tags: &TrackTags, source: &str, dest: &str, opts: Option<&str>) -> String {
        format!(
            "oggenc {} --artist \"{}\" --album \"{}\" --genre \"{}\" --title \"{}\" \
             --comment tracknumber=\"{}\" --date \"{}\" --comment comment=\"{}\" -o \"{}\" {}",
            opts.unwrap_or("-q 4"),
            tags.artist,
            tags.album,
            tags.genre,
            tags.title,
            tags.track,
            tags.date,
            tags.comment,
            dest,
            source
        )
    }
}

/// Map metadata, track index and a source file to the destination name and
/// the external encode invocation for `codec`.
pub fn build_encode_command(
    metadata: &AlbumMetadata,
    track_index: usize,
    source: &Path,
    codec: Codec,
    opts: Option<&str>,
    comment_tag: &str,
) -> Result<(String, String), CueSplitError> {
    let track = metadata
        .tracks
        .get(track_index)
        .ok_or(CueSplitError::MissingTrack(track_index))?;
    let builder = codec.builder();
    let dest = track_file_name(track, builder.extension());
    let tags = TrackTags::resolve(metadata, track, comment_tag);
    let command = builder.command(&tags, &source.to_string_lossy(), &dest, opts);
    Ok((dest, command))
}
