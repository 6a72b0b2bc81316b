use std::path::PathBuf;

use regex::Regex;

/// One TRACK block from the sidecar.
///
/// `number` is kept exactly as printed (leading zeros included); timecodes
/// are captured verbatim as `mm:ss:ff` literals and never interpreted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackRecord {
    pub number: String,
    pub title: Option<String>,
    pub performer: Option<String>,
    pub index0: Option<String>,
    pub index1: Option<String>,
}

/// Album-level fields plus the ordered track list.
///
/// Optional fields stay `None` when the sidecar does not carry them.
/// `cover_front` is not part of the grammar: it is filled in afterwards by
/// artwork discovery next to the media file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AlbumMetadata {
    pub performer: Option<String>,
    pub title: Option<String>,
    pub genre: Option<String>,
    pub disc_id: Option<String>,
    pub date: Option<String>,
    pub comment: Option<String>,
    pub cover_front: Option<PathBuf>,
    pub tracks: Vec<TrackRecord>,
}

/// First whole-line match of `pattern` across the sheet, with surrounding
/// quotes stripped. Later matches are ignored.
fn first_value(lines: &[String], pattern: &str) -> Option<String> {
    let re = Regex::new(pattern).unwrap();
    lines
        .iter()
        .find_map(|line| re.captures(line).map(|c| c[1].trim_matches('"').to_string()))
}

/// Collect TRACK blocks and resolve their per-track fields.
///
/// Each block's fields are matched only against the lines between its TRACK
/// line and the next one (or end of sheet for the last block); the line
/// spans are scoping data only and are dropped here.
fn scan_tracks(lines: &[String]) -> Vec<TrackRecord> {
    let track_re = Regex::new(r"^ +TRACK +(\d+) +(.+)").unwrap();

    let mut spans: Vec<(String, usize)> = Vec::new();
    for (index, line) in lines.iter().enumerate() {
        if let Some(caps) = track_re.captures(line) {
            spans.push((caps[1].to_string(), index));
        }
    }
    if spans.is_empty() {
        return Vec::new();
    }

    let title_re = Regex::new(r"^ +TITLE +(.+)").unwrap();
    let performer_re = Regex::new(r"^ +PERFORMER +(.+)").unwrap();
    let index0_re = Regex::new(r"^ +INDEX 00 +(\d{2}:\d{2}:\d{2})").unwrap();
    let index1_re = Regex::new(r"^ +INDEX 01 +(\d{2}:\d{2}:\d{2})").unwrap();

    let mut tracks = Vec::with_capacity(spans.len());
    for (i, (number, start)) in spans.iter().enumerate() {
        let end = spans.get(i + 1).map(|next| next.1).unwrap_or(lines.len());
        let mut track = TrackRecord {
            number: number.clone(),
            ..TrackRecord::default()
        };
        for line in &lines[*start..end] {
            if track.title.is_none() {
                if let Some(caps) = title_re.captures(line) {
                    track.title = Some(caps[1].trim_matches('"').to_string());
                }
            }
            if track.performer.is_none() {
                if let Some(caps) = performer_re.captures(line) {
                    track.performer = Some(caps[1].trim_matches('"').to_string());
                }
            }
            if track.index0.is_none() {
                if let Some(caps) = index0_re.captures(line) {
                    track.index0 = Some(caps[1].to_string());
                }
            }
            if track.index1.is_none() {
                if let Some(caps) = index1_re.captures(line) {
                    track.index1 = Some(caps[1].to_string());
                }
            }
        }
        tracks.push(track);
    }
    tracks
}

/// Scan decoded sidecar lines into the album/track model.
///
/// Album fields are whole-line patterns anchored at column 0, track fields
/// indented patterns scoped to their block. First match wins everywhere.
/// A sheet without TRACK lines parses to an empty track list.
pub fn parse_cue(lines: &[String]) -> AlbumMetadata {
    AlbumMetadata {
        performer: first_value(lines, r"^PERFORMER +(.+)"),
        title: first_value(lines, r"^TITLE +(.+)"),
        genre: first_value(lines, r"^REM GENRE +(.+)"),
        disc_id: first_value(lines, r"^REM DISCID +(.+)"),
        date: first_value(lines, r"^REM DATE +(.+)"),
        comment: first_value(lines, r"^REM COMMENT +(.+)"),
        cover_front: None,
        tracks: scan_tracks(lines),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(text: &str) -> Vec<String> {
        text.lines().map(|l| l.to_string()).collect()
    }

    const TWO_TRACKS: &str = r#"REM GENRE Electronic
REM DATE 1998
REM DISCID 8B0A750C
PERFORMER "Artist"
TITLE "Album"
FILE "album.wav" WAVE
  TRACK 01 AUDIO
    TITLE "First"
    PERFORMER "Artist"
    INDEX 01 00:00:00
  TRACK 02 AUDIO
    TITLE "Second"
    INDEX 00 04:31:70
    INDEX 01 04:33:15
"#;

    #[test]
    fn test_album_fields() {
        let meta = parse_cue(&lines(TWO_TRACKS));
        assert_eq!(meta.performer.as_deref(), Some("Artist"));
        assert_eq!(meta.title.as_deref(), Some("Album"));
        assert_eq!(meta.genre.as_deref(), Some("Electronic"));
        assert_eq!(meta.disc_id.as_deref(), Some("8B0A750C"));
        assert_eq!(meta.date.as_deref(), Some("1998"));
        assert_eq!(meta.comment, None);
    }

    #[test]
    fn test_two_track_blocks() {
        let meta = parse_cue(&lines(TWO_TRACKS));
        assert_eq!(meta.tracks.len(), 2);

        let first = &meta.tracks[0];
        assert_eq!(first.number, "01");
        assert_eq!(first.title.as_deref(), Some("First"));
        assert_eq!(first.performer.as_deref(), Some("Artist"));
        assert_eq!(first.index0, None);
        assert_eq!(first.index1.as_deref(), Some("00:00:00"));

        let second = &meta.tracks[1];
        assert_eq!(second.number, "02");
        assert_eq!(second.title.as_deref(), Some("Second"));
        // PERFORMER only appears inside the first block, it must not leak
        assert_eq!(second.performer, None);
        assert_eq!(second.index0.as_deref(), Some("04:31:70"));
        assert_eq!(second.index1.as_deref(), Some("04:33:15"));
    }

    #[test]
    fn test_zero_tracks_is_not_an_error() {
        let meta = parse_cue(&lines("PERFORMER \"Artist\"\nTITLE \"Album\"\n"));
        assert_eq!(meta.title.as_deref(), Some("Album"));
        assert!(meta.tracks.is_empty());
    }

    #[test]
    fn test_first_match_wins() {
        let sheet = r#"TITLE "Kept"
TITLE "Ignored"
  TRACK 01 AUDIO
    TITLE "Track Kept"
    TITLE "Track Ignored"
    INDEX 01 00:00:00
"#;
        let meta = parse_cue(&lines(sheet));
        assert_eq!(meta.title.as_deref(), Some("Kept"));
        assert_eq!(meta.tracks[0].title.as_deref(), Some("Track Kept"));
    }

    #[test]
    fn test_track_fields_do_not_match_album_lines() {
        // An indented TRACK pattern must not swallow column-0 fields
        let sheet = "PERFORMER \"Album Artist\"\nTRACK 01 AUDIO\n";
        let meta = parse_cue(&lines(sheet));
        assert_eq!(meta.performer.as_deref(), Some("Album Artist"));
        assert!(meta.tracks.is_empty());
    }

    #[test]
    fn test_track_numbers_keep_leading_zeros() {
        let meta = parse_cue(&lines(TWO_TRACKS));
        let numbers: Vec<&str> = meta.tracks.iter().map(|t| t.number.as_str()).collect();
        assert_eq!(numbers, vec!["01", "02"]);
    }

    #[test]
    fn test_parse_is_idempotent() {
        let input = lines(TWO_TRACKS);
        assert_eq!(parse_cue(&input), parse_cue(&input));
    }

    #[test]
    fn test_timecode_shape_is_enforced() {
        let sheet = "  TRACK 01 AUDIO\n    INDEX 01 0:00:00\n";
        let meta = parse_cue(&lines(sheet));
        assert_eq!(meta.tracks[0].index1, None);
    }
}
