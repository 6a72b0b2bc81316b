use serde::Serialize;

use crate::cue::{AlbumMetadata, TrackRecord};
use crate::pair::FilePair;

/// One track in the report surface.
#[derive(Debug, Serialize)]
pub struct TrackReport {
    pub num: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub performer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index0: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index1: Option<String>,
}

impl From<&TrackRecord> for TrackReport {
    fn from(track: &TrackRecord) -> Self {
        Self {
            num: track.number.clone(),
            title: track.title.clone(),
            performer: track.performer.clone(),
            index0: track.index0.clone(),
            index1: track.index1.clone(),
        }
    }
}

/// Final observable output of the metadata-extraction path.
///
/// Key spelling matches the historical JSON surface; absent fields are
/// omitted rather than serialized as null. `tracks` is present (possibly
/// empty) whenever metadata was extracted at all.
#[derive(Debug, Default, Serialize)]
pub struct ExtractionReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cue: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media: Option<String>,
    #[serde(rename = "album performer", skip_serializing_if = "Option::is_none")]
    pub performer: Option<String>,
    #[serde(rename = "album", skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
    #[serde(rename = "disc ID", skip_serializing_if = "Option::is_none")]
    pub disc_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(rename = "cover front", skip_serializing_if = "Option::is_none")]
    pub cover_front: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tracks: Option<Vec<TrackReport>>,
}

impl ExtractionReport {
    pub fn new(pair: &FilePair, metadata: Option<&AlbumMetadata>) -> Self {
        let mut report = Self {
            cue: pair.cue.as_ref().map(|p| p.display().to_string()),
            media: pair.media.as_ref().map(|p| p.display().to_string()),
            ..Self::default()
        };
        if let Some(meta) = metadata {
            report.performer = meta.performer.clone();
            report.title = meta.title.clone();
            report.genre = meta.genre.clone();
            report.disc_id = meta.disc_id.clone();
            report.date = meta.date.clone();
            report.comment = meta.comment.clone();
            report.cover_front = meta.cover_front.as_ref().map(|p| p.display().to_string());
            report.tracks = Some(meta.tracks.iter().map(TrackReport::from).collect());
        }
        report
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
