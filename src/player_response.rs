use serde::Deserialize;
use serde_aux::prelude::*;

// Generated with https://transform.tools/json-to-rust-serde

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitialPlayerResponse {
    pub playability_status: PlayabilityStatus,
    pub streaming_data: Option<StreamingData>,
    pub video_details: Option<VideoDetails>,
    pub captions: Option<Captions>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayabilityStatus {
    pub status: Status,
    pub reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    Ok,
    LiveStreamOffline,
    Unplayable,
    LoginRequired,
    Error,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamingData {
    /// Muxed formats carrying audio and video in one stream.
    #[serde(default)]
    pub formats: Vec<Format>,
    /// Separate audio/video formats that would need client-side muxing.
    #[serde(default)]
    pub adaptive_formats: Vec<Format>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Format {
    pub itag: i64,
    pub url: Option<String>,
    pub mime_type: String,
    pub quality_label: Option<String>,
    #[serde(default, deserialize_with = "deserialize_option_number_from_string")]
    pub content_length: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoDetails {
    pub video_id: String,
    pub title: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub length_seconds: i64,
    pub author: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Captions {
    pub player_captions_tracklist_renderer: PlayerCaptionsTracklistRenderer,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerCaptionsTracklistRenderer {
    #[serde(default)]
    pub caption_tracks: Vec<CaptionTrack>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptionTrack {
    pub base_url: String,
    pub language_code: String,
    /// `"asr"` marks an auto-generated track.
    pub kind: Option<String>,
}

#[derive(thiserror::Error, Debug)]
pub enum PlayerResponseError {
    #[error("Could not find initial player response")]
    NoInitialPlayerResponse,
    #[error("Could not parse initial player response")]
    ParseInitialPlayerResponse(#[from] serde_json::Error),
}

const IPR_STR: &str = "var ytInitialPlayerResponse =";

/// Slices the JSON object assigned to `marker` out of a script tag.
pub(crate) fn get_json_object<'a>(html: &'a str, marker: &str) -> Option<&'a str> {
    // Find the start of the assignment
    let idx_marker = html.find(marker)? + marker.len();

    // Find the start and end of the JSON object
    let idx_start = html[idx_marker..].find('{')? + idx_marker;
    let idx_end = html[idx_start..].find("};")? + idx_start + 1;

    // Bounds check
    if idx_start >= idx_end || idx_start >= html.len() || idx_end >= html.len() {
        return None;
    }

    Some(&html[idx_start..idx_end])
}

impl InitialPlayerResponse {
    pub fn from_html(html: &str) -> Result<Self, PlayerResponseError> {
        // Find the initial player response
        let ipr_str =
            get_json_object(html, IPR_STR).ok_or(PlayerResponseError::NoInitialPlayerResponse)?;

        // Parse the JSON
        serde_json::from_str(ipr_str).map_err(PlayerResponseError::ParseInitialPlayerResponse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_object_slicing() {
        let test_str = r#"<script>var ytInitialPlayerResponse = {"response": "test"};</script>"#;
        let result = get_json_object(test_str, IPR_STR).expect("Could not find IPR");
        assert_eq!(result, r#"{"response": "test"}"#);

        let test_str = r#"<script>var ytInitialPlayerResponse = {"#;
        assert!(get_json_object(test_str, IPR_STR).is_none());

        let test_str = r#"<script>var ytInitialPlayerResponse = "#;
        assert!(get_json_object(test_str, IPR_STR).is_none());

        let test_str = r#"<script>var ytInitialPlayerResponse ="#;
        assert!(get_json_object(test_str, IPR_STR).is_none());
    }

    fn test_html() -> String {
        let json = r#"{
            "playabilityStatus": {"status": "OK"},
            "streamingData": {
                "formats": [
                    {
                        "itag": 18,
                        "url": "https://example.com/18",
                        "mimeType": "video/mp4; codecs=\"avc1.42001E, mp4a.40.2\"",
                        "qualityLabel": "360p",
                        "contentLength": "10485760"
                    },
                    {
                        "itag": 22,
                        "url": "https://example.com/22",
                        "mimeType": "video/mp4; codecs=\"avc1.64001F, mp4a.40.2\"",
                        "qualityLabel": "720p",
                        "contentLength": "31457280"
                    }
                ],
                "adaptiveFormats": [
                    {
                        "itag": 140,
                        "url": "https://example.com/140",
                        "mimeType": "audio/mp4; codecs=\"mp4a.40.2\"",
                        "bitrate": 130000
                    }
                ]
            },
            "videoDetails": {
                "videoId": "abc123def45",
                "title": "Test video",
                "lengthSeconds": "212",
                "author": "Test channel"
            },
            "captions": {
                "playerCaptionsTracklistRenderer": {
                    "captionTracks": [
                        {
                            "baseUrl": "https://example.com/timedtext?lang=en",
                            "languageCode": "en",
                            "kind": "asr"
                        }
                    ]
                }
            }
        };"#;
        format!("<script>var ytInitialPlayerResponse = {}</script>", json)
    }

    #[test]
    fn ipr_parse() {
        let ipr = InitialPlayerResponse::from_html(&test_html()).expect("Could not parse IPR");

        assert_eq!(ipr.playability_status.status, Status::Ok);

        let details = ipr.video_details.expect("No video details");
        assert_eq!(details.title, "Test video");
        assert_eq!(details.author, "Test channel");
        assert_eq!(details.length_seconds, 212);

        let sd = ipr.streaming_data.expect("No streaming data");
        assert_eq!(sd.formats.len(), 2);
        assert_eq!(sd.formats[1].quality_label.as_deref(), Some("720p"));
        assert_eq!(sd.formats[1].content_length, Some(31_457_280));
        assert_eq!(sd.adaptive_formats.len(), 1);
        assert_eq!(sd.adaptive_formats[0].quality_label, None);

        let tracks = ipr
            .captions
            .expect("No captions")
            .player_captions_tracklist_renderer
            .caption_tracks;
        assert_eq!(tracks.len(), 1);
        assert_eq!(tracks[0].language_code, "en");
        assert_eq!(tracks[0].kind.as_deref(), Some("asr"));
    }

    #[test]
    fn ipr_unknown_status() {
        let html = r#"var ytInitialPlayerResponse = {"playabilityStatus": {"status": "CONTENT_CHECK_REQUIRED", "reason": "check"}};"#;
        let ipr = InitialPlayerResponse::from_html(html).expect("Could not parse IPR");
        assert_eq!(ipr.playability_status.status, Status::Unknown);
        assert_eq!(ipr.playability_status.reason.as_deref(), Some("check"));
    }
}
