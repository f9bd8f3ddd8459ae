use std::path::Path;
use std::sync::OnceLock;

use async_trait::async_trait;
use regex::Regex;

use crate::captions;
use crate::notify::Notifier;
use crate::player_response::{self, InitialPlayerResponse, Status};
use crate::playlist::{self, InitialData};
use crate::util::{self, HttpClient};

/// A single fetchable stream variant of a video.
#[derive(Debug, Clone, PartialEq)]
pub struct Stream {
    /// Resolution label such as `"720p"`.
    pub resolution: String,
    pub size_bytes: u64,
    /// Whether audio and video come bundled in one fetchable unit.
    pub progressive: bool,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CaptionTrack {
    pub language_code: String,
    pub auto_generated: bool,
    pub url: String,
}

/// Metadata and stream inventory for one remote video.
#[derive(Debug, Clone)]
pub struct Video {
    pub title: String,
    pub author: String,
    /// All known streams, sorted ascending by resolution height.
    pub streams: Vec<Stream>,
    pub captions: Vec<CaptionTrack>,
}

impl Video {
    pub fn progressive_streams(&self) -> Vec<&Stream> {
        self.streams.iter().filter(|s| s.progressive).collect()
    }

    /// Prefers a manually authored English track over the auto-generated one.
    pub fn english_captions(&self) -> Option<&CaptionTrack> {
        self.captions
            .iter()
            .find(|t| t.language_code == "en" && !t.auto_generated)
            .or_else(|| {
                self.captions
                    .iter()
                    .find(|t| t.language_code == "en" && t.auto_generated)
            })
    }
}

#[derive(Debug, Clone)]
pub struct Playlist {
    pub title: String,
    pub video_urls: Vec<String>,
}

#[derive(thiserror::Error, Debug)]
pub enum ServiceError {
    #[error("Could not fetch page: {0}")]
    Fetch(#[from] util::DownloadError),
    #[error("Could not parse video page: {0}")]
    VideoPage(#[from] player_response::PlayerResponseError),
    #[error("Could not parse playlist page: {0}")]
    PlaylistPage(#[from] playlist::PlaylistError),
    #[error("Video is not playable: {0}")]
    NotPlayable(String),
    #[error("Could not parse caption track: {0}")]
    Captions(#[from] quick_xml::Error),
}

impl ServiceError {
    /// True for the error class meaning the URL did not lead to a parseable
    /// video or playlist page, as opposed to transport or content problems.
    pub fn is_malformed_url(&self) -> bool {
        matches!(
            self,
            ServiceError::VideoPage(_) | ServiceError::PlaylistPage(_)
        )
    }
}

/// External video-extraction capability.
///
/// The orchestrator only ever talks to this trait, so frontends and tests
/// can substitute their own backend.
#[async_trait]
pub trait VideoService: Send + Sync {
    async fn fetch_video(&self, url: &str) -> Result<Video, ServiceError>;

    async fn fetch_playlist(&self, url: &str) -> Result<Playlist, ServiceError>;

    /// Fetches `stream` into `dest`, forwarding progress to the sink. May
    /// block (await) for an arbitrary duration.
    async fn download_stream(
        &self,
        stream: &Stream,
        dest: &Path,
        notifier: &dyn Notifier,
    ) -> Result<u64, ServiceError>;

    /// Fetches a caption track and returns it converted to SRT.
    async fn fetch_captions(&self, track: &CaptionTrack) -> Result<String, ServiceError>;
}

/// Production backend scraping youtube.com watch and playlist pages.
pub struct YoutubeService {
    client: HttpClient,
}

fn resolution_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d+p").expect("static pattern"))
}

/// Normalizes a quality label to its bare resolution, `"720p60"` -> `"720p"`.
fn resolution_of(label: &str) -> Option<String> {
    resolution_re().find(label).map(|m| m.as_str().to_string())
}

fn resolution_height(resolution: &str) -> u32 {
    resolution.trim_end_matches('p').parse().unwrap_or(0)
}

fn to_stream(f: &player_response::Format, progressive: bool) -> Option<Stream> {
    // Formats behind signature ciphers carry no direct url; skip them
    let url = f.url.clone()?;
    let resolution = f.quality_label.as_deref().and_then(resolution_of)?;

    Some(Stream {
        resolution,
        size_bytes: f.content_length.unwrap_or(0),
        progressive,
        url,
    })
}

impl YoutubeService {
    pub fn new() -> reqwest::Result<Self> {
        Ok(Self {
            client: HttpClient::new()?,
        })
    }
}

#[async_trait]
impl VideoService for YoutubeService {
    async fn fetch_video(&self, url: &str) -> Result<Video, ServiceError> {
        let html = self.client.fetch_text(url).await?;
        let ipr = InitialPlayerResponse::from_html(&html)?;

        let details = match ipr.video_details {
            Some(ref d) if ipr.playability_status.status == Status::Ok => d,
            _ => {
                let reason = ipr
                    .playability_status
                    .reason
                    .clone()
                    .unwrap_or_else(|| String::from("no playable video details"));
                return Err(ServiceError::NotPlayable(reason));
            }
        };

        let mut streams = Vec::new();
        if let Some(sd) = ipr.streaming_data.as_ref() {
            streams.extend(sd.formats.iter().filter_map(|f| to_stream(f, true)));
            streams.extend(sd.adaptive_formats.iter().filter_map(|f| to_stream(f, false)));
        }
        streams.sort_by_key(|s| resolution_height(&s.resolution));

        let captions = ipr
            .captions
            .iter()
            .flat_map(|c| c.player_captions_tracklist_renderer.caption_tracks.iter())
            .map(|t| CaptionTrack {
                language_code: t.language_code.clone(),
                auto_generated: t.kind.as_deref() == Some("asr"),
                url: t.base_url.clone(),
            })
            .collect();

        debug!(
            "Fetched video {} ({} streams, {} caption tracks)",
            details.video_id,
            streams.len(),
            ipr.captions
                .as_ref()
                .map(|c| c.player_captions_tracklist_renderer.caption_tracks.len())
                .unwrap_or(0)
        );

        Ok(Video {
            title: details.title.clone(),
            author: details.author.clone(),
            streams,
            captions,
        })
    }

    async fn fetch_playlist(&self, url: &str) -> Result<Playlist, ServiceError> {
        let html = self.client.fetch_text(url).await?;
        let data = InitialData::from_html(&html)?;

        let title = data.title()?.to_string();
        let video_urls = data
            .video_ids()?
            .into_iter()
            .map(|id| format!("https://www.youtube.com/watch?v={}", id))
            .collect::<Vec<_>>();

        debug!("Playlist \"{}\" has {} videos", title, video_urls.len());

        Ok(Playlist { title, video_urls })
    }

    async fn download_stream(
        &self,
        stream: &Stream,
        dest: &Path,
        notifier: &dyn Notifier,
    ) -> Result<u64, ServiceError> {
        let size = self.client.download_file(&stream.url, dest, notifier).await?;
        Ok(size)
    }

    async fn fetch_captions(&self, track: &CaptionTrack) -> Result<String, ServiceError> {
        let xml = self.client.fetch_text(&track.url).await?;
        let cues = captions::parse_timedtext(&xml)?;
        Ok(captions::to_srt(&cues))
    }
}
