use std::path::{Path, PathBuf};

use crate::notify::Notifier;
use crate::resolve::{self, ResolveError};
use crate::service::{Video, VideoService};
use crate::util;

#[derive(thiserror::Error, Debug)]
pub enum WorkerError {
    #[error("Invalid link")]
    InvalidUrl,
    #[error("No progressive stream available")]
    NoStreamAvailable,
    #[error("Download failed: {0}")]
    DownloadFailed(String),
}

impl From<ResolveError> for WorkerError {
    fn from(_: ResolveError) -> Self {
        WorkerError::NoStreamAvailable
    }
}

/// A single invocation of the downloader. Immutable once built.
#[derive(Debug, Clone)]
pub struct DownloadRequest {
    pub url: String,
    pub resolution: String,
}

impl DownloadRequest {
    /// `res` is a bare resolution number such as `"720"`; the empty string
    /// selects the 720p default.
    pub fn new(url: &str, res: &str) -> Self {
        let resolution = if res.is_empty() {
            String::from("720p")
        } else {
            format!("{}p", res)
        };

        Self {
            url: url.to_string(),
            resolution,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UrlKind {
    Video,
    Playlist,
    Invalid,
}

/// Case-sensitive substring classification, matching what the platform
/// itself puts in its URLs.
pub fn classify(url: &str) -> UrlKind {
    if !url.contains("youtube.com") {
        UrlKind::Invalid
    } else if url.contains("playlist") {
        UrlKind::Playlist
    } else {
        UrlKind::Video
    }
}

/// Drives sequential downloads against an extraction backend, reporting
/// through the injected notification sink. Save paths are computed under
/// `workdir`.
pub struct Downloader<'a> {
    service: &'a dyn VideoService,
    notifier: &'a dyn Notifier,
    workdir: PathBuf,
}

impl<'a> Downloader<'a> {
    pub fn new(
        service: &'a dyn VideoService,
        notifier: &'a dyn Notifier,
        workdir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            service,
            notifier,
            workdir: workdir.into(),
        }
    }

    pub async fn start(&self, request: &DownloadRequest) -> Result<(), WorkerError> {
        match classify(&request.url) {
            UrlKind::Invalid => {
                self.notifier.failure("Invalid link");
                Err(WorkerError::InvalidUrl)
            }
            UrlKind::Playlist => self.download_playlist(request).await,
            UrlKind::Video => self.download_single(request).await,
        }
    }

    async fn download_single(&self, request: &DownloadRequest) -> Result<(), WorkerError> {
        let video = match self.service.fetch_video(&request.url).await {
            Ok(video) => video,
            Err(e) if e.is_malformed_url() => {
                self.notifier.failure("Invalid link");
                return Err(WorkerError::InvalidUrl);
            }
            Err(e) => return Err(WorkerError::DownloadFailed(e.to_string())),
        };

        let save_path = self
            .workdir
            .join("video")
            .join(util::sanitize(&video.author));
        self.download_video(&video, &request.resolution, &save_path)
            .await?;

        self.notifier.success("Download complete");
        Ok(())
    }

    async fn download_playlist(&self, request: &DownloadRequest) -> Result<(), WorkerError> {
        let playlist = match self.service.fetch_playlist(&request.url).await {
            Ok(playlist) => playlist,
            Err(e) if e.is_malformed_url() => {
                self.notifier.failure("Invalid link");
                return Err(WorkerError::InvalidUrl);
            }
            Err(e) => return Err(WorkerError::DownloadFailed(e.to_string())),
        };

        let banner = format!("Downloading playlist: \"{}\"", playlist.title);
        let rule = "-".repeat(banner.len());
        self.notifier.info(&format!("\n{}\n{}\n{}", rule, banner, rule));

        let playlist_dir = util::sanitize(&playlist.title);
        let mut failed = 0usize;

        for url in &playlist.video_urls {
            // One broken entry must not abort the rest of the playlist
            if let Err(e) = self
                .download_playlist_item(url, &request.resolution, &playlist_dir)
                .await
            {
                self.notifier.failure(&format!("Skipping {}: {}", url, e));
                failed += 1;
            }
        }

        if failed == 0 {
            self.notifier.info(&format!(
                "{}\nPlaylist: \"{}\" downloaded\n{}\n",
                rule, playlist.title, rule
            ));
            self.notifier.success("Playlist downloaded");
            Ok(())
        } else {
            let reason = format!(
                "{} of {} videos failed",
                failed,
                playlist.video_urls.len()
            );
            self.notifier
                .failure(&format!("Playlist \"{}\": {}", playlist.title, reason));
            Err(WorkerError::DownloadFailed(reason))
        }
    }

    async fn download_playlist_item(
        &self,
        url: &str,
        requested: &str,
        playlist_dir: &str,
    ) -> Result<PathBuf, WorkerError> {
        let video = self
            .service
            .fetch_video(url)
            .await
            .map_err(|e| WorkerError::DownloadFailed(e.to_string()))?;

        let save_path = self
            .workdir
            .join("video")
            .join(util::sanitize(&video.author))
            .join(playlist_dir);

        self.download_video(&video, requested, &save_path).await
    }

    /// Downloads one video into `save_path`, together with an English
    /// subtitle track when one exists. Success notifications are left to
    /// the caller so a playlist chimes once, not once per entry.
    async fn download_video(
        &self,
        video: &Video,
        requested: &str,
        save_path: &Path,
    ) -> Result<PathBuf, WorkerError> {
        let streams = video.progressive_streams();
        let available = streams
            .iter()
            .map(|s| s.resolution.clone())
            .collect::<Vec<_>>();
        let resolution = resolve::resolve(requested, &available, self.notifier)?;

        let stream = streams
            .iter()
            .find(|s| s.resolution == resolution)
            .ok_or(WorkerError::NoStreamAvailable)?;

        let title = util::sanitize(&video.title);
        self.notifier
            .info(&format!("\nDownloading video\n{}\n", "-".repeat(14)));
        self.notifier.info(&format!("  Title: \"{}\"", title));
        self.notifier.info(&format!("  Author: \"{}\"", video.author));
        self.notifier
            .info(&format!("  Size: {}", util::format_size(stream.size_bytes)));
        self.notifier.info(&format!("  Quality: {}\n", resolution));

        tokio::fs::create_dir_all(save_path)
            .await
            .map_err(|e| WorkerError::DownloadFailed(e.to_string()))?;

        let media_path = save_path.join(format!("{}.mp4", title));
        self.service
            .download_stream(stream, &media_path, self.notifier)
            .await
            .map_err(|e| WorkerError::DownloadFailed(e.to_string()))?;

        self.fetch_subtitles(video, save_path, &title).await?;

        self.notifier
            .info(&format!("\nVideo saved to {}", media_path.display()));

        Ok(media_path)
    }

    async fn fetch_subtitles(
        &self,
        video: &Video,
        save_path: &Path,
        title: &str,
    ) -> Result<(), WorkerError> {
        let track = match video.english_captions() {
            Some(track) => track,
            None => return Ok(()),
        };

        // A track that fails to fetch or parse is treated as absent
        let srt = match self.service.fetch_captions(track).await {
            Ok(srt) => srt,
            Err(e) => {
                warn!("Could not fetch captions: {}", e);
                return Ok(());
            }
        };

        let path = save_path.join(format!("{}.srt", title));
        tokio::fs::write(&path, srt)
            .await
            .map_err(|e| WorkerError::DownloadFailed(e.to_string()))?;

        Ok(())
    }
}

/// Entry point: downloads the video or playlist at `url` into `video/`
/// under the current working directory. `res` is a bare resolution number
/// such as `"720"`; the empty string selects the default.
pub async fn download(
    service: &dyn VideoService,
    notifier: &dyn Notifier,
    url: &str,
    res: &str,
) -> Result<(), WorkerError> {
    let request = DownloadRequest::new(url, res);
    let workdir =
        std::env::current_dir().map_err(|e| WorkerError::DownloadFailed(e.to_string()))?;

    Downloader::new(service, notifier, workdir)
        .start(&request)
        .await
}
