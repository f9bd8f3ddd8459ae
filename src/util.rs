use std::{path::Path, sync::Arc};

use reqwest_cookie_store::CookieStoreMutex;
use reqwest_middleware::ClientWithMiddleware;
use reqwest_retry::{policies::ExponentialBackoff, RetryTransientMiddleware};
use tokio::{fs::File, io::AsyncWriteExt};

use crate::notify::Notifier;

pub struct HttpClient {
    pub client: ClientWithMiddleware,
    pub cookies: Arc<CookieStoreMutex>,
}

#[derive(thiserror::Error, Debug)]
pub enum DownloadError {
    #[error("reqwest error: {0}")]
    ReqwestError(#[from] reqwest::Error),
    #[error("reqwest middleware error: {0}")]
    ReqwestMiddlewareError(#[from] reqwest_middleware::Error),
    #[error("io error: {0}")]
    IoError(#[from] std::io::Error),
}

impl HttpClient {
    pub fn new() -> reqwest::Result<HttpClient> {
        let cookies = Arc::new(CookieStoreMutex::default());
        let retry_policy = ExponentialBackoff::builder().build_with_max_retries(3);

        let client = reqwest::Client::builder()
            .cookie_provider(cookies.clone())
            .build()?;

        let client = reqwest_middleware::ClientBuilder::new(client)
            .with(RetryTransientMiddleware::new_with_policy(retry_policy))
            .build();

        Ok(HttpClient { client, cookies })
    }

    /// Streams `url` into `path`, reporting each received chunk to the
    /// notification sink. The file is written to a `.tmp` sibling and only
    /// renamed into place once fully flushed.
    pub async fn download_file(
        &self,
        url: &str,
        path: &Path,
        notifier: &dyn Notifier,
    ) -> Result<u64, DownloadError> {
        let temp_path = path.with_extension("tmp");
        let mut file = File::create(&temp_path).await?;
        let mut resp = self.client.get(url).send().await?;
        let total = resp.content_length();
        let mut size = 0u64;

        while let Some(chunk) = resp.chunk().await? {
            file.write_all(&chunk).await?;
            size += chunk.len() as u64;
            notifier.progress(size, total);
        }

        file.flush().await?;
        tokio::fs::rename(&temp_path, path).await?;

        Ok(size)
    }

    pub async fn fetch_text(&self, url: &str) -> Result<String, DownloadError> {
        self.client
            .get(url)
            .send()
            .await?
            .text()
            .await
            .map_err(|e| e.into())
    }
}

/// Renders a byte count with two decimals on the base-1024 `iB` ladder,
/// e.g. `1536` becomes `"1.50 KiB"`.
pub fn format_size(bytes: u64) -> String {
    let mut size = bytes as f64;

    for unit in ["", "K", "M", "G", "T"] {
        if size < 1024.0 {
            return format!("{:.2} {}iB", size, unit);
        }
        size /= 1024.0;
    }

    format!("{:.2} PiB", size)
}

/// Strips characters that break file or directory names. Quotes and
/// punctuation are dropped, separators are replaced with `_`, and
/// surrounding whitespace is trimmed.
pub fn sanitize(text: &str) -> String {
    text.chars()
        .filter_map(|c| match c {
            '\'' | '"' | '?' | '<' | ':' | ';' | '.' => None,
            '|' | '/' | '\\' | '*' | '>' => Some('_'),
            c => Some(c),
        })
        .collect::<String>()
        .trim()
        .to_string()
}
