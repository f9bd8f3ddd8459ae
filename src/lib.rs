//! # ytg-rs
//!
//! This crate downloads a single YouTube video or a whole playlist at a
//! requested resolution. It picks the closest available progressive stream,
//! writes the media file (plus an English subtitle track when one exists)
//! under `video/<author>[/<playlist>]`, and reports progress and results
//! through a caller-supplied notification sink.
//!
//! ## Usage
//!
//! The `worker` module drives everything; the `service` module holds the
//! seam to the actual extraction backend, so tests (or other frontends) can
//! substitute their own.
//!
//! ```no_run
//! use ytg_rs::{notify::TerminalNotifier, service::YoutubeService, worker};
//!
//! #[tokio::main]
//! async fn main() {
//!     // Visual notices plus audible cues on success/failure
//!     let notifier = TerminalNotifier::new(true);
//!
//!     // Production extraction backend over a retrying reqwest client
//!     let service = YoutubeService::new().unwrap();
//!
//!     // Empty resolution selects the 720p default
//!     worker::download(&service, &notifier, "https://www.youtube.com/watch?v=...", "")
//!         .await
//!         .unwrap();
//! }
//! ```
//!
//! A playlist URL downloads every entry in order; one broken entry does not
//! abort the rest of the batch.

#[forbid(unsafe_code)]
#[macro_use]
extern crate log;

pub mod captions;
pub mod notify;
pub mod player_response;
pub mod playlist;
pub mod resolve;
pub mod service;
pub mod util;
pub mod worker;
