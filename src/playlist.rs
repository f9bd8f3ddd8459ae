use serde::Deserialize;

use crate::player_response::get_json_object;

// Playlist pages carry their contents in `ytInitialData` rather than the
// player response. Only the path down to the video ids is modelled.

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitialData {
    pub metadata: Option<Metadata>,
    pub contents: Option<BrowseContents>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    pub playlist_metadata_renderer: Option<PlaylistMetadataRenderer>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistMetadataRenderer {
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrowseContents {
    pub two_column_browse_results_renderer: Option<TwoColumnBrowseResultsRenderer>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TwoColumnBrowseResultsRenderer {
    #[serde(default)]
    pub tabs: Vec<Tab>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tab {
    pub tab_renderer: Option<TabRenderer>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TabRenderer {
    pub content: Option<TabContent>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TabContent {
    pub section_list_renderer: Option<SectionListRenderer>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionListRenderer {
    #[serde(default)]
    pub contents: Vec<SectionContent>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionContent {
    pub item_section_renderer: Option<ItemSectionRenderer>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemSectionRenderer {
    #[serde(default)]
    pub contents: Vec<ItemContent>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemContent {
    pub playlist_video_list_renderer: Option<PlaylistVideoListRenderer>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistVideoListRenderer {
    #[serde(default)]
    pub contents: Vec<PlaylistVideoContent>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistVideoContent {
    pub playlist_video_renderer: Option<PlaylistVideoRenderer>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistVideoRenderer {
    pub video_id: String,
}

#[derive(thiserror::Error, Debug)]
pub enum PlaylistError {
    #[error("Could not find initial data")]
    NoInitialData,
    #[error("Could not parse initial data")]
    ParseInitialData(#[from] serde_json::Error),
    #[error("Page does not describe a playlist")]
    NotAPlaylist,
}

const INITIAL_DATA_STR: &str = "var ytInitialData =";

impl InitialData {
    pub fn from_html(html: &str) -> Result<Self, PlaylistError> {
        let data_str =
            get_json_object(html, INITIAL_DATA_STR).ok_or(PlaylistError::NoInitialData)?;

        serde_json::from_str(data_str).map_err(PlaylistError::ParseInitialData)
    }

    pub fn title(&self) -> Result<&str, PlaylistError> {
        self.metadata
            .as_ref()
            .and_then(|m| m.playlist_metadata_renderer.as_ref())
            .map(|r| r.title.as_str())
            .ok_or(PlaylistError::NotAPlaylist)
    }

    /// Walks down to the playlist video list and collects the video ids in
    /// page order. A page without a playlist renderer is `NotAPlaylist`.
    pub fn video_ids(&self) -> Result<Vec<String>, PlaylistError> {
        let renderer = self
            .contents
            .as_ref()
            .and_then(|c| c.two_column_browse_results_renderer.as_ref())
            .map(|r| r.tabs.iter())
            .into_iter()
            .flatten()
            .filter_map(|t| t.tab_renderer.as_ref())
            .filter_map(|t| t.content.as_ref())
            .filter_map(|c| c.section_list_renderer.as_ref())
            .flat_map(|s| s.contents.iter())
            .filter_map(|c| c.item_section_renderer.as_ref())
            .flat_map(|i| i.contents.iter())
            .find_map(|c| c.playlist_video_list_renderer.as_ref())
            .ok_or(PlaylistError::NotAPlaylist)?;

        Ok(renderer
            .contents
            .iter()
            .filter_map(|c| c.playlist_video_renderer.as_ref())
            .map(|r| r.video_id.clone())
            .collect())
    }
}
