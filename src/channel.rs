use log::{debug, info};

use crate::common::ResourceKind;
use crate::error::Result;
use crate::pager::Pages;
use crate::resource::Resource;
use crate::video::parse_count;
use crate::youtube::YoutubeAPI;

/// Playlists, and videos within a playlist, requested per page
const ITEMS_PER_PAGE: u32 = 50;

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct YTChannel {
    snippet: YTChannelSnippet,
    statistics: YTChannelStatistics,
    content_details: Option<YTContentDetails>,
}

#[derive(Deserialize, Debug)]
struct YTChannelSnippet {
    title: String,
    description: String,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct YTChannelStatistics {
    subscriber_count: Option<String>,
    view_count: Option<String>,
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
struct YTContentDetails {
    #[serde(default)]
    related_playlists: YTRelatedPlaylists,
}

#[derive(Deserialize, Debug, Clone, Default)]
struct YTRelatedPlaylists {
    uploads: Option<String>,
}

#[derive(Deserialize, Debug)]
struct YTPlaylist {
    id: String,
    snippet: YTPlaylistSnippet,
}

#[derive(Deserialize, Debug)]
struct YTPlaylistSnippet {
    title: String,
    #[serde(default)]
    description: String,
}

#[derive(Deserialize, Debug)]
struct YTPlaylistItem {
    snippet: YTPlaylistItemSnippet,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct YTPlaylistItemSnippet {
    title: String,
    published_at: String,
    resource_id: YTPlaylistItemResource,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct YTPlaylistItemResource {
    video_id: String,
}

/// Important info about a channel
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ChannelMetadata {
    pub title: String,
    pub description: String,
    pub subscriber_count: u64,
    pub view_count: u64,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Playlist {
    pub playlist_id: String,
    pub title: String,
    pub description: String,
}

impl From<YTPlaylist> for Playlist {
    fn from(p: YTPlaylist) -> Self {
        Playlist {
            playlist_id: p.id,
            title: p.snippet.title,
            description: p.snippet.description,
        }
    }
}

/// Summary of a video within a playlist
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct PlaylistVideo {
    pub video_id: String,
    pub title: String,
    pub published_at: String,
}

impl From<YTPlaylistItem> for PlaylistVideo {
    fn from(i: YTPlaylistItem) -> Self {
        PlaylistVideo {
            video_id: i.snippet.resource_id.video_id,
            title: i.snippet.title,
            published_at: i.snippet.published_at,
        }
    }
}

#[derive(Serialize, Debug)]
pub struct PlaylistDocument {
    pub playlist_id: String,
    pub title: String,
    pub description: String,
    pub videos: Vec<PlaylistVideo>,
}

#[derive(Serialize, Debug)]
pub struct ChannelDocument {
    pub title: String,
    pub description: String,
    pub subscriber_count: u64,
    pub view_count: u64,
    pub playlists: Vec<PlaylistDocument>,
}

/// A channel and the playlists it owns
#[derive(Debug)]
pub struct Channel<'a> {
    api: &'a YoutubeAPI,
    id: String,
    metadata: ChannelMetadata,
    content_details: YTContentDetails,
}

impl<'a> Channel<'a> {
    /// ID of the playlist holding every upload, when the API reported one
    pub fn uploads_playlist(&self) -> Option<&str> {
        self.content_details.related_playlists.uploads.as_deref()
    }

    /// All playlists owned by the channel
    pub fn playlists(&self) -> Result<Vec<Playlist>> {
        let items = Pages::new(
            |page_token: Option<&str>| {
                self.api.fetch_page::<YTPlaylist>(
                    "playlists",
                    &[("part", "snippet"), ("channelId", self.id.as_str())],
                    ITEMS_PER_PAGE,
                    page_token,
                )
            },
            None,
        )
        .collect_all()?;

        Ok(items.into_iter().map(Playlist::from).collect())
    }

    /// Videos in the given playlist, in playlist order
    pub fn playlist_videos(&self, playlist_id: &str) -> Result<Vec<PlaylistVideo>> {
        let items = Pages::new(
            |page_token: Option<&str>| {
                self.api.fetch_page::<YTPlaylistItem>(
                    "playlistItems",
                    &[("part", "snippet"), ("playlistId", playlist_id)],
                    ITEMS_PER_PAGE,
                    page_token,
                )
            },
            None,
        )
        .collect_all()?;

        Ok(items.into_iter().map(PlaylistVideo::from).collect())
    }
}

impl<'a> Resource<'a> for Channel<'a> {
    type Metadata = ChannelMetadata;
    type Document = ChannelDocument;

    const DEFAULT_FILENAME: &'static str = "channel_data.json";

    fn fetch(api: &'a YoutubeAPI, id: &str) -> Result<Channel<'a>> {
        debug!("Fetching metadata for channel {}", id);
        let c: YTChannel = api.fetch_one(
            ResourceKind::Channel,
            "channels",
            "snippet,statistics,contentDetails",
            id,
        )?;

        let metadata = ChannelMetadata {
            subscriber_count: parse_count("subscriberCount", c.statistics.subscriber_count.as_deref())?,
            view_count: parse_count("viewCount", c.statistics.view_count.as_deref())?,
            title: c.snippet.title,
            description: c.snippet.description,
        };

        Ok(Channel {
            api,
            id: id.into(),
            metadata,
            content_details: c.content_details.unwrap_or_default(),
        })
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn metadata(&self) -> &ChannelMetadata {
        &self.metadata
    }

    fn document(&self) -> Result<ChannelDocument> {
        let playlists = self.playlists()?;
        info!("Found {} playlists for channel {}", playlists.len(), self.id);

        let mut docs = Vec::with_capacity(playlists.len());
        for pl in playlists {
            debug!("Fetching videos in playlist {:?}", &pl);
            let videos = self.playlist_videos(&pl.playlist_id)?;
            docs.push(PlaylistDocument {
                playlist_id: pl.playlist_id,
                title: pl.title,
                description: pl.description,
                videos,
            });
        }

        let m = &self.metadata;
        Ok(ChannelDocument {
            title: m.title.clone(),
            description: m.description.clone(),
            subscriber_count: m.subscriber_count,
            view_count: m.view_count,
            playlists: docs,
        })
    }
}
