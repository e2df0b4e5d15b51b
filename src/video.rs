use log::{debug, info};

use crate::common::ResourceKind;
use crate::error::{ApiError, Result};
use crate::pager::Pages;
use crate::resource::Resource;
use crate::youtube::YoutubeAPI;

/// Top-level comment threads requested per page
const COMMENTS_PER_PAGE: u32 = 100;

#[derive(Deserialize, Debug)]
struct YTVideo {
    snippet: YTVideoSnippet,
    statistics: YTVideoStatistics,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct YTVideoSnippet {
    title: String,
    description: String,
    #[serde(default)]
    tags: Vec<String>,
    published_at: String,
}

/// Counters arrive as strings, and any of them may be hidden
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct YTVideoStatistics {
    view_count: Option<String>,
    like_count: Option<String>,
    comment_count: Option<String>,
}

#[derive(Deserialize, Debug)]
struct YTCommentThread {
    snippet: YTCommentThreadSnippet,
    replies: Option<YTCommentReplies>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct YTCommentThreadSnippet {
    top_level_comment: YTComment,
}

#[derive(Deserialize, Debug)]
struct YTCommentReplies {
    comments: Vec<YTComment>,
}

#[derive(Deserialize, Debug)]
struct YTComment {
    snippet: YTCommentSnippet,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct YTCommentSnippet {
    text_display: String,
    author_display_name: String,
    like_count: u64,
    published_at: String,
}

/// Parse an optional counter, treating absence as zero
pub(crate) fn parse_count(field: &'static str, value: Option<&str>) -> Result<u64> {
    match value {
        None => Ok(0),
        Some(v) => v.parse().map_err(|_| ApiError::InvalidCount {
            field,
            value: v.into(),
        }),
    }
}

/// Descriptive info and statistics for a video
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct VideoMetadata {
    pub title: String,
    pub description: String,
    pub tags: Vec<String>,
    pub published_at: String,
    pub view_count: u64,
    pub like_count: u64,
    pub comment_count: u64,
}

impl VideoMetadata {
    fn from_api(v: YTVideo) -> Result<VideoMetadata> {
        let st = &v.statistics;
        Ok(VideoMetadata {
            view_count: parse_count("viewCount", st.view_count.as_deref())?,
            like_count: parse_count("likeCount", st.like_count.as_deref())?,
            comment_count: parse_count("commentCount", st.comment_count.as_deref())?,
            title: v.snippet.title,
            description: v.snippet.description,
            tags: v.snippet.tags,
            published_at: v.snippet.published_at,
        })
    }
}

/// A reply to a top-level comment
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Reply {
    pub text: String,
    pub author: String,
    pub like_count: u64,
    pub published_at: String,
}

impl From<YTComment> for Reply {
    fn from(c: YTComment) -> Self {
        Reply {
            text: c.snippet.text_display,
            author: c.snippet.author_display_name,
            like_count: c.snippet.like_count,
            published_at: c.snippet.published_at,
        }
    }
}

/// A top-level comment and its replies, in the order the API returned them
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Comment {
    pub text: String,
    pub author: String,
    pub like_count: u64,
    pub published_at: String,
    pub replies: Vec<Reply>,
}

impl From<YTCommentThread> for Comment {
    fn from(t: YTCommentThread) -> Self {
        let top = t.snippet.top_level_comment.snippet;
        let replies = t
            .replies
            .map(|r| r.comments.into_iter().map(Reply::from).collect())
            .unwrap_or_default();
        Comment {
            text: top.text_display,
            author: top.author_display_name,
            like_count: top.like_count,
            published_at: top.published_at,
            replies,
        }
    }
}

#[derive(Serialize, Debug)]
pub struct VideoDocument {
    pub metadata: VideoMetadata,
    pub comments: Vec<Comment>,
}

/// A single video
#[derive(Debug)]
pub struct Video<'a> {
    api: &'a YoutubeAPI,
    id: String,
    metadata: VideoMetadata,
}

impl<'a> Video<'a> {
    /// Every top-level comment, following page cursors until the last page
    pub fn comments(&self) -> Result<Vec<Comment>> {
        let pages = Pages::new(
            |page_token: Option<&str>| {
                self.api.fetch_page::<YTCommentThread>(
                    "commentThreads",
                    &[("part", "snippet,replies"), ("videoId", self.id.as_str())],
                    COMMENTS_PER_PAGE,
                    page_token,
                )
            },
            Some(self.api.comment_delay()),
        );

        let comments: Vec<Comment> = pages
            .collect_all()?
            .into_iter()
            .map(Comment::from)
            .collect();
        info!("Total top-level comments fetched: {}", comments.len());
        Ok(comments)
    }
}

impl<'a> Resource<'a> for Video<'a> {
    type Metadata = VideoMetadata;
    type Document = VideoDocument;

    const DEFAULT_FILENAME: &'static str = "video_data.json";

    fn fetch(api: &'a YoutubeAPI, id: &str) -> Result<Video<'a>> {
        debug!("Fetching metadata for video {}", id);
        let v: YTVideo = api.fetch_one(ResourceKind::Video, "videos", "snippet,statistics", id)?;
        Ok(Video {
            api,
            id: id.into(),
            metadata: VideoMetadata::from_api(v)?,
        })
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn metadata(&self) -> &VideoMetadata {
        &self.metadata
    }

    fn document(&self) -> Result<VideoDocument> {
        Ok(VideoDocument {
            metadata: self.metadata.clone(),
            comments: self.comments()?,
        })
    }
}
