use std::time::Duration;

use log::{debug, trace};

use crate::channel::Channel;
use crate::common::ResourceKind;
use crate::config::Config;
use crate::error::{ApiError, Result};
use crate::pager::Page;
use crate::resource::Resource;
use crate::video::Video;

pub const DEFAULT_API_URL: &str = "https://www.googleapis.com";

/// Delay between successive pages of comments
pub const DEFAULT_COMMENT_DELAY: Duration = Duration::from_millis(500);

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct YTListResponse<T> {
    next_page_token: Option<String>,
    items: Vec<T>,
}

#[derive(Deserialize, Debug)]
struct YTErrorResponse {
    error: YTErrorBody,
}

#[derive(Deserialize, Debug)]
struct YTErrorBody {
    message: String,
}

/// Pull the human readable message out of an error body, falling back to the raw text
fn error_message(text: &str) -> String {
    match serde_json::from_str::<YTErrorResponse>(text) {
        Ok(e) => e.error.message,
        Err(_) => text.trim().to_string(),
    }
}

/// Client for the Youtube Data API (v3), holding the API key used for every request
#[derive(Clone)]
pub struct YoutubeAPI {
    api_key: String,
    prefix: String,
    comment_delay: Duration,
}

impl std::fmt::Debug for YoutubeAPI {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "YoutubeAPI{{prefix: {:?}, comment_delay: {:?}}}",
            self.prefix, self.comment_delay,
        )
    }
}

impl YoutubeAPI {
    pub fn new(api_key: &str) -> YoutubeAPI {
        YoutubeAPI {
            api_key: api_key.into(),
            prefix: DEFAULT_API_URL.into(),
            comment_delay: DEFAULT_COMMENT_DELAY,
        }
    }

    pub fn from_config(cfg: &Config) -> YoutubeAPI {
        YoutubeAPI::new(&cfg.api_key)
            .with_prefix(&cfg.api_url)
            .with_comment_delay(cfg.comment_page_delay)
    }

    /// Send requests to `prefix` instead of the public API host
    pub fn with_prefix(mut self, prefix: &str) -> YoutubeAPI {
        self.prefix = prefix.trim_end_matches('/').into();
        self
    }

    pub fn with_comment_delay(mut self, delay: Duration) -> YoutubeAPI {
        self.comment_delay = delay;
        self
    }

    pub fn comment_delay(&self) -> Duration {
        self.comment_delay
    }

    /// Look up a video, fetching its metadata
    pub fn get_video(&self, id: &str) -> Result<Video> {
        Video::fetch(self, id)
    }

    /// Look up a channel, fetching its metadata
    pub fn get_channel(&self, id: &str) -> Result<Channel> {
        Channel::fetch(self, id)
    }

    fn request<T: serde::de::DeserializeOwned + std::fmt::Debug>(
        &self,
        endpoint: &str,
        params: &[(&str, &str)],
    ) -> Result<T> {
        let url = format!("{prefix}/youtube/v3/{endpoint}", prefix = self.prefix, endpoint = endpoint);
        debug!("Retrieving {} {:?}", endpoint, params);

        let mut req = attohttpc::get(&url).param("key", &self.api_key);
        for (k, v) in params {
            req = req.param(k, v);
        }
        let resp = req.send().map_err(|source| ApiError::Transport {
            endpoint: endpoint.into(),
            source,
        })?;

        let status = resp.status();
        let text = resp.text().map_err(|source| ApiError::Transport {
            endpoint: endpoint.into(),
            source,
        })?;
        trace!("Raw response: {}", &text);

        if !status.is_success() {
            return Err(ApiError::Api {
                endpoint: endpoint.into(),
                status: status.as_u16(),
                message: error_message(&text),
            });
        }

        let data: T = serde_json::from_str(&text).map_err(|source| ApiError::Malformed {
            endpoint: endpoint.into(),
            source,
        })?;
        trace!("Raw deserialisation: {:?}", &data);
        Ok(data)
    }

    /// Fetch the single item named by `id`. Any items after the first are ignored.
    pub(crate) fn fetch_one<T: serde::de::DeserializeOwned + std::fmt::Debug>(
        &self,
        kind: ResourceKind,
        endpoint: &str,
        part: &str,
        id: &str,
    ) -> Result<T> {
        let d: YTListResponse<T> = self.request(endpoint, &[("part", part), ("id", id)])?;
        d.items.into_iter().next().ok_or_else(|| ApiError::NotFound {
            kind,
            id: id.into(),
        })
    }

    /// Fetch one page of a listing. Without `page_token` the first page is returned.
    pub(crate) fn fetch_page<T: serde::de::DeserializeOwned + std::fmt::Debug>(
        &self,
        endpoint: &str,
        params: &[(&str, &str)],
        max_results: u32,
        page_token: Option<&str>,
    ) -> Result<Page<T>> {
        let max_results = max_results.to_string();
        let mut all: Vec<(&str, &str)> = params.to_vec();
        all.push(("maxResults", max_results.as_str()));
        if let Some(token) = page_token {
            all.push(("pageToken", token));
        }

        let d: YTListResponse<T> = self.request(endpoint, &all)?;
        Ok(Page {
            items: d.items,
            next_page_token: d.next_page_token,
        })
    }
}
