//! YouTube Data API v3 `videos` lookup.

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

pub const VIDEOS_ENDPOINT: &str = "https://www.googleapis.com/youtube/v3/videos";

/// Length of every YouTube video identifier
pub const VIDEO_ID_LEN: usize = 11;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(thiserror::Error, Debug)]
pub enum FetchError {
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("HTTP status {status}")]
    Status { status: u16 },
    #[error("API error {code}: {message}")]
    Api { code: u16, message: String },
    #[error("Failed to parse JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub struct VideoId(pub String);

impl VideoId {
    /// Take the text after the last `=` of a watch URL.
    ///
    /// Returns `Err` with the rejected candidate when it is not exactly
    /// [`VIDEO_ID_LEN`] characters long.
    pub fn from_title_url(url: &str) -> Result<Self, String> {
        let candidate = url.rsplit('=').next().unwrap_or_default();
        if candidate.chars().count() == VIDEO_ID_LEN {
            Ok(Self(candidate.to_string()))
        } else {
            Err(candidate.to_string())
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Clone, derive_more::Display)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(value: String) -> Self {
        Self(value)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl std::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

/// Body of a `videos?part=contentDetails` response
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VideoListResponse {
    #[serde(default)]
    pub items: Vec<VideoItem>,
    pub error: Option<ApiErrorBody>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub code: u16,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoItem {
    pub id: Option<String>,
    pub content_details: Option<ContentDetails>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContentDetails {
    pub duration: Option<String>,
}

impl VideoItem {
    pub fn duration(&self) -> Option<&str> {
        self.content_details.as_ref()?.duration.as_deref()
    }
}

/// One remote lookup for a batch of identifiers
#[async_trait]
pub trait VideoLookup: Send + Sync {
    async fn lookup(&self, ids: &[VideoId]) -> Result<VideoListResponse, FetchError>;
}

#[async_trait]
impl<L: VideoLookup + ?Sized> VideoLookup for std::sync::Arc<L> {
    async fn lookup(&self, ids: &[VideoId]) -> Result<VideoListResponse, FetchError> {
        (**self).lookup(ids).await
    }
}

/// `reqwest`-backed client for the Data API
#[derive(Debug, Clone)]
pub struct YoutubeDataApi {
    client: reqwest::Client,
    endpoint: String,
    api_key: ApiKey,
}

impl YoutubeDataApi {
    pub fn new(endpoint: impl Into<String>, api_key: ApiKey) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
            api_key,
        })
    }
}

pub fn join_ids(ids: &[VideoId]) -> String {
    ids.iter().map(VideoId::as_str).collect::<Vec<_>>().join(",")
}

/// Turn a raw response into either the item list or a [`FetchError`].
pub fn interpret_response(status: u16, body: &str) -> Result<VideoListResponse, FetchError> {
    let parsed = serde_json::from_str::<VideoListResponse>(body);

    if let Ok(VideoListResponse {
        error: Some(error), ..
    }) = &parsed
    {
        return Err(FetchError::Api {
            code: if error.code == 0 { status } else { error.code },
            message: error.message.clone(),
        });
    }

    if !(200..300).contains(&status) {
        return Err(FetchError::Status { status });
    }

    Ok(parsed?)
}

#[async_trait]
impl VideoLookup for YoutubeDataApi {
    async fn lookup(&self, ids: &[VideoId]) -> Result<VideoListResponse, FetchError> {
        let res = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("part", "contentDetails"),
                ("id", join_ids(ids).as_str()),
                ("key", self.api_key.as_str()),
            ])
            .send()
            .await?;

        let status = res.status().as_u16();
        let text = res.text().await?;

        interpret_response(status, &text)
    }
}
