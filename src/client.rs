use crate::models::{
    AllTimeSubredditTotal, BatchCommentsResponse, ChampionResponse, Comment, SubredditTotal,
    TotalsResponse, WeeklyTrends,
};
use reqwest::{header, Client};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, error};

pub const WEEKLY_TRENDS_PATH: &str = "/api/weekly-trends";
pub const ALL_TIME_CHAMPION_PATH: &str = "/api/all-time-champion";
pub const ALL_TIME_TOTALS_PATH: &str = "/api/all-time-subreddit-totals";
pub const SUBREDDIT_TOTALS_PATH: &str = "/api/subreddit-totals";
pub const COMMENTS_BATCH_PATH: &str = "/api/comments/batch";

const CACHE_CONTROL: &str = "public, max-age=600";

/// Any failed read against the statistics API. Status, transport and decode
/// failures are deliberately not distinguished.
#[derive(Debug, Error)]
#[error("request to {endpoint} failed: {reason}")]
pub struct ApiError {
    pub endpoint: &'static str,
    pub reason: String,
}

impl ApiError {
    fn new(endpoint: &'static str, reason: impl ToString) -> Self {
        Self {
            endpoint,
            reason: reason.to_string(),
        }
    }
}

#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(http: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn weekly_trends(&self) -> Result<WeeklyTrends, ApiError> {
        self.fetch_with_cache(WEEKLY_TRENDS_PATH).await
    }

    pub async fn all_time_champion(&self) -> Result<Option<Comment>, ApiError> {
        let response: ChampionResponse = self.fetch_with_cache(ALL_TIME_CHAMPION_PATH).await?;
        Ok(response.champion)
    }

    pub async fn all_time_subreddit_totals(&self) -> Result<Vec<AllTimeSubredditTotal>, ApiError> {
        let response: TotalsResponse<AllTimeSubredditTotal> =
            self.fetch_with_cache(ALL_TIME_TOTALS_PATH).await?;
        Ok(response.totals)
    }

    pub async fn subreddit_totals(&self) -> Result<Vec<SubredditTotal>, ApiError> {
        let response: TotalsResponse<SubredditTotal> =
            self.fetch_with_cache(SUBREDDIT_TOTALS_PATH).await?;
        Ok(response.totals)
    }

    pub async fn comments_batch(&self) -> Result<Vec<(String, Comment)>, ApiError> {
        let response: BatchCommentsResponse = self.fetch_with_cache(COMMENTS_BATCH_PATH).await?;
        Ok(response.comments)
    }

    async fn fetch_with_cache<T: DeserializeOwned>(
        &self,
        endpoint: &'static str,
    ) -> Result<T, ApiError> {
        let result = self.request(endpoint).await;
        if let Err(err) = &result {
            error!("error fetching {endpoint}: {}", err.reason);
        }
        result
    }

    async fn request<T: DeserializeOwned>(&self, endpoint: &'static str) -> Result<T, ApiError> {
        let url = format!("{}{}", self.base_url, endpoint);
        let response = self
            .http
            .get(&url)
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::CACHE_CONTROL, CACHE_CONTROL)
            .header(header::PRAGMA, "cache")
            .send()
            .await
            .map_err(|err| ApiError::new(endpoint, err))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::new(endpoint, format!("HTTP error! status: {status}")));
        }

        let cache_status = response
            .headers()
            .get(header::CACHE_CONTROL)
            .and_then(|value| value.to_str().ok())
            .unwrap_or("none");
        debug!("cache status for {endpoint}: {cache_status}");

        response
            .json::<T>()
            .await
            .map_err(|err| ApiError::new(endpoint, err))
    }
}
