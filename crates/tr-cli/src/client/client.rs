use crate::client::page::Page;

use tr_concurrency::RateLimiter;
use tr_config::ApiConfig;
use tr_core::{
    AddCaseRequest, AddSectionRequest, AddSharedStepRequest, AddSuiteRequest, Case, ClientError,
    ClientResult, Section, SharedStep, Suite, TestManagementClient,
};

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::RETRY_AFTER;
use reqwest::{Client as ReqwestClient, Method, RequestBuilder, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

const API_PREFIX: &str = "index.php?";
const API_VERSION_PATH: &str = "/api/v2/";

/// HTTP client for the TestRail API v2.
pub struct HttpClient {
    pub base_url: String,
    pub user: String,
    api_key: String,
    limiter: Arc<RateLimiter>,
    client: ReqwestClient,
}

impl HttpClient {
    /// Create a new client
    ///
    /// # Arguments
    /// * `base_url` - Instance URL (e.g., "https://example.testrail.io")
    /// * `user` - Account e-mail used for basic auth
    /// * `api_key` - API key used as the basic auth password
    /// * `timeout` - Per-request timeout
    pub fn new(base_url: &str, user: &str, api_key: &str, timeout: Duration) -> ClientResult<Self> {
        let client = ReqwestClient::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ClientError::http(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            user: user.to_string(),
            api_key: api_key.to_string(),
            limiter: Arc::new(RateLimiter::unlimited()),
            client,
        })
    }

    pub fn from_config(config: &ApiConfig) -> ClientResult<Self> {
        Self::new(
            &config.base_url,
            &config.user,
            &config.api_key,
            Duration::from_secs(config.timeout_secs),
        )
    }

    /// Every request, reads included, waits on `limiter` first.
    pub fn with_rate_limiter(mut self, limiter: Arc<RateLimiter>) -> Self {
        self.limiter = limiter;
        self
    }

    /// `endpoint` is `<verb>/<id>` plus any `&key=value` filters.
    pub(crate) fn url(&self, endpoint: &str) -> String {
        format!("{}/{API_PREFIX}{API_VERSION_PATH}{endpoint}", self.base_url)
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        self.client
            .request(method, url)
            .basic_auth(&self.user, Some(&self.api_key))
    }

    /// Execute request and map transport and status failures.
    async fn execute(&self, req: RequestBuilder) -> ClientResult<Value> {
        self.limiter.wait().await;

        let response = req.send().await.map_err(|e| {
            if e.is_connect() || e.is_timeout() {
                ClientError::unavailable(e.to_string())
            } else {
                ClientError::http(e.to_string())
            }
        })?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get(RETRY_AFTER)
                .and_then(|value| value.to_str().ok())
                .and_then(|value| value.trim().parse::<u64>().ok());
            return Err(ClientError::rate_limited(retry_after));
        }

        let body = response
            .text()
            .await
            .map_err(|e| ClientError::http(e.to_string()))?;

        if status == StatusCode::SERVICE_UNAVAILABLE {
            return Err(ClientError::unavailable(format!("{status}: {body}")));
        }

        if !status.is_success() {
            let message = serde_json::from_str::<Value>(&body)
                .ok()
                .and_then(|value| value.get("error").and_then(Value::as_str).map(String::from))
                .unwrap_or_else(|| body.trim().to_string());
            return Err(ClientError::api(status.as_u16(), message));
        }

        if body.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&body)?)
    }

    /// GET a list endpoint, following `_links.next` until exhausted.
    async fn get_list<T: DeserializeOwned>(&self, endpoint: &str, key: &str) -> ClientResult<Vec<T>> {
        let mut items = Vec::new();
        let mut url = self.url(endpoint);

        loop {
            let body = self.execute(self.request(Method::GET, &url)).await?;
            let page = Page::<T>::parse(body, key)?;
            items.extend(page.items);

            match page.next {
                Some(next) if next.starts_with('/') => {
                    url = format!("{}/{API_PREFIX}{next}", self.base_url);
                }
                Some(next) => {
                    url = format!("{}/{API_PREFIX}/{next}", self.base_url);
                }
                None => break,
            }
        }

        log::debug!("GET {endpoint}: {} {key}", items.len());
        Ok(items)
    }

    async fn post<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> ClientResult<T> {
        let req = self.request(Method::POST, &self.url(endpoint)).json(body);
        let value = self.execute(req).await?;
        Ok(serde_json::from_value(value)?)
    }
}

fn with_filter(endpoint: String, key: &str, value: Option<i64>) -> String {
    match value {
        Some(value) => format!("{endpoint}&{key}={value}"),
        None => endpoint,
    }
}

#[async_trait]
impl TestManagementClient for HttpClient {
    async fn get_shared_steps(&self, project_id: i64) -> ClientResult<Vec<SharedStep>> {
        self.get_list(&format!("get_shared_steps/{project_id}"), "shared_steps")
            .await
    }

    async fn get_suites(&self, project_id: i64) -> ClientResult<Vec<Suite>> {
        self.get_list(&format!("get_suites/{project_id}"), "suites")
            .await
    }

    async fn get_sections(
        &self,
        project_id: i64,
        suite_id: Option<i64>,
    ) -> ClientResult<Vec<Section>> {
        let endpoint = with_filter(format!("get_sections/{project_id}"), "suite_id", suite_id);
        self.get_list(&endpoint, "sections").await
    }

    async fn get_cases(
        &self,
        project_id: i64,
        suite_id: Option<i64>,
        section_id: Option<i64>,
    ) -> ClientResult<Vec<Case>> {
        let endpoint = with_filter(format!("get_cases/{project_id}"), "suite_id", suite_id);
        let endpoint = with_filter(endpoint, "section_id", section_id);
        self.get_list(&endpoint, "cases").await
    }

    async fn add_shared_step(
        &self,
        project_id: i64,
        request: &AddSharedStepRequest,
    ) -> ClientResult<SharedStep> {
        self.post(&format!("add_shared_step/{project_id}"), request)
            .await
    }

    async fn add_suite(&self, project_id: i64, request: &AddSuiteRequest) -> ClientResult<Suite> {
        self.post(&format!("add_suite/{project_id}"), request).await
    }

    async fn add_section(
        &self,
        project_id: i64,
        request: &AddSectionRequest,
    ) -> ClientResult<Section> {
        self.post(&format!("add_section/{project_id}"), request)
            .await
    }

    async fn add_case(&self, section_id: i64, request: &AddCaseRequest) -> ClientResult<Case> {
        self.post(&format!("add_case/{section_id}"), request).await
    }
}
