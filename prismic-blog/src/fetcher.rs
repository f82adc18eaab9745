use crate::record::RawRecord;
use crate::traits::ContentFetcher;
use crate::types::{BlogError, DocumentFilter, FetchConfig, Page, QueryOptions, Result};
use async_trait::async_trait;
use backoff::{backoff::Backoff, ExponentialBackoff};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, error, info, warn};
use url::Url;

#[derive(Debug, Deserialize)]
struct ApiRoot {
    #[serde(default)]
    refs: Vec<ApiRef>,
}

#[derive(Debug, Deserialize)]
struct ApiRef {
    #[serde(rename = "ref")]
    reference: String,
    #[serde(default, rename = "isMasterRef")]
    is_master_ref: bool,
}

/// `ContentFetcher` backed by the Prismic REST API.
pub struct PrismicFetcher {
    client: Client,
    config: FetchConfig,
    endpoint: Url,
    access_token: Option<String>,
    master_ref: RwLock<Option<String>>,
}

impl PrismicFetcher {
    pub fn new(endpoint: &str, access_token: Option<String>, config: FetchConfig) -> Result<Self> {
        let mut endpoint = Url::parse(endpoint)?;
        if !endpoint.path().ends_with('/') {
            let path = format!("{}/", endpoint.path());
            endpoint.set_path(&path);
        }

        let client = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.timeout_seconds))
            .gzip(true)
            .deflate(true)
            .brotli(true)
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .build()?;

        Ok(Self {
            client,
            config,
            endpoint,
            access_token: access_token.filter(|t| !t.is_empty()),
            master_ref: RwLock::new(None),
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Master ref of the repository, fetched once and then cached.
    pub async fn master_ref(&self) -> Result<String> {
        if let Some(reference) = self.master_ref.read().await.as_ref() {
            return Ok(reference.clone());
        }

        let url = self.with_token(self.endpoint.clone());
        let root: ApiRoot = self.get_json(url).await?;
        let reference = root
            .refs
            .into_iter()
            .find(|r| r.is_master_ref)
            .map(|r| r.reference)
            .ok_or_else(|| BlogError::Config(format!("{} exposes no master ref", self.endpoint)))?;

        info!("Resolved master ref for {}", self.endpoint);
        *self.master_ref.write().await = Some(reference.clone());
        Ok(reference)
    }

    async fn search(
        &self,
        predicates: &[String],
        options: &QueryOptions,
    ) -> Result<Page<RawRecord>> {
        let reference = match options.reference.clone() {
            Some(reference) => reference,
            None => self.master_ref().await?,
        };

        let mut url = self.endpoint.join("documents/search")?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("ref", &reference);
            query.append_pair("q", &format!("[{}]", predicates.concat()));
            if let Some(page_size) = options.page_size {
                query.append_pair("pageSize", &page_size.to_string());
            }
            if !options.orderings.is_empty() {
                let orderings: Vec<String> =
                    options.orderings.iter().map(|o| o.as_query_fragment()).collect();
                query.append_pair("orderings", &format!("[{}]", orderings.join(",")));
            }
            if let Some(after) = &options.after {
                query.append_pair("after", after);
            }
            if !options.fetch.is_empty() {
                query.append_pair("fetch", &options.fetch.join(","));
            }
        }

        self.get_json(self.with_token(url)).await
    }

    fn with_token(&self, mut url: Url) -> Url {
        if let Some(token) = &self.access_token {
            if !url.query_pairs().any(|(key, _)| key == "access_token") {
                url.query_pairs_mut().append_pair("access_token", token);
            }
        }
        url
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        let delay = Duration::from_millis(self.config.retry_delay_ms);
        let mut backoff = ExponentialBackoff {
            current_interval: delay,
            initial_interval: delay,
            max_interval: delay * 32,
            multiplier: 2.0,
            max_elapsed_time: None,
            ..Default::default()
        };

        let mut last_error = None;

        for attempt in 0..=self.config.max_retries {
            debug!("GET {} (attempt {})", redact(&url), attempt + 1);

            let error = match self.client.get(url.clone()).send().await {
                Ok(response) if response.status().is_success() => {
                    let body = response.text().await.map_err(strip_url)?;
                    return Ok(serde_json::from_str(&body)?);
                }
                Ok(response) => {
                    let status = response.status();
                    let error = BlogError::Api {
                        status: status.as_u16(),
                        url: redact(&url),
                    };
                    if !is_retryable(status) {
                        return Err(error);
                    }
                    error
                }
                Err(e) => strip_url(e),
            };

            if attempt < self.config.max_retries {
                if let Some(wait) = backoff.next_backoff() {
                    warn!(
                        "Attempt {} failed for {}: {}, retrying in {:?}",
                        attempt + 1,
                        redact(&url),
                        error,
                        wait
                    );
                    last_error = Some(error);
                    tokio::time::sleep(wait).await;
                    continue;
                }
            }
            last_error = Some(error);
            break;
        }

        error!("Giving up on {} after {} attempts", redact(&url), self.config.max_retries + 1);
        Err(last_error.unwrap_or_else(|| BlogError::Api {
            status: 0,
            url: redact(&url),
        }))
    }
}

#[async_trait]
impl ContentFetcher for PrismicFetcher {
    async fn query(
        &self,
        filter: &DocumentFilter,
        options: &QueryOptions,
    ) -> Result<Page<RawRecord>> {
        let predicates = [at_predicate("document.type", &filter.document_type)];
        self.search(&predicates, options).await
    }

    async fn fetch_page(&self, cursor: &str) -> Result<Page<RawRecord>> {
        let url = self.with_token(Url::parse(cursor)?);
        self.get_json(url).await
    }

    async fn get_by_uid(
        &self,
        document_type: &str,
        uid: &str,
        reference: Option<&str>,
    ) -> Result<RawRecord> {
        let predicates = [at_predicate(&format!("my.{document_type}.uid"), uid)];
        let options = QueryOptions::new()
            .page_size(1)
            .with_reference(reference.map(str::to_string));

        let page = self.search(&predicates, &options).await?;
        page.results.into_iter().next().ok_or_else(|| BlogError::NotFound {
            document_type: document_type.to_string(),
            uid: uid.to_string(),
        })
    }
}

fn at_predicate(path: &str, value: &str) -> String {
    format!("[at({path},\"{}\")]", value.replace('"', "\\\""))
}

/// Transport errors print their request URL, which can carry the access token.
fn strip_url(error: reqwest::Error) -> BlogError {
    BlogError::Http(error.without_url())
}

fn is_retryable(status: StatusCode) -> bool {
    status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS
}

/// URL with the access token masked, for logs and error messages.
fn redact(url: &Url) -> String {
    if !url.query_pairs().any(|(key, _)| key == "access_token") {
        return url.to_string();
    }

    let mut masked = url.clone();
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(key, value)| {
            let value = if key == "access_token" { "***".to_string() } else { value.into_owned() };
            (key.into_owned(), value)
        })
        .collect();
    masked.query_pairs_mut().clear().extend_pairs(pairs);
    masked.to_string()
}
