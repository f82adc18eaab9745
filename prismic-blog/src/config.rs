use crate::comments::UtterancesConfig;
use crate::dates::DateDisplay;
use crate::types::{BlogError, FetchConfig, Result};
use std::env;
use url::Url;

pub const DEFAULT_DOCUMENT_TYPE: &str = "posts";
pub const DEFAULT_PAGE_SIZE: u32 = 20;
pub const DEFAULT_LOCALE: &str = "pt_BR";

#[derive(Debug, Clone)]
pub struct BlogConfig {
    pub api_endpoint: String,
    pub access_token: Option<String>,
    pub document_type: String,
    pub page_size: u32,
    pub locale: String,
    pub utc_offset_minutes: i32,
    pub comments: UtterancesConfig,
    pub fetch: FetchConfig,
}

impl BlogConfig {
    pub fn new(api_endpoint: impl Into<String>) -> Self {
        Self {
            api_endpoint: api_endpoint.into(),
            access_token: None,
            document_type: DEFAULT_DOCUMENT_TYPE.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            locale: DEFAULT_LOCALE.to_string(),
            utc_offset_minutes: 0,
            comments: UtterancesConfig::default(),
            fetch: FetchConfig::default(),
        }
    }

    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from any key/value source.
    ///
    /// `PRISMIC_API_ENDPOINT` is required; everything else has a default.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_endpoint = lookup("PRISMIC_API_ENDPOINT")
            .filter(|v| !v.is_empty())
            .ok_or_else(|| BlogError::Config("PRISMIC_API_ENDPOINT is not set".to_string()))?;

        let mut config = Self::new(api_endpoint);
        config.access_token = lookup("PRISMIC_ACCESS_TOKEN").filter(|v| !v.is_empty());

        if let Some(document_type) = lookup("BLOG_DOCUMENT_TYPE") {
            config.document_type = document_type;
        }
        if let Some(page_size) = lookup("BLOG_PAGE_SIZE") {
            config.page_size = parse_number("BLOG_PAGE_SIZE", &page_size)?;
        }
        if let Some(locale) = lookup("BLOG_LOCALE") {
            config.locale = locale;
        }
        if let Some(offset) = lookup("BLOG_UTC_OFFSET_MINUTES") {
            config.utc_offset_minutes = parse_number("BLOG_UTC_OFFSET_MINUTES", &offset)?;
        }

        if let Some(repo) = lookup("UTTERANCES_REPO") {
            config.comments.repo = repo;
        }
        if let Some(theme) = lookup("UTTERANCES_THEME") {
            config.comments.theme = theme;
        }

        if let Some(timeout) = lookup("PRISMIC_TIMEOUT_SECONDS") {
            config.fetch.timeout_seconds = parse_number("PRISMIC_TIMEOUT_SECONDS", &timeout)?;
        }
        if let Some(retries) = lookup("PRISMIC_MAX_RETRIES") {
            config.fetch.max_retries = parse_number("PRISMIC_MAX_RETRIES", &retries)?;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let endpoint = Url::parse(&self.api_endpoint)?;
        if endpoint.scheme() != "http" && endpoint.scheme() != "https" {
            return Err(BlogError::Config(format!(
                "unsupported endpoint scheme {:?}",
                endpoint.scheme()
            )));
        }
        if self.page_size == 0 {
            return Err(BlogError::Config("page size must be positive".to_string()));
        }
        if self.document_type.is_empty() {
            return Err(BlogError::Config("document type must not be empty".to_string()));
        }
        self.date_display().map(|_| ())
    }

    pub fn date_display(&self) -> Result<DateDisplay> {
        DateDisplay::new(&self.locale, self.utc_offset_minutes)
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| BlogError::Config(format!("{key} must be a number, got {value:?}")))
}
