use crate::types::{BlogError, Post, Result};
use chrono::{DateTime, FixedOffset, Locale, Offset, Utc};

/// Content API timestamps use a colon-less offset, e.g. `2021-03-25T19:25:28+0000`.
const API_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%z";

/// Fixed-locale date rendering shared by the listing and post pages.
#[derive(Debug, Clone)]
pub struct DateDisplay {
    locale: Locale,
    offset: FixedOffset,
    date_pattern: String,
    edit_pattern: String,
}

impl Default for DateDisplay {
    fn default() -> Self {
        Self {
            locale: Locale::pt_BR,
            offset: Utc.fix(),
            date_pattern: "%d %b %Y".to_string(),
            edit_pattern: "* editado em %d %b %Y, às %H:%M".to_string(),
        }
    }
}

impl DateDisplay {
    pub fn new(locale: &str, utc_offset_minutes: i32) -> Result<Self> {
        let locale = Locale::try_from(locale)
            .map_err(|_| BlogError::Config(format!("unknown display locale {locale:?}")))?;
        let offset = FixedOffset::east_opt(utc_offset_minutes * 60).ok_or_else(|| {
            BlogError::Config(format!("UTC offset out of range: {utc_offset_minutes} minutes"))
        })?;

        Ok(Self {
            locale,
            offset,
            ..Self::default()
        })
    }

    pub fn with_patterns(mut self, date_pattern: &str, edit_pattern: &str) -> Self {
        self.date_pattern = date_pattern.to_string();
        self.edit_pattern = edit_pattern.to_string();
        self
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    /// `dd MMM yyyy` label for a publication timestamp. Absent dates have no label.
    pub fn publication_label(&self, published_at: Option<&str>) -> Result<Option<String>> {
        published_at
            .map(|value| self.render(value, &self.date_pattern))
            .transpose()
    }

    /// Label shown when a post was edited after its first publication.
    ///
    /// Returns `None` when both timestamps are equal, including both absent,
    /// and when there is no edit timestamp to render.
    pub fn edit_label(
        &self,
        published_at: Option<&str>,
        last_edited_at: Option<&str>,
    ) -> Result<Option<String>> {
        if published_at == last_edited_at {
            return Ok(None);
        }

        last_edited_at
            .map(|value| self.render(value, &self.edit_pattern))
            .transpose()
    }

    pub fn post_edit_label(&self, post: &Post) -> Result<Option<String>> {
        self.edit_label(post.published_at.as_deref(), post.last_edited_at.as_deref())
    }

    fn render(&self, value: &str, pattern: &str) -> Result<String> {
        let timestamp = parse_timestamp(value)?.with_timezone(&self.offset);
        Ok(timestamp.format_localized(pattern, self.locale).to_string())
    }
}

/// Accepts RFC 3339 as well as the content API's `+hhmm` offsets.
pub fn parse_timestamp(value: &str) -> Result<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(value)
        .or_else(|_| DateTime::parse_from_str(value, API_TIMESTAMP_FORMAT))
        .map_err(|source| BlogError::InvalidTimestamp {
            value: value.to_string(),
            source,
        })
}
