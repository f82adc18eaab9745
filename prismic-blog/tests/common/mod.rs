#![allow(dead_code)]

use async_trait::async_trait;
use prismic_blog::record::{RawContentBlock, RawPostData, RawSpan, TextField};
use prismic_blog::{
    BlogError, ContentFetcher, DocumentFilter, Page, QueryOptions, RawRecord, Result, SortDirection,
};
use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, Once};

static INIT: Once = Once::new();

pub fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_test_writer()
            .try_init()
            .ok();
    });
}

pub fn record(id: &str, uid: &str, published_at: &str, title: &str) -> RawRecord {
    RawRecord {
        id: Some(id.to_string()),
        uid: Some(uid.to_string()),
        document_type: Some("posts".to_string()),
        first_publication_date: Some(published_at.to_string()),
        last_publication_date: Some(published_at.to_string()),
        data: Some(RawPostData {
            title: Some(TextField::from(title)),
            subtitle: Some(TextField::from("subtitle")),
            author: Some(TextField::from("Ada")),
            ..Default::default()
        }),
    }
}

pub fn with_content(mut record: RawRecord, blocks: &[(&str, &[&str])]) -> RawRecord {
    let content = blocks
        .iter()
        .map(|(heading, body)| RawContentBlock {
            heading: Some(TextField::from(*heading)),
            body: Some(
                body.iter()
                    .map(|text| RawSpan {
                        span_type: Some("paragraph".to_string()),
                        text: Some(text.to_string()),
                    })
                    .collect(),
            ),
        })
        .collect();
    record.data.get_or_insert_with(Default::default).content = Some(content);
    record
}

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Query(QueryOptions),
    FetchPage(String),
    GetByUid { uid: String, reference: Option<String> },
}

/// In-memory content source.
///
/// Queries are served from `corpus` (kept in source order), cursors from
/// scripted pages, and every call is recorded.
///
/// By default descending order is the reverse of ascending order, so tied
/// documents swap places between directions. `with_stable_ties` keeps them
/// in source order for both directions instead.
#[derive(Default)]
pub struct FakeFetcher {
    corpus: Vec<RawRecord>,
    stable_ties: bool,
    pages: HashMap<String, Page<RawRecord>>,
    failing: HashSet<String>,
    calls: Mutex<Vec<Call>>,
}

impl FakeFetcher {
    pub fn new(corpus: Vec<RawRecord>) -> Self {
        Self {
            corpus,
            ..Default::default()
        }
    }

    pub fn with_page(mut self, cursor: &str, page: Page<RawRecord>) -> Self {
        self.pages.insert(cursor.to_string(), page);
        self
    }

    pub fn with_stable_ties(mut self) -> Self {
        self.stable_ties = true;
        self
    }

    pub fn failing_on(mut self, cursor: &str) -> Self {
        self.failing.insert(cursor.to_string());
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn fetch_page_calls(&self) -> usize {
        self.calls()
            .iter()
            .filter(|call| matches!(call, Call::FetchPage(_)))
            .count()
    }

    fn record_call(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn ordered(&self, options: &QueryOptions) -> Vec<RawRecord> {
        let mut records = self.corpus.clone();
        if let Some(ordering) = options.orderings.first() {
            let key = |r: &RawRecord| match ordering.field.as_str() {
                prismic_blog::Ordering::LAST_PUBLICATION => r.last_publication_date.clone(),
                _ => r.first_publication_date.clone(),
            };
            match ordering.direction {
                SortDirection::Asc => records.sort_by_key(key),
                SortDirection::Desc if self.stable_ties => {
                    records.sort_by(|a, b| key(b).cmp(&key(a)))
                }
                SortDirection::Desc => {
                    records.sort_by_key(key);
                    records.reverse();
                }
            }
        }
        records
    }
}

#[async_trait]
impl ContentFetcher for FakeFetcher {
    async fn query(
        &self,
        filter: &DocumentFilter,
        options: &QueryOptions,
    ) -> Result<Page<RawRecord>> {
        self.record_call(Call::Query(options.clone()));

        let records: Vec<RawRecord> = self
            .ordered(options)
            .into_iter()
            .filter(|r| r.document_type.as_deref() == Some(filter.document_type.as_str()))
            .collect();

        let start = match &options.after {
            Some(after) => records
                .iter()
                .position(|r| r.id.as_deref() == Some(after.as_str()))
                .map(|i| i + 1)
                .unwrap_or(records.len()),
            None => 0,
        };
        let size = options.page_size.unwrap_or(20) as usize;
        let results: Vec<RawRecord> = records.iter().skip(start).take(size).cloned().collect();
        let next_page =
            (start + size < records.len()).then(|| format!("fake://page/{}", start + size));

        Ok(Page::new(results, next_page))
    }

    async fn fetch_page(&self, cursor: &str) -> Result<Page<RawRecord>> {
        self.record_call(Call::FetchPage(cursor.to_string()));

        if self.failing.contains(cursor) {
            return Err(BlogError::Api {
                status: 503,
                url: cursor.to_string(),
            });
        }
        if let Some(page) = self.pages.get(cursor) {
            return Ok(page.clone());
        }
        if let Some(offset) = cursor.strip_prefix("fake://page/") {
            let offset: usize = offset.parse().unwrap();
            let size = 20;
            let results: Vec<RawRecord> =
                self.corpus.iter().skip(offset).take(size).cloned().collect();
            let next_page = (offset + size < self.corpus.len())
                .then(|| format!("fake://page/{}", offset + size));
            return Ok(Page::new(results, next_page));
        }
        Err(BlogError::Api {
            status: 404,
            url: cursor.to_string(),
        })
    }

    async fn get_by_uid(
        &self,
        document_type: &str,
        uid: &str,
        reference: Option<&str>,
    ) -> Result<RawRecord> {
        self.record_call(Call::GetByUid {
            uid: uid.to_string(),
            reference: reference.map(str::to_string),
        });

        self.corpus
            .iter()
            .find(|r| r.uid.as_deref() == Some(uid))
            .cloned()
            .ok_or_else(|| BlogError::NotFound {
                document_type: document_type.to_string(),
                uid: uid.to_string(),
            })
    }
}
