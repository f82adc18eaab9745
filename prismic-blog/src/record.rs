//! Wire shape of a content API document.
//!
//! Every field is optional here; the projector decides what is mandatory.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub uid: Option<String>,
    #[serde(default, rename = "type")]
    pub document_type: Option<String>,
    #[serde(default)]
    pub first_publication_date: Option<String>,
    #[serde(default)]
    pub last_publication_date: Option<String>,
    #[serde(default)]
    pub data: Option<RawPostData>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawPostData {
    #[serde(default)]
    pub title: Option<TextField>,
    #[serde(default)]
    pub subtitle: Option<TextField>,
    #[serde(default)]
    pub author: Option<TextField>,
    #[serde(default)]
    pub banner: Option<RawImage>,
    #[serde(default)]
    pub image: Option<RawImage>,
    #[serde(default)]
    pub content: Option<Vec<RawContentBlock>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawImage {
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawContentBlock {
    #[serde(default)]
    pub heading: Option<TextField>,
    #[serde(default)]
    pub body: Option<Vec<RawSpan>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawSpan {
    #[serde(default, rename = "type")]
    pub span_type: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
}

/// A text field that may arrive as key text or as a rich-text span list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TextField {
    Plain(String),
    Rich(Vec<RawSpan>),
    Other(serde_json::Value),
}

impl TextField {
    pub fn to_plain(&self) -> String {
        match self {
            TextField::Plain(text) => text.clone(),
            TextField::Rich(spans) => spans
                .iter()
                .filter_map(|span| span.text.as_deref())
                .collect::<Vec<_>>()
                .join(" "),
            TextField::Other(_) => String::new(),
        }
    }
}

impl From<&str> for TextField {
    fn from(text: &str) -> Self {
        TextField::Plain(text.to_string())
    }
}
