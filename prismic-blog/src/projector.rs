use crate::record::{RawContentBlock, RawImage, RawRecord, TextField};
use crate::types::{BlogError, BodySpan, ContentBlock, Page, Post, PostRef, Result};
use tracing::debug;

/// Maps one raw document into a `Post`.
///
/// Only the document id is mandatory. Every other field degrades to an empty
/// value, and content blocks keep the order they arrived in.
pub fn project(record: &RawRecord) -> Result<Post> {
    let id = record_id(record)?;
    let slug = record_slug(record, &id);
    let data = record.data.clone().unwrap_or_default();

    let content = data
        .content
        .unwrap_or_default()
        .into_iter()
        .map(project_block)
        .collect();

    Ok(Post {
        id,
        slug,
        published_at: record.first_publication_date.clone(),
        last_edited_at: record.last_publication_date.clone(),
        title: text_or_empty(data.title.as_ref()),
        subtitle: text_or_empty(data.subtitle.as_ref()),
        author: text_or_empty(data.author.as_ref()),
        banner_url: image_url(data.banner.as_ref()),
        image_url: image_url(data.image.as_ref()),
        content,
    })
}

/// Projects every record of a page, failing on the first malformed one.
pub fn project_page(page: &Page<RawRecord>) -> Result<Page<Post>> {
    let posts = page
        .results
        .iter()
        .map(project)
        .collect::<Result<Vec<_>>>()?;

    debug!("Projected {} records", posts.len());
    Ok(Page::new(posts, page.next_page.clone()))
}

pub fn project_ref(record: &RawRecord) -> Result<PostRef> {
    let id = record_id(record)?;
    let slug = record_slug(record, &id);
    let title = record
        .data
        .as_ref()
        .and_then(|data| data.title.as_ref())
        .map(TextField::to_plain)
        .unwrap_or_default();

    Ok(PostRef { id, slug, title })
}

fn record_id(record: &RawRecord) -> Result<String> {
    match record.id.as_deref() {
        Some(id) if !id.is_empty() => Ok(id.to_string()),
        _ => Err(BlogError::MalformedRecord {
            reason: format!(
                "document {} has no id",
                record.uid.as_deref().unwrap_or("<unknown>")
            ),
        }),
    }
}

fn record_slug(record: &RawRecord, id: &str) -> String {
    record
        .uid
        .as_deref()
        .filter(|uid| !uid.is_empty())
        .unwrap_or(id)
        .to_string()
}

fn project_block(block: RawContentBlock) -> ContentBlock {
    ContentBlock {
        heading: text_or_empty(block.heading.as_ref()),
        body: block
            .body
            .unwrap_or_default()
            .into_iter()
            .map(|span| BodySpan {
                text: span.text.unwrap_or_default(),
            })
            .collect(),
    }
}

fn text_or_empty(field: Option<&TextField>) -> String {
    field.map(TextField::to_plain).unwrap_or_default()
}

fn image_url(image: Option<&RawImage>) -> String {
    image.and_then(|i| i.url.clone()).unwrap_or_default()
}
