use crate::types::{ContentBlock, Post};

pub const WORDS_PER_MINUTE: usize = 200;

/// Whitespace-delimited words across every heading and body span.
pub fn count_words(content: &[ContentBlock]) -> usize {
    content
        .iter()
        .map(|block| {
            let body_words: usize = block
                .body
                .iter()
                .map(|span| span.text.split_whitespace().count())
                .sum();
            block.heading.split_whitespace().count() + body_words
        })
        .sum()
}

/// Minutes needed to read `content`, rounded up. Empty content reads in 0.
pub fn estimate_minutes(content: &[ContentBlock]) -> u32 {
    let words = count_words(content);
    u32::try_from(words.div_ceil(WORDS_PER_MINUTE)).unwrap_or(u32::MAX)
}

impl Post {
    pub fn reading_time_minutes(&self) -> u32 {
        estimate_minutes(&self.content)
    }
}
