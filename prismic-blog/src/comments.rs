use crate::traits::CommentWidget;
use tracing::warn;

pub const UTTERANCES_SCRIPT: &str = "https://utteranc.es/client.js";
pub const COMMENTS_ANCHOR_ID: &str = "inject-comments-for-uterances";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UtterancesConfig {
    /// GitHub repository holding the comment issues, as `owner/name`.
    pub repo: String,
    pub issue_term: String,
    pub label: String,
    pub theme: String,
}

impl Default for UtterancesConfig {
    fn default() -> Self {
        Self {
            repo: String::new(),
            issue_term: "pathname".to_string(),
            label: "Comment".to_string(),
            theme: "photon-dark".to_string(),
        }
    }
}

/// utterances comments, embedded as an async script under a fixed anchor.
pub struct UtterancesWidget {
    config: UtterancesConfig,
}

impl UtterancesWidget {
    pub fn new(config: UtterancesConfig) -> Self {
        Self { config }
    }
}

impl CommentWidget for UtterancesWidget {
    fn widget_name(&self) -> &str {
        "utterances"
    }

    fn mount(&self, page_path: &str) -> Option<String> {
        let repo = self.config.repo.trim();
        if repo.split('/').filter(|part| !part.is_empty()).count() != 2 {
            warn!("Skipping comments on {}: repo {:?} is not owner/name", page_path, repo);
            return None;
        }

        Some(format!(
            concat!(
                "<div id=\"{anchor}\">",
                "<script src=\"{src}\" crossorigin=\"anonymous\" async ",
                "repo=\"{repo}\" issue-term=\"{term}\" label=\"{label}\" theme=\"{theme}\">",
                "</script></div>"
            ),
            anchor = COMMENTS_ANCHOR_ID,
            src = UTTERANCES_SCRIPT,
            repo = escape_attr(repo),
            term = escape_attr(&self.config.issue_term),
            label = escape_attr(&self.config.label),
            theme = escape_attr(&self.config.theme),
        ))
    }
}

fn escape_attr(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
