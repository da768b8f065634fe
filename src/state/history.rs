//! History of previously generated documents (read-only).

use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use tracing::{info, warn};

use crate::net::Backend;
use crate::net::types::{ApiError, Article};

#[derive(Clone, Debug, Default)]
pub struct HistoryState {
    pub articles: Vec<Article>,
    selected: Option<usize>,
    pub loading: bool,
    pub error: Option<String>,
}

impl HistoryState {
    /// A loaded list with the first document selected.
    #[must_use]
    pub fn with_articles(articles: Vec<Article>) -> Self {
        let selected = if articles.is_empty() { None } else { Some(0) };
        Self { articles, selected, ..Self::default() }
    }

    /// Reload the list and select the first document.
    ///
    /// # Errors
    ///
    /// Returns the backend error; the previous list stays.
    pub async fn refresh(&mut self, backend: &dyn Backend) -> Result<usize, ApiError> {
        self.loading = true;
        let outcome = backend.list_articles().await;
        self.loading = false;
        match outcome {
            Ok(articles) => {
                info!(count = articles.len(), "history loaded");
                self.selected = if articles.is_empty() { None } else { Some(0) };
                self.articles = articles;
                self.error = None;
                Ok(self.articles.len())
            }
            Err(e) => {
                warn!(error = %e, "loading history failed");
                self.error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Select by position; out-of-range indices are ignored.
    pub fn select(&mut self, index: usize) -> bool {
        if index < self.articles.len() {
            self.selected = Some(index);
            true
        } else {
            false
        }
    }

    #[must_use]
    pub fn selected_index(&self) -> Option<usize> {
        self.selected
    }

    #[must_use]
    pub fn selected(&self) -> Option<&Article> {
        self.selected.and_then(|i| self.articles.get(i))
    }
}

/// `YYYY-MM-DD HH:MM:SS` for RFC 3339 input, the raw text otherwise.
#[must_use]
pub fn format_date(raw: &str) -> String {
    let raw = raw.trim();
    if raw.is_empty() {
        return "no date".to_owned();
    }
    let layout = format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");
    OffsetDateTime::parse(raw, &Rfc3339)
        .ok()
        .and_then(|dt| dt.format(&layout).ok())
        .unwrap_or_else(|| raw.to_owned())
}

/// Display title: the article title, else its topic, else `"Untitled"`.
#[must_use]
pub fn display_title(article: &Article) -> &str {
    [Some(article.title.as_str()), article.topic.as_deref()]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|t| !t.is_empty())
        .unwrap_or("Untitled")
}

#[cfg(test)]
#[path = "history_test.rs"]
mod tests;
