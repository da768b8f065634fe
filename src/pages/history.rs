//! History page: document list and the selected document.

use crate::components::document;
use crate::net::types::Article;
use crate::state::history::{HistoryState, display_title, format_date};
use crate::util::export::extract_tags;

#[must_use]
pub fn render(history: &HistoryState) -> String {
    let mut out = String::from("History\n");
    if history.loading {
        out.push_str("Loading...\n");
        return out;
    }
    if let Some(error) = &history.error {
        out.push_str(&format!("! {error}\n"));
    }
    if history.articles.is_empty() {
        out.push_str("No documents yet.\n");
        return out;
    }

    out.push_str(&render_list(history));
    if let Some(article) = history.selected() {
        out.push('\n');
        out.push_str(&render_detail(article));
    }
    out
}

/// One numbered line per document; the selection is marked with `>`.
#[must_use]
pub fn render_list(history: &HistoryState) -> String {
    let selected = history.selected_index();
    history
        .articles
        .iter()
        .enumerate()
        .map(|(i, article)| {
            let marker = if selected == Some(i) { '>' } else { ' ' };
            format!("{marker} {:>2}. {}  ({})\n", i + 1, display_title(article), format_date(&article.created_date))
        })
        .collect()
}

#[must_use]
pub fn render_detail(article: &Article) -> String {
    let mut out = format!("{}\n", display_title(article));
    out.push_str(&format!("  date:     {}\n", format_date(&article.created_date)));
    let optional = [
        ("model", article.model.as_deref()),
        ("intent", article.article_intent.as_deref()),
        ("audience", article.target_audience.as_deref()),
    ];
    for (name, value) in optional {
        if let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) {
            out.push_str(&format!("  {:<9} {value}\n", format!("{name}:")));
        }
    }
    let tags = extract_tags(&article.content);
    if !tags.is_empty() {
        let tags: Vec<String> = tags.iter().map(|t| format!("#{t}")).collect();
        out.push_str(&format!("  tags:     {}\n", tags.join(" ")));
    }
    out.push('\n');
    out.push_str(&document::render(&article.content));
    out.push('\n');
    out
}

#[cfg(test)]
#[path = "history_test.rs"]
mod tests;
