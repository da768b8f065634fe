//! Terminal rendering of a markdown document.
//!
//! Handles the subset the backend produces: `#`–`###` headings, `-`/`*`
//! bullets, pipe tables and paragraphs. Emphasis markers are stripped.

use std::sync::LazyLock;

use regex::Regex;

static EMPHASIS: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"\*\*(.+?)\*\*|\*(.+?)\*").ok());

#[must_use]
pub fn render(markdown: &str) -> String {
    let mut out: Vec<String> = Vec::new();
    let mut table: Vec<Vec<String>> = Vec::new();

    for line in markdown.lines() {
        let trimmed = line.trim();
        if is_table_row(trimmed) {
            if !is_separator_row(trimmed) {
                table.push(split_row(trimmed));
            }
            continue;
        }
        if !table.is_empty() {
            out.extend(render_table(&table));
            table.clear();
        }

        if let Some(text) = trimmed.strip_prefix("### ") {
            out.push(format!("▸ {}", inline(text)));
        } else if let Some(text) = trimmed.strip_prefix("## ") {
            let text = inline(text);
            let rule = "─".repeat(text.chars().count().max(3));
            out.push(text);
            out.push(rule);
        } else if let Some(text) = trimmed.strip_prefix("# ") {
            let text = inline(text);
            let rule = "═".repeat(text.chars().count().max(3));
            out.push(text);
            out.push(rule);
        } else if let Some(text) = trimmed.strip_prefix("- ").or_else(|| trimmed.strip_prefix("* ")) {
            out.push(format!("  • {}", inline(text)));
        } else {
            out.push(inline(trimmed));
        }
    }
    if !table.is_empty() {
        out.extend(render_table(&table));
    }

    out.join("\n")
}

fn inline(text: &str) -> String {
    match EMPHASIS.as_ref() {
        Some(re) => re
            .replace_all(text, |caps: &regex::Captures<'_>| {
                caps.get(1).or_else(|| caps.get(2)).map_or("", |m| m.as_str()).to_owned()
            })
            .into_owned(),
        None => text.to_owned(),
    }
}

fn is_table_row(line: &str) -> bool {
    line.len() > 1 && line.starts_with('|') && line.ends_with('|')
}

fn is_separator_row(line: &str) -> bool {
    line.chars().all(|c| matches!(c, '|' | '-' | ':' | ' '))
}

fn split_row(line: &str) -> Vec<String> {
    line.trim_matches('|').split('|').map(|cell| inline(cell.trim())).collect()
}

// Columns are padded by char count; wide glyphs may misalign slightly.
fn render_table(rows: &[Vec<String>]) -> Vec<String> {
    let columns = rows.iter().map(Vec::len).max().unwrap_or(0);
    let widths: Vec<usize> = (0..columns)
        .map(|c| rows.iter().filter_map(|r| r.get(c)).map(|cell| cell.chars().count()).max().unwrap_or(0))
        .collect();

    let mut lines = Vec::with_capacity(rows.len() + 1);
    for (i, row) in rows.iter().enumerate() {
        let cells: Vec<String> = widths
            .iter()
            .enumerate()
            .map(|(c, width)| {
                let cell = row.get(c).map_or("", String::as_str);
                let pad = width.saturating_sub(cell.chars().count());
                format!("{cell}{}", " ".repeat(pad))
            })
            .collect();
        lines.push(format!("  {}", cells.join(" │ ")).trim_end().to_owned());
        if i == 0 && rows.len() > 1 {
            let rule: Vec<String> = widths.iter().map(|w| "─".repeat(*w)).collect();
            lines.push(format!("  {}", rule.join("─┼─")));
        }
    }
    lines
}

#[cfg(test)]
#[path = "document_test.rs"]
mod tests;
