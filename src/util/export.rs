//! Document export formats.
//!
//! Generated documents are lightweight markdown: `#` headings, `**bold**`
//! and `*italic*` emphasis, `- ` bullets, `| a | b |` table rows and blank
//! line paragraph breaks. Exports are pure text transforms; copying the
//! result anywhere is the caller's business.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

static BOLD: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"\*\*(.+?)\*\*").ok());
static ITALIC: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"\*(.+?)\*").ok());
static TAG: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"#([가-힣a-zA-Z0-9_]+)").ok());

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Plain,
    Html,
    NaverBlog,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 3] = [Self::Plain, Self::Html, Self::NaverBlog];

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Plain => "plain",
            Self::Html => "html",
            Self::NaverBlog => "naver",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown export format '{0}' (expected plain, html or naver)")]
pub struct UnknownFormat(pub String);

impl FromStr for ExportFormat {
    type Err = UnknownFormat;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "plain" | "text" => Ok(Self::Plain),
            "html" => Ok(Self::Html),
            "naver" | "naver-blog" => Ok(Self::NaverBlog),
            _ => Err(UnknownFormat(raw.to_owned())),
        }
    }
}

#[must_use]
pub fn export(content: &str, format: ExportFormat) -> String {
    match format {
        ExportFormat::Plain => content.to_owned(),
        ExportFormat::Html => to_html(content),
        ExportFormat::NaverBlog => to_naver_blog(content),
    }
}

/// Export a saved history document. HTML leads with the title as `<h1>`;
/// the blog format keeps one element per line and marks blank lines `<br>`.
#[must_use]
pub fn export_saved(content: &str, title: &str, format: ExportFormat) -> String {
    let title = title.trim();
    match format {
        ExportFormat::Plain => content.to_owned(),
        ExportFormat::Html if title.is_empty() => to_html(content),
        ExportFormat::Html => {
            let body = to_html(content);
            if body.is_empty() { format!("<h1>{title}</h1>") } else { format!("<h1>{title}</h1>\n{body}") }
        }
        ExportFormat::NaverBlog => to_naver_lines(content),
    }
}

// =============================================================================
// LINE CLASSIFICATION
// =============================================================================

enum Line<'a> {
    Heading(u8, &'a str),
    Bullet(&'a str),
    TableRow(Vec<&'a str>),
    Markup(&'a str),
    Text(&'a str),
}

fn classify(line: &str) -> Line<'_> {
    let trimmed = line.trim();
    for (level, prefix) in [(3u8, "### "), (2, "## "), (1, "# ")] {
        if let Some(rest) = trimmed.strip_prefix(prefix) {
            return Line::Heading(level, rest.trim());
        }
    }
    if let Some(rest) = trimmed.strip_prefix("- ") {
        return Line::Bullet(rest.trim());
    }
    if trimmed.len() > 1 && trimmed.starts_with('|') && trimmed.ends_with('|') {
        let cells = trimmed
            .split('|')
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .collect();
        return Line::TableRow(cells);
    }
    if trimmed.starts_with('<') {
        return Line::Markup(trimmed);
    }
    Line::Text(trimmed)
}

fn emphasis(text: &str, strong: &str, em: &str) -> String {
    let mut out = text.to_owned();
    if let Some(re) = BOLD.as_ref() {
        out = re.replace_all(&out, format!("<{strong}>$1</{strong}>").as_str()).into_owned();
    }
    if let Some(re) = ITALIC.as_ref() {
        out = re.replace_all(&out, format!("<{em}>$1</{em}>").as_str()).into_owned();
    }
    out
}

// =============================================================================
// HTML
// =============================================================================

/// One element per non-blank line: headings, list items, paragraphs.
#[must_use]
pub fn to_html(content: &str) -> String {
    content
        .lines()
        .filter(|l| !l.trim().is_empty())
        .map(|line| match classify(line) {
            Line::Heading(level, text) => format!("<h{level}>{}</h{level}>", emphasis(text, "strong", "em")),
            Line::Bullet(text) => format!("<li>{}</li>", emphasis(text, "strong", "em")),
            Line::Markup(raw) => raw.to_owned(),
            Line::TableRow(_) | Line::Text(_) => format!("<p>{}</p>", emphasis(line.trim(), "strong", "em")),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

// =============================================================================
// NAVER BLOG
// =============================================================================

/// Blog-editor markup: `<b>`/`<i>` emphasis, bullets grouped in `<ul>`,
/// table rows as one-row tables, and one `<p>` per blank-line block.
#[must_use]
pub fn to_naver_blog(content: &str) -> String {
    let mut out: Vec<String> = Vec::new();
    for block in split_blocks(content) {
        let mut paragraph: Vec<String> = Vec::new();
        let mut items: Vec<String> = Vec::new();
        for line in block {
            let line = classify(line);
            if !matches!(line, Line::Bullet(_)) && !items.is_empty() {
                out.push(format!("<ul>{}</ul>", items.concat()));
                items.clear();
            }
            if matches!(line, Line::Heading(..) | Line::Bullet(_) | Line::TableRow(_) | Line::Markup(_)) {
                flush_paragraph(&mut paragraph, &mut out);
            }
            match line {
                Line::Heading(level, text) => out.push(format!("<h{level}>{}</h{level}>", emphasis(text, "b", "i"))),
                Line::Bullet(text) => items.push(format!("<li>{}</li>", emphasis(text, "b", "i"))),
                Line::TableRow(cells) => {
                    let row: String = cells.iter().map(|c| format!("<td>{}</td>", emphasis(c, "b", "i"))).collect();
                    out.push(format!("<table><tr>{row}</tr></table>"));
                }
                Line::Markup(raw) => out.push(raw.to_owned()),
                Line::Text(text) => paragraph.push(emphasis(text, "b", "i")),
            }
        }
        if !items.is_empty() {
            out.push(format!("<ul>{}</ul>", items.concat()));
        }
        flush_paragraph(&mut paragraph, &mut out);
    }
    out.join("\n")
}

fn to_naver_lines(content: &str) -> String {
    content
        .lines()
        .map(|line| match classify(line) {
            _ if line.trim().is_empty() => "<br>".to_owned(),
            Line::Heading(level, text) => format!("<h{level}>{}</h{level}>", emphasis(text, "b", "i")),
            Line::Markup(raw) => raw.to_owned(),
            Line::Bullet(_) | Line::TableRow(_) | Line::Text(_) => format!("<p>{}</p>", emphasis(line.trim(), "b", "i")),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn flush_paragraph(paragraph: &mut Vec<String>, out: &mut Vec<String>) {
    if !paragraph.is_empty() {
        out.push(format!("<p>{}</p>", paragraph.join("\n")));
        paragraph.clear();
    }
}

fn split_blocks(content: &str) -> Vec<Vec<&str>> {
    let mut blocks = Vec::new();
    let mut current = Vec::new();
    for line in content.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                blocks.push(std::mem::take(&mut current));
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        blocks.push(current);
    }
    blocks
}

// =============================================================================
// TAGS
// =============================================================================

/// `#tag` words in order of first appearance, without the `#`.
#[must_use]
pub fn extract_tags(content: &str) -> Vec<String> {
    let Some(re) = TAG.as_ref() else {
        return Vec::new();
    };
    let mut tags: Vec<String> = Vec::new();
    for cap in re.captures_iter(content) {
        let tag = &cap[1];
        if !tags.iter().any(|t| t == tag) {
            tags.push(tag.to_owned());
        }
    }
    tags
}

#[cfg(test)]
#[path = "export_test.rs"]
mod tests;
