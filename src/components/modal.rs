//! Detail modal: full text of one draft or analysis.

use crate::state::ui::DetailModal;

pub const FOOTER: &str = "└─ type `close` to return";

#[must_use]
pub fn header(title: &str) -> String {
    format!("┌─ {title}")
}

/// Boxed view of the modal's revealed text with a progress footer.
#[must_use]
pub fn render(modal: &DetailModal) -> String {
    let reveal = &modal.reveal;
    let mut out = format!("{}\n", header(&modal.title));
    for line in reveal.displayed().lines() {
        out.push_str(&format!("│ {line}\n"));
    }
    if reveal.is_complete() {
        out.push_str(FOOTER);
    } else {
        let total = reveal.full_text().chars().count();
        out.push_str(&format!("└─ {}/{} characters · type `close` to return", reveal.shown_chars(), total));
    }
    out
}

#[cfg(test)]
#[path = "modal_test.rs"]
mod tests;
