//! Per-provider result cards for the draft and analysis steps.

use crate::provider::{Accent, Provider};
use crate::state::wizard::{AnalysisResult, DraftSlot, SlotStatus, Tally};

/// Characters of draft text shown on a card.
pub const PREVIEW_CHARS: usize = 160;

/// `[GPT] ChatGPT`, optionally wrapped in the provider's ANSI colour.
#[must_use]
pub fn header(provider: Provider, color: bool) -> String {
    let info = provider.info();
    let badge = format!("[{}]", info.badge);
    let badge = if color { paint(&badge, info.color) } else { badge };
    format!("{badge} {}", info.label)
}

#[must_use]
pub fn status_label(status: SlotStatus) -> &'static str {
    match status {
        SlotStatus::Idle => "skipped",
        SlotStatus::Pending => "working",
        SlotStatus::Success => "done",
        SlotStatus::Error => "failed",
    }
}

/// Card for one draft slot: header, title and the revealed preview, or the
/// error message for a failed draft.
#[must_use]
pub fn draft_card(slot: &DraftSlot, color: bool) -> String {
    let result = &slot.result;
    let mut out = format!("{} · {}\n", header(result.provider, color), status_label(result.status));
    match result.status {
        SlotStatus::Success => {
            out.push_str(&format!("  {}\n", result.title()));
            let shown = slot.reveal.as_ref().map_or(result.content.as_str(), |r| r.displayed());
            out.push_str(&format!("  {}\n", preview(shown, PREVIEW_CHARS)));
        }
        SlotStatus::Error => {
            out.push_str(&error_lines(result.error.as_deref()));
        }
        SlotStatus::Pending => out.push_str("  writing...\n"),
        SlotStatus::Idle => out.push_str("  not requested\n"),
    }
    out
}

/// Card for one analysis: first strength, first weakness and the
/// improvement line.
#[must_use]
pub fn analysis_card(result: &AnalysisResult, color: bool) -> String {
    let mut out = format!("{} · {}\n", header(result.provider, color), status_label(result.status));
    match result.status {
        SlotStatus::Success => {
            out.push_str(&format!("  + {}\n", first_or_none(&result.pros)));
            out.push_str(&format!("  - {}\n", first_or_none(&result.cons)));
            if !result.improvement.trim().is_empty() {
                out.push_str(&format!("  > {}\n", preview(&result.improvement, PREVIEW_CHARS)));
            }
        }
        SlotStatus::Error => {
            out.push_str(&error_lines(result.error.as_deref()));
        }
        SlotStatus::Pending => out.push_str("  analyzing...\n"),
        SlotStatus::Idle => out.push_str("  no draft to analyze\n"),
    }
    out
}

/// `"2 succeeded, 1 failed"`; the failure part is omitted when zero.
#[must_use]
pub fn summary(tally: Tally) -> String {
    if tally.failed == 0 {
        format!("{} succeeded", tally.succeeded)
    } else {
        format!("{} succeeded, {} failed", tally.succeeded, tally.failed)
    }
}

/// Single-line preview of at most `max` characters.
#[must_use]
pub fn preview(text: &str, max: usize) -> String {
    let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= max {
        return flat;
    }
    let mut cut: String = flat.chars().take(max).collect();
    cut.push_str("...");
    cut
}

// Multi-line messages keep their indentation under the `!` marker.
fn error_lines(error: Option<&str>) -> String {
    error
        .unwrap_or("unknown error")
        .lines()
        .enumerate()
        .map(|(i, line)| if i == 0 { format!("  ! {line}\n") } else { format!("    {line}\n") })
        .collect()
}

fn first_or_none(items: &[String]) -> &str {
    items.first().map_or("(none)", String::as_str)
}

fn paint(text: &str, accent: Accent) -> String {
    format!("\x1b[{}m{text}\x1b[0m", accent.ansi_code())
}

#[cfg(test)]
#[path = "provider_card_test.rs"]
mod tests;
