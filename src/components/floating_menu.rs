//! Floating quick-access menu.

use crate::state::ui::MenuItem;

/// The menu line(s), or `None` when the user has hidden the menu.
#[must_use]
pub fn render(visible: bool, open: bool) -> Option<String> {
    if !visible {
        return None;
    }
    if !open {
        return Some("[≡] menu".to_owned());
    }
    let mut out = String::from("[×] menu");
    for (i, item) in MenuItem::ALL.iter().enumerate() {
        out.push_str(&format!("\n  {}. {}", i + 1, item.label()));
    }
    Some(out)
}

/// Resolve a menu choice by 1-based number or by label.
#[must_use]
pub fn parse_item(raw: &str) -> Option<MenuItem> {
    let raw = raw.trim();
    if let Ok(n) = raw.parse::<usize>() {
        return n.checked_sub(1).and_then(|i| MenuItem::ALL.get(i).copied());
    }
    let wanted = raw.to_lowercase();
    MenuItem::ALL.into_iter().find(|item| {
        let label = item.label().to_lowercase();
        label == wanted || label.split_whitespace().next() == Some(wanted.as_str())
    })
}

#[cfg(test)]
#[path = "floating_menu_test.rs"]
mod tests;
