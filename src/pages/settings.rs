//! API key settings page.

use crate::provider::Provider;
use crate::state::settings::SettingsState;

/// Masked keys per provider with where to obtain a missing one.
#[must_use]
pub fn render(settings: &SettingsState) -> String {
    let mut out = String::from("Settings · API keys\n");
    if !settings.loaded {
        out.push_str("(keys not loaded from the backend)\n");
    }
    for provider in Provider::ALL {
        let info = provider.info();
        let key = settings.keys.for_provider(provider);
        out.push_str(&format!("  {:<8} {}\n", info.label, settings.keys.masked(provider)));
        if key.is_empty() {
            out.push_str(&format!("           get one at {} (starts with {})\n", info.key_url, info.key_prefix));
        } else if !key.starts_with(info.key_prefix) {
            out.push_str(&format!("           note: {} keys usually start with {}\n", info.label, info.key_prefix));
        }
    }
    if settings.saved {
        out.push_str("Saved.\n");
    }
    if let Some(error) = &settings.error {
        out.push_str(&format!("! {error}\n"));
    }
    out
}

#[cfg(test)]
#[path = "settings_test.rs"]
mod tests;
