//! Provider catalogue.
//!
//! DESIGN
//! ======
//! The three language-model providers form a closed enum. Everything that
//! varies per provider (display label, backend identifier, badge, colour,
//! credential hints) lives in one lookup table, so callers never branch on
//! display strings. [`PerProvider`] holds exactly one value per provider and
//! is how the wizard keeps its per-provider slots.

use std::fmt;
use std::ops::{Index, IndexMut};
use std::str::FromStr;

/// A language-model provider reachable through the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Provider {
    ChatGpt,
    Gemini,
    Groq,
}

/// Terminal accent colour of a provider's cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Accent {
    Green,
    Blue,
    Orange,
}

impl Accent {
    /// SGR foreground code. Orange has no basic ANSI code; yellow stands in.
    #[must_use]
    pub fn ansi_code(self) -> u8 {
        match self {
            Self::Green => 32,
            Self::Blue => 34,
            Self::Orange => 33,
        }
    }
}

/// Static presentation and wire data for one provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProviderInfo {
    /// Human label, also used as the `model` field of synthesis inputs.
    pub label: &'static str,
    /// Identifier the backend expects in the `model` field of requests.
    pub api_name: &'static str,
    /// Short badge shown on cards.
    pub badge: &'static str,
    pub color: Accent,
    /// Typical prefix of a credential for this provider.
    pub key_prefix: &'static str,
    /// Where a user creates a credential.
    pub key_url: &'static str,
}

const PROVIDER_TABLE: [ProviderInfo; 3] = [
    ProviderInfo {
        label: "ChatGPT",
        api_name: "openai",
        badge: "GPT",
        color: Accent::Green,
        key_prefix: "sk-",
        key_url: "https://platform.openai.com/api-keys",
    },
    ProviderInfo {
        label: "Gemini",
        api_name: "gemini",
        badge: "G",
        color: Accent::Blue,
        key_prefix: "AIza",
        key_url: "https://aistudio.google.com/app/apikey",
    },
    ProviderInfo {
        label: "Groq",
        api_name: "groq",
        badge: "GQ",
        color: Accent::Orange,
        key_prefix: "gsk_",
        key_url: "https://console.groq.com/keys",
    },
];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown provider '{0}' (expected chatgpt/openai, gemini or groq)")]
pub struct UnknownProvider(pub String);

impl Provider {
    /// All providers in display order.
    pub const ALL: [Provider; 3] = [Provider::ChatGpt, Provider::Gemini, Provider::Groq];

    const fn index(self) -> usize {
        match self {
            Self::ChatGpt => 0,
            Self::Gemini => 1,
            Self::Groq => 2,
        }
    }

    #[must_use]
    pub fn info(self) -> &'static ProviderInfo {
        &PROVIDER_TABLE[self.index()]
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        self.info().label
    }

    #[must_use]
    pub fn api_name(self) -> &'static str {
        self.info().api_name
    }

    /// Look up a provider by its backend identifier (`"openai"`, ...).
    #[must_use]
    pub fn from_api_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.api_name() == name)
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Provider {
    type Err = UnknownProvider;

    /// Accepts the backend identifier or the label, case-insensitively.
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let wanted = raw.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|p| p.api_name() == wanted || p.label().to_ascii_lowercase() == wanted)
            .ok_or_else(|| UnknownProvider(raw.to_owned()))
    }
}

// =============================================================================
// PER-PROVIDER SLOTS
// =============================================================================

/// Exactly one `T` per provider, indexed by [`Provider`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PerProvider<T>([T; 3]);

impl<T> PerProvider<T> {
    /// Build every slot from its provider.
    pub fn from_fn(f: impl FnMut(Provider) -> T) -> Self {
        Self(Provider::ALL.map(f))
    }

    /// Iterate `(provider, value)` pairs in display order.
    pub fn iter(&self) -> impl Iterator<Item = (Provider, &T)> {
        Provider::ALL.into_iter().zip(self.0.iter())
    }

    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.0.iter()
    }
}

impl<T: Default> Default for PerProvider<T> {
    fn default() -> Self {
        Self::from_fn(|_| T::default())
    }
}

impl<T> Index<Provider> for PerProvider<T> {
    type Output = T;

    fn index(&self, provider: Provider) -> &T {
        &self.0[provider.index()]
    }
}

impl<T> IndexMut<Provider> for PerProvider<T> {
    fn index_mut(&mut self, provider: Provider) -> &mut T {
        &mut self.0[provider.index()]
    }
}

#[cfg(test)]
#[path = "provider_test.rs"]
mod tests;
