//! Step 1 input: what to write, for whom, and how.
//!
//! DESIGN
//! ======
//! Every choice the user makes from a fixed list is a closed enum whose wire
//! value is the exact string the backend expects (Korean labels). Each also
//! carries an ASCII slug so the terminal front end can accept typed input.
//! Multi-select sets keep selection order because the backend receives them
//! as an ordered, comma-joined list.

use std::fmt;
use std::str::FromStr;

use crate::net::types::DraftRequest;
use crate::provider::Provider;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} '{value}'")]
pub struct UnknownChoice {
    pub kind: &'static str,
    pub value: String,
}

macro_rules! choice_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $kind:literal {
            $($variant:ident => ($wire:literal, $slug:literal)),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Value sent to the backend.
            #[must_use]
            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $wire),+
                }
            }

            /// ASCII name accepted on the command line.
            #[must_use]
            pub fn slug(self) -> &'static str {
                match self {
                    $($name::$variant => $slug),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = UnknownChoice;

            fn from_str(raw: &str) -> Result<Self, Self::Err> {
                let wanted = raw.trim();
                Self::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_str() == wanted || v.slug().eq_ignore_ascii_case(wanted))
                    .ok_or_else(|| UnknownChoice { kind: $kind, value: raw.to_owned() })
            }
        }
    };
}

choice_enum! {
    /// Purpose tag for the document.
    Intent, "intent" {
        Informational => ("정보성", "informational"),
        TravelReview => ("방문후기/여행기", "travel"),
        ProductPromotion => ("제품 리뷰/홍보", "promotion"),
        Tutorial => ("튜토리얼", "tutorial"),
        Comparison => ("비교/리뷰", "comparison"),
        Troubleshooting => ("문제 해결 가이드", "troubleshooting"),
        Lecture => ("교육/강의", "lecture"),
        Storytelling => ("스토리텔링", "storytelling"),
        Branding => ("브랜딩", "branding"),
        Marketing => ("설득/마케팅", "marketing"),
        Entertainment => ("엔터테인먼트", "entertainment"),
        Restaurant => ("맛집", "restaurant"),
        DailyThoughts => ("일상생각", "daily"),
        ProductReview => ("상품리뷰", "product-review"),
        Business => ("경제비즈니스", "business"),
        Computing => ("IT컴퓨터", "it"),
        Academic => ("교육학문", "academic"),
    }
}

choice_enum! {
    TonePreset, "tone" {
        Clear => ("친절하고 명확하게", "clear"),
        Concise => ("전문적이고 간결하게", "concise"),
        Conversational => ("대화체로 친근하게", "conversational"),
        Humorous => ("유머러스하게", "humorous"),
        Authoritative => ("권위적으로 신뢰감 있게", "authoritative"),
        Warm => ("감성적이고 따뜻하게", "warm"),
        Neutral => ("객관적이고 중립적으로", "neutral"),
        Motivational => ("열정적이고 동기부여", "motivational"),
        Critical => ("비판적이고 분석적으로", "critical"),
    }
}

choice_enum! {
    AgeBracket, "age bracket" {
        All => ("전체", "all"),
        Teens => ("10대", "10s"),
        Twenties => ("20대", "20s"),
        Thirties => ("30대", "30s"),
        Forties => ("40대", "40s"),
        Fifties => ("50대", "50s"),
        SixtyPlus => ("60대+", "60+"),
    }
}

choice_enum! {
    Gender, "gender" {
        All => ("전체", "all"),
        Male => ("남성", "male"),
        Female => ("여성", "female"),
    }
}

impl Default for Gender {
    fn default() -> Self {
        Self::All
    }
}

/// Writing tone: a preset or free text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tone {
    Preset(TonePreset),
    Custom(String),
}

impl Default for Tone {
    fn default() -> Self {
        Self::Preset(TonePreset::Clear)
    }
}

impl Tone {
    /// Wire value of the tone.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Preset(preset) => preset.as_str(),
            Self::Custom(text) => text.trim(),
        }
    }
}

impl FromStr for Tone {
    type Err = std::convert::Infallible;

    /// A preset by wire value or slug; anything else is custom text.
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Ok(raw.parse::<TonePreset>().map_or_else(|_| Self::Custom(raw.trim().to_owned()), Self::Preset))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequiredField {
    Topic,
    Audience,
}

impl fmt::Display for RequiredField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Topic => "topic",
            Self::Audience => "target audience",
        })
    }
}

// =============================================================================
// REQUEST
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub topic: String,
    pub audience: String,
    pub keywords: Vec<String>,
    intents: Vec<Intent>,
    pub tone: Tone,
    ages: Vec<AgeBracket>,
    pub gender: Gender,
}

impl Default for GenerationRequest {
    fn default() -> Self {
        Self {
            topic: String::new(),
            audience: String::new(),
            keywords: Vec::new(),
            intents: Vec::new(),
            tone: Tone::default(),
            ages: vec![AgeBracket::All],
            gender: Gender::All,
        }
    }
}

impl GenerationRequest {
    #[must_use]
    pub fn new(topic: impl Into<String>, audience: impl Into<String>) -> Self {
        Self { topic: topic.into(), audience: audience.into(), ..Self::default() }
    }

    #[must_use]
    pub fn intents(&self) -> &[Intent] {
        &self.intents
    }

    #[must_use]
    pub fn ages(&self) -> &[AgeBracket] {
        &self.ages
    }

    /// Add the intent if absent, remove it if present.
    pub fn toggle_intent(&mut self, intent: Intent) {
        if let Some(pos) = self.intents.iter().position(|i| *i == intent) {
            self.intents.remove(pos);
        } else {
            self.intents.push(intent);
        }
    }

    /// `All` replaces every other bracket. Any other bracket drops `All`
    /// and toggles itself, which may leave the set empty.
    pub fn toggle_age(&mut self, bracket: AgeBracket) {
        if bracket == AgeBracket::All {
            self.ages = vec![AgeBracket::All];
            return;
        }
        self.ages.retain(|a| *a != AgeBracket::All);
        if let Some(pos) = self.ages.iter().position(|a| *a == bracket) {
            self.ages.remove(pos);
        } else {
            self.ages.push(bracket);
        }
    }

    /// Replace the keyword list from comma-separated text.
    pub fn set_keywords_from_str(&mut self, raw: &str) {
        self.keywords = raw
            .split(',')
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .map(str::to_owned)
            .collect();
    }

    /// # Errors
    ///
    /// Returns the first required field that is blank.
    pub fn validate(&self) -> Result<(), RequiredField> {
        if self.topic.trim().is_empty() {
            return Err(RequiredField::Topic);
        }
        if self.audience.trim().is_empty() {
            return Err(RequiredField::Audience);
        }
        Ok(())
    }

    #[must_use]
    pub fn article_intent(&self) -> String {
        self.intents.iter().map(|i| i.as_str()).collect::<Vec<_>>().join(", ")
    }

    #[must_use]
    pub fn tone_style(&self) -> &str {
        self.tone.as_str()
    }

    #[must_use]
    pub fn detailed_keywords(&self) -> String {
        self.keywords.join(", ")
    }

    /// The draft body for one provider.
    #[must_use]
    pub fn draft_request(&self, provider: Provider, api_key: &str) -> DraftRequest {
        DraftRequest {
            topic: self.topic.trim().to_owned(),
            article_intent: self.article_intent(),
            target_audience: self.audience.trim().to_owned(),
            tone_style: self.tone_style().to_owned(),
            detailed_keywords: self.detailed_keywords(),
            age_groups: self.ages.iter().map(|a| a.as_str().to_owned()).collect(),
            gender: self.gender.as_str().to_owned(),
            model: provider.api_name().to_owned(),
            api_key: api_key.to_owned(),
        }
    }
}

#[cfg(test)]
#[path = "request_test.rs"]
mod tests;
