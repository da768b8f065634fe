//! Wizard page: one view per step, with the commands valid there.

use crate::components::{document, provider_card, step_indicator};
use crate::provider::Provider;
use crate::state::request::{AgeBracket, Gender, GenerationRequest, Intent, TonePreset};
use crate::state::wizard::{Wizard, WizardStep};

/// Shown under the final document.
pub const DONE_HINT: &str = "`restart` for a new topic, `home` to edit this one.";

#[must_use]
pub fn render(wizard: &Wizard, color: bool) -> String {
    let step = wizard.step();
    let mut out = format!("{}\n\n", step_indicator::render(step));

    match step {
        WizardStep::Input => {
            out.push_str(&request_summary(wizard.request()));
            out.push('\n');
            out.push_str(&input_help());
        }
        WizardStep::Confirm => {
            out.push_str(&request_summary(wizard.request()));
            out.push_str("\nSend this request to ChatGPT, Gemini and Groq? `start` to generate, `back` to edit.\n");
        }
        WizardStep::Generating | WizardStep::Drafted => {
            for provider in Provider::ALL {
                out.push_str(&provider_card::draft_card(wizard.draft(provider), color));
            }
            if step == WizardStep::Drafted {
                let tally = wizard.draft_tally();
                out.push_str(&format!("\n{}\n", provider_card::summary(tally)));
                if tally.succeeded > 0 {
                    out.push_str(
                        "`analyze` to continue, `view <provider>` to read a draft, `start` to regenerate, `back` to edit.\n",
                    );
                } else {
                    out.push_str("No draft succeeded. `start` to retry or `back` to edit.\n");
                }
            }
        }
        WizardStep::Analyzing | WizardStep::Analyzed => {
            for provider in Provider::ALL {
                out.push_str(&provider_card::analysis_card(wizard.analysis(provider), color));
            }
            if step == WizardStep::Analyzed {
                out.push_str(&format!("\n{}\n", provider_card::summary(wizard.analysis_tally())));
                out.push_str("`final` to write the final document, `view <provider>` for details, `back` to drafts.\n");
            }
        }
        WizardStep::Synthesizing => {
            out.push_str(&format!(
                "Merging drafts and analyses with {}...\n",
                wizard.options().synthesis_provider.label()
            ));
        }
        WizardStep::Done => {
            if let Some(doc) = wizard.final_document() {
                out.push_str(&document::render(doc.reveal.displayed()));
                out.push('\n');
            }
            out.push_str(&format!("\n{DONE_HINT}\n"));
        }
    }

    if let Some(error) = wizard.last_error() {
        out.push_str(&format!("! {error}\n"));
    }
    out
}

/// The step 1 fields as aligned `name: value` lines.
#[must_use]
pub fn request_summary(request: &GenerationRequest) -> String {
    let or_placeholder = |value: String, placeholder: &str| {
        if value.trim().is_empty() { placeholder.to_owned() } else { value }
    };
    let ages: Vec<&str> = request.ages().iter().map(|a| a.as_str()).collect();
    let rows = [
        ("topic", or_placeholder(request.topic.trim().to_owned(), "(required)")),
        ("audience", or_placeholder(request.audience.trim().to_owned(), "(required)")),
        ("intent", or_placeholder(request.article_intent(), "(none)")),
        ("tone", or_placeholder(request.tone_style().to_owned(), "(none)")),
        ("keywords", or_placeholder(request.detailed_keywords(), "(none)")),
        ("ages", or_placeholder(ages.join(", "), "(none)")),
        ("gender", request.gender.as_str().to_owned()),
    ];
    rows.iter().map(|(name, value)| format!("  {:<9} {value}\n", format!("{name}:"))).collect()
}

fn input_help() -> String {
    let slugs = |items: Vec<&'static str>| items.join(", ");
    format!(
        "Set fields with `topic <text>`, `audience <text>`, `keywords <a, b>`, `intent <name>`, \
         `tone <name|text>`, `age <name>`, `gender <name>`; `next` to review.\n\
         \x20 intents: {}\n\x20 tones:   {}\n\x20 ages:    {}\n\x20 genders: {}\n",
        slugs(Intent::ALL.iter().map(|i| i.slug()).collect()),
        slugs(TonePreset::ALL.iter().map(|t| t.slug()).collect()),
        slugs(AgeBracket::ALL.iter().map(|a| a.slug()).collect()),
        slugs(Gender::ALL.iter().map(|g| g.slug()).collect()),
    )
}

#[cfg(test)]
#[path = "wizard_test.rs"]
mod tests;
