//! Four-step progress track shown above every wizard page.

use crate::state::wizard::WizardStep;

const STEPS: u8 = 4;

/// `(1)━(2)━[3]─(4)  Step 3 · Analysis`
///
/// Steps before the current one are joined with a heavy rule, the rest
/// with a light one; the current step is bracketed.
#[must_use]
pub fn render(step: WizardStep) -> String {
    let current = step.number();
    let mut track = String::new();
    for n in 1..=STEPS {
        if n > 1 {
            track.push(if n <= current { '━' } else { '─' });
        }
        if n == current {
            track.push_str(&format!("[{n}]"));
        } else {
            track.push_str(&format!("({n})"));
        }
    }
    format!("{track}  Step {current} · {}", step.title())
}

#[cfg(test)]
#[path = "step_indicator_test.rs"]
mod tests;
