//! Reusable text components.
//!
//! SYSTEM CONTEXT
//! ==============
//! Components turn state into terminal text. They are pure functions of the
//! state they are handed: no I/O, no clocks, so pages and the shell can
//! compose them freely and tests can assert on exact strings.

pub mod document;
pub mod floating_menu;
pub mod modal;
pub mod provider_card;
pub mod step_indicator;
