//! Small self-contained helpers used by state and presentation.

pub mod export;
pub mod reveal;
