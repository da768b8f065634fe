//! Full-screen pages.
//!
//! SYSTEM CONTEXT
//! ==============
//! Each page composes components into the text the shell prints for one
//! view. Pages read state only; all mutation goes through `crate::state`.

pub mod history;
pub mod login;
pub mod settings;
pub mod wizard;
