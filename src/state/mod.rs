//! Client-side state.
//!
//! DESIGN
//! ======
//! State is split by domain (`session`, `auth`, `settings`, `history`,
//! `wizard`, `ui`) so renderers and the shell depend on small focused models.
//! Only `wizard` talks to more than one backend endpoint.

pub mod auth;
pub mod history;
pub mod request;
pub mod session;
pub mod settings;
pub mod ui;
pub mod wizard;
