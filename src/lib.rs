//! # multidraft
//!
//! Terminal client for a four-step writing wizard backed by a remote
//! generation service. The user describes a topic, three language-model
//! providers draft it in parallel, each provider critiques its own draft,
//! and a final document is synthesized from whatever succeeded.
//!
//! This crate contains the session store, the authentication flow, the
//! settings and history state, the wizard controller, and a text
//! presentation layer. The backend that talks to the providers is a
//! separate service reached over HTTP/JSON through [`net::Backend`].

pub mod components;
pub mod config;
pub mod net;
pub mod pages;
pub mod provider;
pub mod shell;
pub mod state;
pub mod storage;
pub mod util;
