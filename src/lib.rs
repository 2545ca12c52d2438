//! Translate as you type.
//!
//! [`application::QueryController`] turns a stream of search-box edits into
//! at most one live translation request, debounced and cancelled as the text
//! keeps changing, and publishes only the newest result to a
//! [`domain::traits::ResultSink`].

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod presentation;
pub mod state;
