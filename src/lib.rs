//! Demo video-generation agent: a mocked provider API plus the client-side
//! polling machinery that tracks generation jobs to completion.

pub mod app_state;
pub mod client;
pub mod config;
pub mod consts;
pub mod error;
pub mod middleware;
pub mod videogen;
