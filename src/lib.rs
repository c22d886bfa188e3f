//! Image Insight & Generation Studio
//!
//! Upload a portrait, let a visual-question-answering model describe it, and
//! have an image model render a stylised version from that description.

#![allow(clippy::multiple_crate_versions)]
#![deny(clippy::all)]
#![deny(clippy::await_holding_lock)]
#![deny(clippy::complexity)]
#![deny(clippy::correctness)]
#![deny(clippy::disallowed_methods)]
#![deny(clippy::expect_used)]
#![deny(clippy::needless_pass_by_value)]
#![deny(clippy::panic)]
#![deny(clippy::perf)]
#![deny(clippy::trivially_copy_pass_by_ref)]
#![deny(clippy::unreachable)]
#![deny(clippy::unwrap_used)]
#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod cli;
pub mod config;
pub mod constants;
pub mod error;
pub mod feedback;
pub mod inference;
pub mod intake;
pub mod notice;
pub mod pipeline;
pub mod prompt;
pub mod web;

#[cfg(test)]
pub(crate) mod test_support;
