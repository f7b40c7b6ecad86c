//! Digest output: email body rendering and SMTP delivery.
//!
//! This module contains the notifier half of the pipeline:
//!
//! # Submodules
//!
//! - [`render`]: turns a digest into an email body (HTML for structured
//!   recommendations, plain text for the opaque line-based variant)
//! - [`email`]: delivers the rendered body over authenticated SMTP with
//!   STARTTLS, or skips entirely when the digest is empty

pub mod email;
pub mod render;
