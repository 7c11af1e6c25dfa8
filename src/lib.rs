//! Library crate for userdir-manager.
//!
//! This crate exposes the building blocks of the TUI:
//! - Remote directory client, record types, and wire mapping (`api`)
//! - Application state, forms, synchronization, and update loop (`app`)
//! - Error types (`error`)
//! - UI rendering and widgets (`ui`)
//! - Derivation of the visible user list (`view`)
//!
//! It is used by the `userdir-manager` binary and by tests.
#![doc = include_str!("../README.md")]
#![deny(rustdoc::broken_intra_doc_links)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod api;
pub mod app;
pub mod error;
pub mod ui;
pub mod view;

// Re-export commonly used items at the crate root for convenience
/// Convenient error and result types shared across the crate.
pub use error::{ApiError, Result};
