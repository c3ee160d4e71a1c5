//! # Core Dialog Logic
//!
//! This module contains the dialog's business logic.
//! It knows nothing about any specific UI technology or transport.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • Dialog (state)       │
//!                    │  • Action (events)      │
//!                    │  • update() (reducer)   │
//!                    │                         │
//!                    │  No I/O. No UI. Pure.   │
//!                    └───────────┬─────────────┘
//!                                │ Effect
//!            ┌───────────────────┴───────────────────┐
//!            ▼                                       ▼
//!     ┌────────────┐                          ┌────────────┐
//!     │    TUI     │                          │   submit   │
//!     │  Adapter   │                          │  (reqwest) │
//!     │ (ratatui)  │                          │            │
//!     └────────────┘                          └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`schema`]: dialog and field descriptors as the server sends them
//! - [`selection`]: folding users/channels/options into `{text, value}`
//! - [`selector`]: the autocomplete selector control and its activation guard
//! - [`field`]: per-type widget dispatch
//! - [`form`]: values, errors, validation
//! - [`state`]: the `Dialog` struct holding all dialog state
//! - [`action`]: the `Action` enum and `update()`
//! - [`directory`]: users and channels offered by selection screens
//! - [`config`]: layered configuration

pub mod action;
pub mod config;
pub mod directory;
pub mod field;
pub mod form;
pub mod schema;
pub mod selection;
pub mod selector;
pub mod state;
