//! # Symptom Triage
//!
//! Takes a free-text description of symptoms and returns either an
//! urgent-care message (when the text names a critical condition) or
//! ranked condition matches with over-the-counter medicine suggestions.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   ┌──────────────────────────────┐
//! │ Catalog file │──▶│ symptom-triage-core Engine   │
//! │ or built-in  │   │ critical scan → TF-IDF rank  │
//! └──────────────┘   │ → assemble → refine          │
//!                    └──────────────┬───────────────┘
//!                      ┌────────────┴─────┐
//!                      ▼                  ▼
//!                 ┌──────────┐       ┌──────────┐
//!                 │   CLI    │       │   HTTP   │
//!                 │ (triage) │       │  (axum)  │
//!                 └──────────┘       └──────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! triage check "I have a headache and slight fever"
//! triage check "I have a headache" --severity 9 --condition Allergies
//! triage conditions --critical
//! triage serve
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`catalog`] | Catalog loading and engine construction |
//! | [`check`] | Request validation, matching, and output formatting |
//! | [`conditions`] | Catalog listings |
//! | [`server`] | HTTP JSON server |
//! | [`logging`] | Tracing subscriber setup |

pub mod catalog;
pub mod check;
pub mod conditions;
pub mod config;
pub mod logging;
pub mod server;
