//! `newsgate` — near-duplicate screening for a news-ingestion pipeline.
//!
//! The aggregation frontend periodically pulls Thai/Korean news from
//! search-provider APIs; before a fetched article is stored it is screened
//! here against the recently stored batch, so reworded copies of a story
//! already on file are dropped instead of inserted. Exposed two ways: as a
//! library of pure scoring functions, and as a newline-delimited JSON-RPC
//! 2.0 service over stdio for the out-of-process pipeline.
//!
//! # Methods
//!
//! - `similarity/score` — composite score for one article pair
//! - `dedup/screen` — screen a candidate against the recent batch
//! - `ping`
//!
//! # Architecture
//!
//! ```text
//! stdin (JSON-RPC) → Service → similarity (Levenshtein + Jaccard)
//!                        │            ↓
//!                        └────── dedup screening
//! stdout (JSON-RPC) ←─────────────────┘
//! ```
//!
//! The `limiter`, `csrf`, and `cache` modules are operational utilities
//! for the web tier; they do not interact with the scoring path.

pub mod cache;
pub mod csrf;
pub mod dedup;
pub mod error;
pub mod limiter;
pub mod server;
pub mod similarity;

pub use error::{NewsgateError, NewsgateResult};
pub use server::run_service;
pub use similarity::{news_similarity, to_percent, Article, Weights};
