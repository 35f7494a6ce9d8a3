//! Reference vs. version API comparison
//!
//! Every use case's payload is posted to a reference server and to the
//! version under test; the two JSON answers are compared key by key.
//!
//! ```text
//! ┌─────────────────┐      ┌─────────────────┐
//! │  Reference      │      │  Version        │
//! │  (url_ref)      │      │  (url_version)  │
//! └────────┬────────┘      └────────┬────────┘
//!          │                        │
//!          └──────────┬─────────────┘
//!                     │
//!              ┌──────▼──────┐      ┌──────────────┐
//!              │   Runner    ├─────►│ results.json │
//!              └─────────────┘      └──────────────┘
//! ```
//!
//! The reference answer is recorded the first time it succeeds and reused
//! from then on; the version server is called on every run.

pub mod client;
pub mod compare;
pub mod error;
pub mod harness;
pub mod pipeline;
pub mod session;
pub mod token;

pub use client::{ApiCallResult, ApiClient};
pub use compare::{compare_json, DifferenceSet, KeyDifference};
pub use error::{CompareError, SetupError, TokenError, UseCaseError};
pub use harness::{Outcome, RunSummary, Runner};
pub use pipeline::{run_regression, RunPaths};
pub use session::HttpSession;
pub use token::{acquire_token, BearerToken};
