//! Use-case fixtures and recorded results
//!
//! A use case is a named request payload. The first successful call to the
//! reference server is recorded next to it as `result` + `http_code` and acts
//! as the baseline on later runs.
//!
//! ```json
//! {
//!   "uc1": {
//!     "payload": { "x": 1 },
//!     "result": { "y": 1 },
//!     "http_code": 200
//!   }
//! }
//! ```

mod store;
mod use_case;

pub use store::{StoreError, StoreResult, UseCaseStore};
pub use use_case::{HttpStatus, UseCase};
