//! Full-text search through an external tool.
//!
//! # Pipeline
//!
//! ```text
//! SearchRunner::run  -> spawns `ag [-i] -- <query> <scope>` (cwd = root)
//!        |
//! SearchStream       -> one stdout line at a time, deadline + line cap
//!        |
//! LineParser         -> `path:line:content` record, or raw passthrough
//!        |
//! SearchGrouper      -> file heading once per run of same-file records
//! ```
//!
//! Nothing is buffered beyond one line, so a slow client throttles the
//! child through the pipe. Dropping the stream kills the child.

mod error;
mod parse;
mod runner;

pub use error::SearchError;
pub use parse::{LineParser, SearchGrouper, SearchItem, SearchResultLine};
pub use runner::{SearchRunner, SearchStream};
