//! Request-path to page pipeline.
//!
//! ```text
//! request path -> classify -> ViewKind
//!                     |
//!   Directory         -> index redirect | breadcrumb + listing
//!   MarkdownDocument  -> read + MarkdownRenderer, parent breadcrumb
//!   PlainFile         -> read as text, parent breadcrumb
//!   Image             -> path + content type, no page
//!   SearchResults     -> SearchRunner stream under a page frame
//! ```
//!
//! Everything here is per request. The only long-lived pieces are the
//! root, the renderer and the [`Layout`], all immutable.

pub mod breadcrumb;
pub mod classify;
mod dispatch;
mod error;
pub mod listing;
mod markdown;
mod page;

pub use breadcrumb::{BreadcrumbTrail, Crumb};
pub use classify::{ViewKind, classify};
pub use dispatch::{SearchPage, View, ViewDispatcher};
pub use error::ViewError;
pub use listing::DirectoryListing;
pub use markdown::{CommonMarkRenderer, MarkdownRenderer};
pub use page::{Layout, PageBody, PageModel, search_item};
