//! Reader runtime for the article page.
//!
//! The browser page loads the emitted data script, renders the article list,
//! and fetches one article at a time on demand. This module holds that logic
//! behind two seams so it runs anywhere:
//!
//! | Seam | Browser | In process |
//! |------|---------|------------|
//! | [`page::Page`] | `getElementById`, `history.pushState` | [`page::MemoryPage`] |
//! | [`fetch::Fetcher`] | `fetch()` | [`fetch::FsFetcher`] |
//!
//! - [`bootstrap`]: read the catalog back out of the data script
//! - [`view`]: list markup grouped by area
//! - [`session`]: the `Idle → Loading → Loaded | Error` state machine
//! - [`location`]: `article` / `lang` query parameters and history snapshots
//! - [`markdown`]: pluggable Markdown-to-HTML conversion

pub mod bootstrap;
pub mod fetch;
pub mod location;
pub mod markdown;
pub mod page;
pub mod session;
pub mod view;

pub use bootstrap::{ClientError, load_script_catalog, parse_script_catalog};
pub use session::{ArticleSession, FetchRequest, SessionState};
