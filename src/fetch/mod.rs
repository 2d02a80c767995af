//! Data acquisition from paginated JSON APIs
//!
//! Two pagination protocols are supported:
//!
//! - **Link pagination** - each response body carries, under a caller-named
//!   key, the URL of the next page; an absent or null link terminates.
//! - **Year-scoped fetch** - the request URL embeds a 4-digit year; the
//!   caller supplies an inclusive year range and each year is fetched by
//!   substituting the embedded token, restarting from page one every time.
//!
//! Pages are walked strictly in order because page N's URL is unknown until
//! page N-1 has been read. All transport is blocking.

mod client;
mod error;
mod pages;

pub use client::{HttpFetcher, PageSource};
pub use error::FetchError;
pub use pages::{PaginationState, YearRange, fetch_all, fetch_year_scoped};
