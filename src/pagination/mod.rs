//! Pagination module
//!
//! Cursor-following extraction over Okta's `Link` header pagination.
//!
//! # Overview
//!
//! - `link` - pulls the `rel="next"` URL out of a `Link` header
//! - `params` - assembles the query parameters for each page request
//! - `driver` - the fetch / emit / advance loop with loop detection
//! - `source` - the HTTP implementation of the `PageSource` seam

mod driver;
mod link;
mod params;
mod source;

pub use driver::{Advance, DriverState, PageResult, PageSource, PaginationDriver, RecordStream};
pub use link::{next_cursor_from_headers, parse_links, parse_next_cursor, Link, NEXT_REL};
pub use params::{
    Cursor, RequestDescriptor, RequestParameterAssembler, AFTER_PARAM, DEFAULT_PAGE_SIZE,
    FORMAT_PARAM, LIMIT_PARAM, ORDER_BY_PARAM, PAGE_PARAM, SORT_PARAM,
};
pub use source::HttpPageSource;
