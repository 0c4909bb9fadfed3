//! Link header parsing (RFC 8288)
//!
//! Okta paginates with `Link: <url>; rel="self", <url>; rel="next"`.

use super::params::Cursor;
use crate::error::{Error, Result};
use reqwest::header::{HeaderMap, LINK};

/// Rel value identifying the next page
pub const NEXT_REL: &str = "next";

/// Extract the next-page cursor from a Link header value.
///
/// An absent or blank header means there are no further pages. If several
/// entries claim `rel="next"`, the last one wins.
pub fn parse_next_cursor(header: Option<&str>) -> Result<Option<Cursor>> {
    let Some(header) = header.map(str::trim).filter(|h| !h.is_empty()) else {
        return Ok(None);
    };

    let links = parse_links(header)?;
    let next = links
        .into_iter()
        .rev()
        .find(|link| link.has_rel(NEXT_REL))
        .map(|link| Cursor::new(link.url));

    Ok(next)
}

/// Extract the next-page cursor from response headers.
///
/// Multiple `Link` headers are treated as one comma-separated list.
pub fn next_cursor_from_headers(headers: &HeaderMap) -> Result<Option<Cursor>> {
    let mut values = Vec::new();
    for value in headers.get_all(LINK) {
        let value = value.to_str().map_err(|e| {
            Error::header_parse(String::from_utf8_lossy(value.as_bytes()), e.to_string())
        })?;
        values.push(value);
    }

    if values.is_empty() {
        return Ok(None);
    }
    parse_next_cursor(Some(&values.join(", ")))
}

/// A single `<url>; param=value` entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    /// Target URL
    pub url: String,
    /// Relation types (a `rel` may list several, space separated)
    pub rels: Vec<String>,
}

impl Link {
    /// Check whether this link carries the given relation type
    pub fn has_rel(&self, rel: &str) -> bool {
        self.rels.iter().any(|r| r.eq_ignore_ascii_case(rel))
    }
}

/// Split a Link header into its entries.
///
/// Entries are located by their `<...>` segments rather than by splitting on
/// commas, so commas inside a URL are harmless.
pub fn parse_links(header: &str) -> Result<Vec<Link>> {
    let mut links = Vec::new();
    let mut rest = header;

    while let Some(open) = rest.find('<') {
        let after_open = &rest[open + 1..];
        let Some(close) = after_open.find('>') else {
            break;
        };

        let url = after_open[..close].trim();
        let tail = &after_open[close + 1..];
        let params_end = tail.find('<').unwrap_or(tail.len());
        let params = &tail[..params_end];
        rest = &tail[params_end..];

        if url.is_empty() {
            continue;
        }

        links.push(Link {
            url: url.to_string(),
            rels: parse_rels(params),
        });
    }

    if links.is_empty() {
        return Err(Error::header_parse(header, "no usable <url> segment"));
    }
    Ok(links)
}

fn parse_rels(params: &str) -> Vec<String> {
    params
        .split([';', ','])
        .filter_map(|segment| {
            let (name, value) = segment.split_once('=')?;
            if !name.trim().eq_ignore_ascii_case("rel") {
                return None;
            }
            Some(value.trim().trim_matches('"').trim_matches('\''))
        })
        .flat_map(str::split_whitespace)
        .map(ToString::to_string)
        .collect()
}
