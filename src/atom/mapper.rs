use std::borrow::Cow;

use chrono::{DateTime, FixedOffset, SecondsFormat};
use url::Url;
use uuid::Uuid;

use super::document::{
    AtomContent, AtomEntry, AtomFeed, AtomLink, AtomPerson, FeedXml, ATOM_NS,
};
use crate::feed::{Feed, Item};

/// Path used in tag URIs when an item link cannot be parsed as a URL.
const INVALID_PATH: &str = "/invalid.html";

/// Output layouts for feed timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeLayout {
    /// RFC 3339, e.g. `2024-03-01T10:00:00Z`.
    Rfc3339,
    /// Calendar date, `YYYY-MM-DD`.
    Date,
}

impl TimeLayout {
    fn format(self, t: &DateTime<FixedOffset>) -> String {
        match self {
            TimeLayout::Rfc3339 => t.to_rfc3339_opts(SecondsFormat::Secs, true),
            TimeLayout::Date => t.format("%Y-%m-%d").to_string(),
        }
    }
}

/// Formats `primary` if set, else `fallback` if set, else returns an empty string.
///
/// Models "prefer the update time, fall back to the creation time, else unknown".
pub fn any_time_format(
    layout: TimeLayout,
    primary: Option<&DateTime<FixedOffset>>,
    fallback: Option<&DateTime<FixedOffset>>,
) -> String {
    primary
        .or(fallback)
        .map(|t| layout.format(t))
        .unwrap_or_default()
}

/// Returns a fresh random (v4) UUID.
pub fn new_uuid() -> Uuid {
    Uuid::new_v4()
}

/// Builds an `<entry>` from a generic item.
///
/// The item id is used verbatim when present. Otherwise a `tag:` URI is
/// derived from the link and timestamps, or a `urn:uuid:` when either is missing.
pub fn new_atom_entry(item: &Item) -> AtomEntry {
    let id = if item.id.is_empty() {
        derive_entry_id(item)
    } else {
        item.id.clone()
    };

    // Author URI has no counterpart on a generic item.
    let author = item
        .author
        .as_ref()
        .filter(|a| !a.name.is_empty() || !a.email.is_empty())
        .map(|a| AtomPerson::new(a.name.as_str(), a.email.as_str()));

    AtomEntry {
        title: item.title.clone(),
        links: vec![AtomLink {
            href: item.link.href.clone(),
            rel: item.link.rel.clone(),
        }],
        // Description is assumed to already be HTML markup.
        content: Some(AtomContent {
            content_type: "html".to_string(),
            content: item.description.clone(),
        }),
        id,
        updated: any_time_format(
            TimeLayout::Rfc3339,
            item.updated.as_ref(),
            item.created.as_ref(),
        ),
        author,
        ..Default::default()
    }
}

fn derive_entry_id(item: &Item) -> String {
    let has_time = item.updated.is_some() || item.created.is_some();
    if item.link.href.is_empty() || !has_time {
        return format!("urn:uuid:{}", new_uuid());
    }

    let date = any_time_format(
        TimeLayout::Date,
        item.updated.as_ref(),
        item.created.as_ref(),
    );
    let (host, path) = split_link(&item.link.href).unwrap_or_else(|| {
        tracing::debug!(href = %item.link.href, "Item link does not parse, using it as tag authority");
        (item.link.href.clone(), INVALID_PATH.to_string())
    });
    format!("tag:{},{}:{}", host, date, path)
}

/// Splits an item link into the authority and decoded path of a tag URI.
///
/// Relative references have an empty authority and keep everything before
/// the query or fragment as path. Returns `None` for links that do not parse,
/// including malformed percent escapes.
fn split_link(href: &str) -> Option<(String, String)> {
    let reference = href
        .split(|c: char| c == '?' || c == '#')
        .next()
        .unwrap_or_default();
    if !has_valid_escapes(reference) {
        return None;
    }

    let url = match Url::parse(href) {
        Err(url::ParseError::RelativeUrlWithoutBase) if reference.starts_with("//") => {
            Url::parse(&format!("http:{}", href)).ok()?
        }
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            return Some((String::new(), decode_path(reference)?));
        }
        other => other.ok()?,
    };

    // Opaque links such as `mailto:` have no hierarchical path
    let path = if url.cannot_be_a_base() { "" } else { url.path() };
    Some((raw_authority(&url, href).to_string(), decode_path(path)?))
}

/// Authority as written in the link, so an explicit default port survives.
/// Userinfo is dropped.
fn raw_authority<'a>(url: &Url, href: &'a str) -> &'a str {
    if url.host_str().is_none() {
        return "";
    }
    let Some((_, rest)) = href.split_once("//") else {
        return "";
    };
    let end = rest
        .find(|c: char| matches!(c, '/' | '?' | '#'))
        .unwrap_or(rest.len());
    let authority = &rest[..end];
    authority
        .rsplit_once('@')
        .map_or(authority, |(_, host)| host)
}

fn has_valid_escapes(s: &str) -> bool {
    let bytes = s.as_bytes();
    bytes
        .iter()
        .enumerate()
        .filter(|(_, b)| **b == b'%')
        .all(|(i, _)| {
            bytes
                .get(i + 1..i + 3)
                .is_some_and(|hex| hex.iter().all(u8::is_ascii_hexdigit))
        })
}

fn decode_path(path: &str) -> Option<String> {
    urlencoding::decode(path).ok().map(Cow::into_owned)
}

/// Atom view of a generic [`Feed`].
#[derive(Debug, Clone, Copy)]
pub struct Atom<'a> {
    feed: &'a Feed,
}

impl<'a> Atom<'a> {
    pub fn new(feed: &'a Feed) -> Self {
        Self { feed }
    }

    /// Maps the wrapped feed into a new Atom document.
    ///
    /// Never fails: missing data falls back to empty strings, generated ids
    /// and an author element with empty fields.
    pub fn atom_feed(&self) -> AtomFeed {
        let feed = self.feed;
        let author = feed
            .author
            .as_ref()
            .map(|a| AtomPerson::new(a.name.as_str(), a.email.as_str()))
            .unwrap_or_default();

        AtomFeed {
            xmlns: ATOM_NS.to_string(),
            title: feed.title.clone(),
            links: vec![AtomLink {
                href: feed.link.href.clone(),
                rel: feed.link.rel.clone(),
            }],
            subtitle: feed.description.clone(),
            id: feed.link.href.clone(),
            updated: any_time_format(
                TimeLayout::Rfc3339,
                feed.updated.as_ref(),
                feed.created.as_ref(),
            ),
            rights: feed.copyright.clone(),
            author: Some(author),
            entries: feed.items.iter().map(new_atom_entry).collect(),
            ..Default::default()
        }
    }
}

impl FeedXml for Atom<'_> {
    fn feed_xml(&self) -> Cow<'_, AtomFeed> {
        Cow::Owned(self.atom_feed())
    }
}
