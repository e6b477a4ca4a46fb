//! Atom 1.0 (RFC 4287) support.
//!
//! - **Document model**: typed tree mirroring the Atom schema ([`AtomFeed`], [`AtomEntry`], ...)
//! - **Mapping**: derive a document from a generic [`crate::feed::Feed`] via [`Atom`]
//! - **Codec**: strict XML encode/decode built on quick-xml's serde support
//! - **Fetching**: download a document over HTTP
//!
//! # Example
//!
//! ```
//! use atomfeed::atom::{parse_atom_feed, to_xml, Atom};
//! use atomfeed::feed::{Feed, Link};
//!
//! let feed = Feed {
//!     title: "Example".to_string(),
//!     link: Link::new("https://example.com/", "alternate"),
//!     ..Default::default()
//! };
//!
//! let xml = to_xml(&Atom::new(&feed)).unwrap();
//! let parsed = parse_atom_feed(&xml).unwrap();
//! assert_eq!(parsed.id, "https://example.com/");
//! assert_eq!(parsed.link("alternate"), Some("https://example.com/"));
//! ```

mod codec;
mod document;
mod error;
mod fetcher;
mod mapper;

pub use codec::{parse_atom_bytes, parse_atom_feed, to_xml, to_xml_compact, write_atom};
pub use document::{
    AtomContent, AtomEntry, AtomFeed, AtomLink, AtomPerson, AtomSummary, FeedXml, ATOM_NS,
};
pub use error::AtomError;
pub use fetcher::download_atom_feed;
pub use mapper::{any_time_format, new_atom_entry, new_uuid, Atom, TimeLayout};
