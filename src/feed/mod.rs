//! Format-agnostic feed model.
//!
//! Callers describe their feed once with [`Feed`] and [`Item`], then render
//! it through one of the output formats (currently Atom, see [`crate::atom`]).
//!
//! # Example
//!
//! ```
//! use atomfeed::feed::{Feed, Item, Link};
//!
//! let mut feed = Feed {
//!     title: "Example".to_string(),
//!     link: Link::new("https://example.com/", "alternate"),
//!     ..Default::default()
//! };
//! feed.add(Item {
//!     title: "Hello".to_string(),
//!     link: Link::new("https://example.com/hello", "alternate"),
//!     ..Default::default()
//! });
//!
//! let xml = feed.to_atom().unwrap();
//! assert!(xml.contains("<title>Hello</title>"));
//! ```

mod types;

pub use types::{Author, Feed, Item, Link};
