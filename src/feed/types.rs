use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::atom::{self, AtomError};

/// A hyperlink attached to a feed or item.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Link {
    pub href: String,
    /// Link relation, e.g. `alternate` or `self`. Empty when unspecified.
    pub rel: String,
}

impl Link {
    pub fn new(href: impl Into<String>, rel: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            rel: rel.into(),
        }
    }
}

/// Author of a feed or item.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Author {
    pub name: String,
    pub email: String,
}

/// A single item of a generic feed.
///
/// `created` and `updated` are optional; `None` means the instant is unknown.
/// The description is treated as HTML markup when mapped to Atom.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Item {
    /// Stable identifier. Empty lets the mapper derive one.
    pub id: String,
    pub title: String,
    pub description: String,
    pub link: Link,
    pub author: Option<Author>,
    pub created: Option<DateTime<FixedOffset>>,
    pub updated: Option<DateTime<FixedOffset>>,
}

/// Format-agnostic feed, the input side of the Atom mapping.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Feed {
    pub title: String,
    pub description: String,
    pub link: Link,
    pub author: Option<Author>,
    pub copyright: String,
    pub created: Option<DateTime<FixedOffset>>,
    pub updated: Option<DateTime<FixedOffset>>,
    pub items: Vec<Item>,
}

impl Feed {
    /// Appends an item after the existing ones.
    pub fn add(&mut self, item: Item) {
        self.items.push(item);
    }

    /// Renders the feed as an Atom 1.0 XML document.
    pub fn to_atom(&self) -> Result<String, AtomError> {
        atom::to_xml(&atom::Atom::new(self))
    }

    /// Writes the feed as an Atom 1.0 XML document to `writer`.
    pub fn write_atom<W: std::io::Write>(&self, writer: W) -> Result<(), AtomError> {
        atom::write_atom(&atom::Atom::new(self), writer)
    }
}
