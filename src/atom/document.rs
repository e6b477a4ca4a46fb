use std::borrow::Cow;

use serde::{Deserialize, Deserializer, Serialize};

/// Namespace of Atom 1.0 documents.
pub const ATOM_NS: &str = "http://www.w3.org/2005/Atom";

/// Name, URI and email shared by `<author>` and `<contributor>`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AtomPerson {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub uri: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub email: String,
}

impl AtomPerson {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            uri: String::new(),
            email: email.into(),
        }
    }
}

/// Text body of an entry, `type` is one of `text`, `html` or `xhtml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AtomContent {
    #[serde(rename = "@type", default)]
    pub content_type: String,
    #[serde(rename = "$text", default)]
    pub content: String,
}

/// Short summary of an entry. Same shape as [`AtomContent`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AtomSummary {
    #[serde(rename = "@type", default)]
    pub content_type: String,
    #[serde(rename = "$text", default)]
    pub content: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AtomLink {
    #[serde(rename = "@href")]
    pub href: String,
    #[serde(rename = "@rel", default, skip_serializing_if = "String::is_empty")]
    pub rel: String,
}

/// A single `<entry>`.
///
/// Fields are declared in the order they are written out. `title`, `updated`
/// and `id` are always emitted; everything else is omitted when empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename = "entry")]
pub struct AtomEntry {
    pub title: String,
    pub updated: String,
    pub id: String,
    #[serde(
        default,
        deserialize_with = "last_text",
        skip_serializing_if = "String::is_empty"
    )]
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<AtomContent>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub rights: String,
    #[serde(
        default,
        deserialize_with = "last_text",
        skip_serializing_if = "String::is_empty"
    )]
    pub source: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub published: String,
    #[serde(
        default,
        deserialize_with = "last_person",
        skip_serializing_if = "Option::is_none"
    )]
    pub contributor: Option<AtomPerson>,
    /// Required when the entry has no inline content.
    #[serde(rename = "link", default, skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<AtomLink>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<AtomSummary>,
    /// Required only when the parent feed has no author.
    #[serde(
        default,
        deserialize_with = "last_person",
        skip_serializing_if = "Option::is_none"
    )]
    pub author: Option<AtomPerson>,
}

impl AtomEntry {
    /// Returns the href of the first link with relation `rel`.
    pub fn link(&self, rel: &str) -> Option<&str> {
        find_link(&self.links, rel)
    }
}

/// Root `<feed>` element of an Atom document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename = "feed")]
pub struct AtomFeed {
    #[serde(rename = "@xmlns", default)]
    pub xmlns: String,
    pub title: String,
    pub id: String,
    pub updated: String,
    #[serde(
        default,
        deserialize_with = "last_text",
        skip_serializing_if = "String::is_empty"
    )]
    pub category: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub icon: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub logo: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub rights: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub subtitle: String,
    #[serde(rename = "link", default, skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<AtomLink>,
    /// Always present on mapped feeds, possibly with every field empty.
    #[serde(
        default,
        deserialize_with = "last_person",
        skip_serializing_if = "Option::is_none"
    )]
    pub author: Option<AtomPerson>,
    #[serde(
        default,
        deserialize_with = "last_person",
        skip_serializing_if = "Option::is_none"
    )]
    pub contributor: Option<AtomPerson>,
    #[serde(rename = "entry", default, skip_serializing_if = "Vec::is_empty")]
    pub entries: Vec<AtomEntry>,
}

impl AtomFeed {
    /// Returns the href of the first link with relation `rel`.
    pub fn link(&self, rel: &str) -> Option<&str> {
        find_link(&self.links, rel)
    }
}

/// Character data of an element; attributes and child elements are skipped.
#[derive(Deserialize)]
struct TextElement {
    #[serde(rename = "$text", default)]
    text: String,
}

// Repeated single-valued elements keep the last occurrence.
fn last_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let elements = Vec::<TextElement>::deserialize(deserializer)?;
    Ok(elements.into_iter().last().map(|e| e.text).unwrap_or_default())
}

fn last_person<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<AtomPerson>, D::Error> {
    let mut people = Vec::<AtomPerson>::deserialize(deserializer)?;
    Ok(people.pop())
}

fn find_link<'a>(links: &'a [AtomLink], rel: &str) -> Option<&'a str> {
    links
        .iter()
        .find(|link| link.rel == rel)
        .map(|link| link.href.as_str())
}

/// Conversion into the document model that the XML codec writes.
///
/// Implemented by the native [`AtomFeed`], which hands out itself, and by the
/// generic-feed wrapper [`crate::atom::Atom`], which builds a fresh document.
pub trait FeedXml {
    fn feed_xml(&self) -> Cow<'_, AtomFeed>;
}

impl FeedXml for AtomFeed {
    fn feed_xml(&self) -> Cow<'_, AtomFeed> {
        Cow::Borrowed(self)
    }
}
