use quick_xml::events::Event;
use quick_xml::se::Serializer;
use quick_xml::Reader;
use serde::Serialize;

use super::document::{AtomFeed, FeedXml};
use super::error::AtomError;

const XML_HEADER: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n";

/// Serializes a feed as an indented Atom 1.0 XML document.
///
/// Accepts anything that can produce the document model: a native
/// [`AtomFeed`] or a generic feed wrapped in [`crate::atom::Atom`].
/// Text is escaped by the writer, so HTML content ends up entity-encoded.
pub fn to_xml<F: FeedXml + ?Sized>(feed: &F) -> Result<String, AtomError> {
    encode(feed, true)
}

/// Same as [`to_xml`] without indentation or line breaks between elements.
pub fn to_xml_compact<F: FeedXml + ?Sized>(feed: &F) -> Result<String, AtomError> {
    encode(feed, false)
}

/// Serializes a feed and writes the resulting document to `writer`.
pub fn write_atom<F, W>(feed: &F, mut writer: W) -> Result<(), AtomError>
where
    F: FeedXml + ?Sized,
    W: std::io::Write,
{
    let xml = to_xml(feed)?;
    writer
        .write_all(xml.as_bytes())
        .map_err(|e| AtomError::Encode(e.to_string()))
}

fn encode<F: FeedXml + ?Sized>(feed: &F, pretty: bool) -> Result<String, AtomError> {
    let doc = feed.feed_xml();
    let mut xml = String::from(XML_HEADER);

    let mut ser = Serializer::new(&mut xml);
    if pretty {
        ser.indent(' ', 2);
    }
    doc.as_ref()
        .serialize(ser)
        .map_err(|e| AtomError::Encode(e.to_string()))?;

    if pretty {
        xml.push('\n');
    }
    Ok(xml)
}

/// Parses an Atom document from XML text.
///
/// Decoding is strict: mismatched or unclosed tags, characters outside the
/// XML 1.0 `Char` range, `<` inside attribute values, unknown entities,
/// content after the root element and a root element other than `<feed>` are
/// all rejected, and no partial document is returned. Unknown elements and
/// attributes are ignored.
///
/// # Security
///
/// quick-xml never parses `<!ENTITY>` declarations, so references to custom
/// entities fail with an unrecognized-entity error instead of expanding.
pub fn parse_atom_feed(content: &str) -> Result<AtomFeed, AtomError> {
    check_document(content)?;

    let feed: AtomFeed =
        quick_xml::de::from_str(content).map_err(|e| AtomError::MalformedDocument(e.to_string()))?;

    tracing::debug!(
        id = %feed.id,
        entries = feed.entries.len(),
        "Parsed Atom feed"
    );
    Ok(feed)
}

/// Parses an Atom document from raw bytes, which must be UTF-8.
pub fn parse_atom_bytes(bytes: &[u8]) -> Result<AtomFeed, AtomError> {
    let content =
        std::str::from_utf8(bytes).map_err(|e| AtomError::MalformedDocument(e.to_string()))?;
    parse_atom_feed(content)
}

fn malformed(msg: impl Into<String>) -> AtomError {
    AtomError::MalformedDocument(msg.into())
}

/// Walks the whole event stream and enforces the well-formedness rules the
/// serde deserializer does not check.
///
/// The deserializer accepts any root name and stops reading once the root
/// element closes, so both are verified here.
fn check_document(content: &str) -> Result<(), AtomError> {
    let mut reader = Reader::from_str(content);
    let mut depth: usize = 0;
    let mut root_closed = false;

    loop {
        let event = reader.read_event().map_err(|e| malformed(e.to_string()))?;
        match event {
            Event::Start(ref e) | Event::Empty(ref e) => {
                if root_closed {
                    return Err(malformed("content after the root element"));
                }
                if depth == 0 && e.local_name().as_ref() != b"feed" {
                    return Err(malformed(format!(
                        "expected root element <feed>, found <{}>",
                        String::from_utf8_lossy(e.local_name().as_ref())
                    )));
                }
                check_attributes(e, &reader)?;

                if matches!(event, Event::Start(_)) {
                    depth += 1;
                } else if depth == 0 {
                    root_closed = true;
                }
            }
            Event::End(_) => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    root_closed = true;
                }
            }
            Event::Text(ref e) => {
                if depth == 0 {
                    if !e.iter().all(u8::is_ascii_whitespace) {
                        return Err(malformed("character data outside the root element"));
                    }
                    continue;
                }
                let text = e.unescape().map_err(|e| malformed(e.to_string()))?;
                check_chars(&text)?;
            }
            Event::CData(ref e) => {
                let text = std::str::from_utf8(e).map_err(|e| malformed(e.to_string()))?;
                check_chars(text)?;
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if depth > 0 {
        return Err(malformed("unexpected end of document, element left unclosed"));
    }
    if !root_closed {
        return Err(malformed("document has no root element"));
    }
    Ok(())
}

fn check_attributes(
    e: &quick_xml::events::BytesStart<'_>,
    reader: &Reader<&[u8]>,
) -> Result<(), AtomError> {
    for attr in e.attributes() {
        let attr = attr.map_err(|e| malformed(e.to_string()))?;
        if attr.value.contains(&b'<') {
            return Err(malformed(format!(
                "'<' in value of attribute '{}'",
                String::from_utf8_lossy(attr.key.as_ref())
            )));
        }
        let value = attr
            .decode_and_unescape_value(reader.decoder())
            .map_err(|e| malformed(e.to_string()))?;
        check_chars(&value)?;
    }
    Ok(())
}

/// Rejects characters outside the XML 1.0 `Char` production.
fn check_chars(text: &str) -> Result<(), AtomError> {
    match text.chars().find(|c| !is_xml_char(*c)) {
        Some(c) => Err(malformed(format!(
            "illegal character U+{:04X} in character data",
            c as u32
        ))),
        None => Ok(()),
    }
}

fn is_xml_char(c: char) -> bool {
    matches!(
        c,
        '\u{9}'
            | '\u{A}'
            | '\u{D}'
            | '\u{20}'..='\u{D7FF}'
            | '\u{E000}'..='\u{FFFD}'
            | '\u{10000}'..='\u{10FFFF}'
    )
}
