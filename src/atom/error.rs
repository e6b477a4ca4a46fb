use thiserror::Error;

/// Errors surfaced by the Atom codec and fetcher.
///
/// Mapping a generic feed never fails; only I/O at the edges does.
#[derive(Debug, Error)]
pub enum AtomError {
    /// Network failure or non-2xx response while fetching a feed.
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Input is not well-formed XML or does not have the Atom element layout.
    #[error("Malformed Atom document: {0}")]
    MalformedDocument(String),

    /// The document could not be written out.
    #[error("Failed to encode Atom document: {0}")]
    Encode(String),
}
