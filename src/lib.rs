//! Atom 1.0 feed generation and parsing.
//!
//! - [`feed`] holds the format-agnostic feed model callers build
//! - [`atom`] maps that model to Atom, encodes/decodes XML and fetches documents
//! - [`config`] configures the HTTP transport used by the `atomfeed` binary

pub mod atom;
pub mod config;
pub mod feed;
