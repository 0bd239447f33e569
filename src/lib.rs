//! Parse delimited key/value option lists and track nested contexts.
//!
//! [`parse_str`] turns `foo="a b" bar=baz` into an ordered mapping; the
//! separators are configurable through [`ParseConfig`], with [`Preset::Css`]
//! covering `foo:bar;bar:baz;` declarations.
//!
//! [`MappedStack`] is a LIFO stack of keyed entries whose
//! [`pop_matching`](MappedStack::pop_matching) only removes the top entry
//! when its key matches, which is what a nested-block interpreter needs to
//! check that blocks close in order.
//!
//! Diagnostics are emitted through the [`log`] facade; no logger is
//! installed by this crate.

mod error;
mod model;
mod parser;
mod stack;

pub use error::Error;
pub use model::{ParseConfig, ParsedOptions, Preset, separator};
pub use parser::{
    parse_bytes, parse_bytes_with_config, parse_css, parse_reader, parse_reader_with_config,
    parse_str, parse_str_with_config,
};
pub use stack::{MappedStack, StackEntry};
