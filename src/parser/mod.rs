//! Parser Module
//!
//! Line-oriented classifier for count files.
//!
//! ## Responsibilities
//! - Strip trailing comments (unescaped marker to end of line)
//! - Recognize block headers and count entries
//! - Flag everything else as ignorable or unrecognized
//!
//! ## Grammar
//! ```text
//! line        := (header | entry | blank) comment?
//! header      := ws* "block" ws* ":" ws* word ws*
//! entry       := ws* word ws* ":" ws* digit+ ws*
//! comment     := marker any*          (marker not preceded by '\')
//! word        := [A-Za-z0-9_]+
//! ```
//!
//! Headers are matched before entries, so `block: 5` opens a block named
//! `5` rather than recording five devices called `block`.

mod classifier;

pub use classifier::{strip_comment, LineClassifier};

/// Classification of a single input line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Line<'a> {
    /// Empty or whitespace-only after comment stripping
    Ignorable,

    /// `block: <name>`
    BlockHeader { name: &'a str },

    /// `<device>: <count>`, count kept as its decimal text
    Entry { device: &'a str, count: &'a str },

    /// Anything else
    Unrecognized,
}
