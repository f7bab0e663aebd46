//! Script transliteration.
//!
//! The acoustic model expects Roman phonetic input, so Bengali script has to
//! be romanized before inference. The only scheme shipped is Bengali →
//! ISO 15919; other schemes can be plugged in through the
//! [`Transliterator`](crate::Transliterator) trait.

pub mod bengali;

pub use bengali::{romanize, IsoTransliterator};
