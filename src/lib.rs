//! Conversion of the flat Quranic Arabic Corpus morphology file into nested
//! `corpus > chapter > verse > token > bit` markup.
//!
//! ```
//! use corpus_xml::{convert_str, ConvertOptions};
//!
//! let xml = convert_str("(1:1:1:1)\tbi\tP\tPREFIX|bi+", &ConvertOptions::default()).unwrap();
//! assert!(xml.contains(r#"<bit tag="P" PREFIX="" bi="">"#));
//! ```

pub mod convert;
pub mod emitter;
pub mod error;
pub mod features;
pub mod options;
pub mod record;
pub mod transliterate;
pub mod writer;

pub use convert::{ConvertStats, convert, convert_blocking, convert_str};
pub use emitter::{ElementKind, Emitter, Transition};
pub use error::{Error, MalformedRecordError, Result};
pub use features::{Attribute, parse_features};
pub use options::{ConvertOptions, EscapeMode, OrderPolicy};
pub use record::{HierarchyPath, Location, Record, parse_line};
pub use transliterate::{Buckwalter, CharTable, transliterate};

/// Destination used when none is given on the command line.
pub const DEFAULT_DESTINATION: &str = "./corpus.xml";
