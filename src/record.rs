//! Parsing of a single corpus line into a [`Record`].
//!
//! A line looks like:
//!
//! ```text
//! (1:1:1:1)	bi	P	PREFIX|bi+
//! ```
//!
//! The parenthesised location is rewritten to a plain `c:v:t:b` field and the
//! line is then split on tabs into location, form, tag and features.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::MalformedRecordError;

static LOCATION_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\(([^()\t]*)\)").unwrap());

/// Header row of the published corpus files.
pub const HEADER_ROW: &str = "LOCATION\tFORM\tTAG\tFEATURES";

/// Four-level address of a morpheme: chapter, verse, token and bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Location {
    pub chapter: u32,
    pub verse: u32,
    pub token: u32,
    pub bit: u32,
}

impl Location {
    pub fn new(chapter: u32, verse: u32, token: u32, bit: u32) -> Self {
        Self {
            chapter,
            verse,
            token,
            bit,
        }
    }

    /// The part of the location that selects open elements; bits are leaves.
    pub fn path(&self) -> HierarchyPath {
        HierarchyPath {
            chapter: self.chapter,
            verse: self.verse,
            token: self.token,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}:{}:{}:{})",
            self.chapter, self.verse, self.token, self.bit
        )
    }
}

/// Indices of the chapter, verse and token elements currently open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct HierarchyPath {
    pub chapter: u32,
    pub verse: u32,
    pub token: u32,
}

/// One morpheme record, as read from one line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub location: Location,
    /// Buckwalter form, possibly containing `+` boundary markers.
    pub form: String,
    pub tag: String,
    /// Raw `|`-delimited feature string.
    pub features: String,
}

impl std::str::FromStr for Record {
    type Err = MalformedRecordError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        parse_line(line)
    }
}

/// Parse one corpus line.
pub fn parse_line(line: &str) -> Result<Record, MalformedRecordError> {
    let (whole, inner) = LOCATION_RE
        .captures(line)
        .and_then(|c| Some((c.get(0)?, c.get(1)?.as_str())))
        .ok_or(MalformedRecordError::MissingLocation)?;

    // `(c:v:t:b)rest` becomes `c:v:t:b` + `rest`; anything glued to the
    // closing paren stays part of the location field.
    let rest = &line[whole.end()..];
    let mut fields = rest.split('\t');
    let head = fields.next().unwrap_or_default();
    let fields: Vec<&str> = fields.collect();

    if fields.len() != 3 {
        return Err(MalformedRecordError::FieldCount(fields.len() + 1));
    }

    let location_field = if head.is_empty() {
        inner.to_string()
    } else {
        format!("{inner}{head}")
    };

    Ok(Record {
        location: parse_location(&location_field)?,
        form: fields[0].to_string(),
        tag: fields[1].to_string(),
        features: fields[2].to_string(),
    })
}

fn parse_location(field: &str) -> Result<Location, MalformedRecordError> {
    const COMPONENTS: [&str; 4] = ["chapter", "verse", "token", "bit"];

    let parts: Vec<&str> = field.split(':').collect();
    if parts.len() != COMPONENTS.len() {
        return Err(MalformedRecordError::LocationArity(parts.len()));
    }

    let mut indices = [0u32; 4];
    for (i, (part, component)) in parts.iter().zip(COMPONENTS).enumerate() {
        // `u32::from_str` accepts a leading `+`, which is not an index.
        if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
            return Err(MalformedRecordError::InvalidIndex {
                component,
                value: part.to_string(),
            });
        }
        indices[i] = part
            .parse()
            .map_err(|_| MalformedRecordError::InvalidIndex {
                component,
                value: part.to_string(),
            })?;
    }

    let [chapter, verse, token, bit] = indices;
    Ok(Location::new(chapter, verse, token, bit))
}

/// Lines that carry no record in the published files: blanks, `#` comments
/// and the column header.
pub fn is_preamble(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.is_empty() || trimmed.starts_with('#') || line == HEADER_ROW
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_record() {
        let record = parse_line("(1:1:1:1)\tbi\tP\tPREFIX|bi+").unwrap();

        assert_eq!(record.location, Location::new(1, 1, 1, 1));
        assert_eq!(record.form, "bi");
        assert_eq!(record.tag, "P");
        assert_eq!(record.features, "PREFIX|bi+");
    }

    #[test]
    fn test_parse_multi_digit_location() {
        let record = parse_line("(114:6:3:2)\tAl\tDET\tPREFIX|Al+").unwrap();
        assert_eq!(record.location, Location::new(114, 6, 3, 2));
        assert_eq!(record.location.path().chapter, 114);
        assert_eq!(record.location.path().token, 3);
    }

    #[test]
    fn test_empty_features_field() {
        let record = parse_line("(1:1:1:1)\tbi\tP\t").unwrap();
        assert_eq!(record.features, "");
    }

    #[test]
    fn test_from_str() {
        let record: Record = "(2:3:4:5)\tw\tCONJ\tPREFIX|w:CONJ+".parse().unwrap();
        assert_eq!(record.location, Location::new(2, 3, 4, 5));
    }

    #[test]
    fn test_missing_location() {
        assert_eq!(
            parse_line("bisim\tN\tPOS:N"),
            Err(MalformedRecordError::MissingLocation)
        );
    }

    #[test]
    fn test_location_not_at_start() {
        assert_eq!(
            parse_line("x(1:1:1:1)\tbi\tP\tPREFIX"),
            Err(MalformedRecordError::MissingLocation)
        );
    }

    #[test]
    fn test_too_few_fields() {
        assert_eq!(
            parse_line("(1:1:1:1)\tbi\tP"),
            Err(MalformedRecordError::FieldCount(3))
        );
    }

    #[test]
    fn test_too_many_fields() {
        assert_eq!(
            parse_line("(1:1:1:1)\tbi\tP\tPREFIX\textra"),
            Err(MalformedRecordError::FieldCount(5))
        );
    }

    #[test]
    fn test_non_numeric_index() {
        assert_eq!(
            parse_line("(1:x:1:1)\tbi\tP\tPREFIX"),
            Err(MalformedRecordError::InvalidIndex {
                component: "verse",
                value: "x".to_string(),
            })
        );
    }

    #[test]
    fn test_text_glued_to_location_is_part_of_it() {
        assert_eq!(
            parse_line("(1:1:1:1)z\tbi\tP\tPREFIX"),
            Err(MalformedRecordError::InvalidIndex {
                component: "bit",
                value: "1z".to_string(),
            })
        );
    }

    #[test]
    fn test_wrong_location_arity() {
        assert_eq!(
            parse_line("(1:1:1)\tbi\tP\tPREFIX"),
            Err(MalformedRecordError::LocationArity(3))
        );
    }

    #[test]
    fn test_index_overflow() {
        let err = parse_line("(99999999999:1:1:1)\tbi\tP\tPREFIX").unwrap_err();
        assert!(matches!(
            err,
            MalformedRecordError::InvalidIndex {
                component: "chapter",
                ..
            }
        ));
    }

    #[test]
    fn test_location_ordering() {
        assert!(Location::new(1, 1, 1, 2) > Location::new(1, 1, 1, 1));
        assert!(Location::new(1, 2, 1, 1) > Location::new(1, 1, 9, 9));
        assert!(Location::new(2, 1, 1, 1) > Location::new(1, 7, 29, 4));
    }

    #[test]
    fn test_location_display() {
        assert_eq!(Location::new(1, 2, 3, 4).to_string(), "(1:2:3:4)");
    }

    #[test]
    fn test_preamble_lines() {
        assert!(is_preamble(""));
        assert!(is_preamble("   "));
        assert!(is_preamble("# Quranic Arabic Corpus (morphology, version 0.4)"));
        assert!(is_preamble(HEADER_ROW));
        assert!(!is_preamble("(1:1:1:1)\tbi\tP\tPREFIX|bi+"));
        assert!(!is_preamble("bisim\tN\tPOS:N"));
    }
}
