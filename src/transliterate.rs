//! Buckwalter to Arabic transliteration.
//!
//! Mapping is strictly per character: no context, no multi-character
//! sequences. Characters missing from the table are copied through and the
//! morpheme boundary marker `+` is dropped.

/// Morpheme boundary marker inside Buckwalter forms.
pub const BOUNDARY: char = '+';

/// Feature keys whose values are Buckwalter text rather than grammar codes.
pub const TRANSLITERATED_KEYS: &[&str] = &["LEM", "ROOT", "SP"];

/// A static single-character lookup table.
pub trait CharTable {
    /// The mapped character for `c`, or `None` when `c` has no mapping.
    fn lookup(&self, c: char) -> Option<char>;
}

/// Extended Buckwalter table as used by the Quranic Arabic Corpus, including
/// the Quranic annotation marks.
#[derive(Debug, Clone, Copy, Default)]
pub struct Buckwalter;

impl CharTable for Buckwalter {
    fn lookup(&self, c: char) -> Option<char> {
        let cp = match c {
            '\'' => 0x0621,
            '|' => 0x0622,
            '>' => 0x0623,
            '&' => 0x0624,
            '<' => 0x0625,
            '}' => 0x0626,
            'A' => 0x0627,
            'b' => 0x0628,
            'p' => 0x0629,
            't' => 0x062A,
            'v' => 0x062B,
            'j' => 0x062C,
            'H' => 0x062D,
            'x' => 0x062E,
            'd' => 0x062F,
            '*' => 0x0630,
            'r' => 0x0631,
            'z' => 0x0632,
            's' => 0x0633,
            '$' => 0x0634,
            'S' => 0x0635,
            'D' => 0x0636,
            'T' => 0x0637,
            'Z' => 0x0638,
            'E' => 0x0639,
            'g' => 0x063A,
            '_' => 0x0640,
            'f' => 0x0641,
            'q' => 0x0642,
            'k' => 0x0643,
            'l' => 0x0644,
            'm' => 0x0645,
            'n' => 0x0646,
            'h' => 0x0647,
            'w' => 0x0648,
            'Y' => 0x0649,
            'y' => 0x064A,
            'F' => 0x064B,
            'N' => 0x064C,
            'K' => 0x064D,
            'a' => 0x064E,
            'u' => 0x064F,
            'i' => 0x0650,
            '~' => 0x0651,
            'o' => 0x0652,
            '^' => 0x0653,
            '#' => 0x0654,
            '`' => 0x0670,
            '{' => 0x0671,
            ':' => 0x06DC,
            '@' => 0x06DF,
            '"' => 0x06E0,
            '[' => 0x06E2,
            ';' => 0x06E3,
            ',' => 0x06E5,
            '.' => 0x06E6,
            '!' => 0x06E8,
            '-' => 0x06EA,
            '%' => 0x06EC,
            ']' => 0x06ED,
            _ => return None,
        };
        char::from_u32(cp)
    }
}

/// Transliterate `input` through an arbitrary table.
pub fn transliterate_with<T: CharTable + ?Sized>(table: &T, input: &str) -> String {
    let mut out = String::with_capacity(input.len() * 2);
    for c in input.chars() {
        if c == BOUNDARY {
            continue;
        }
        out.push(table.lookup(c).unwrap_or(c));
    }
    out
}

/// Transliterate a Buckwalter string to Arabic script.
pub fn transliterate(input: &str) -> String {
    transliterate_with(&Buckwalter, input)
}

/// Whether values of the feature `key` hold Buckwalter text.
pub fn is_transliterated_key(key: &str) -> bool {
    TRANSLITERATED_KEYS.contains(&key)
}
