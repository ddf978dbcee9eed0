//! Tokenized line types
//!
//! Clean, minimal types representing one interpreted line.
//! No machine state or classification concerns - pure data representation.

use crate::parser::lexer::{Token, TokenKind};

/// Parameter letters the interpreter cares about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Letter {
    X,
    Y,
    Z,
    E,
    S,
}

impl Letter {
    pub const ALL: [Letter; 5] = [Letter::X, Letter::Y, Letter::Z, Letter::E, Letter::S];

    /// The three positional axes, in description order
    pub const AXES: [Letter; 3] = [Letter::X, Letter::Y, Letter::Z];

    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'X' => Some(Letter::X),
            'Y' => Some(Letter::Y),
            'Z' => Some(Letter::Z),
            'E' => Some(Letter::E),
            'S' => Some(Letter::S),
            _ => None,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Letter::X => 'X',
            Letter::Y => 'Y',
            Letter::Z => 'Z',
            Letter::E => 'E',
            Letter::S => 'S',
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// A parameter value: the text as written plus its parsed number
#[derive(Debug, Clone, PartialEq)]
pub struct ParamValue {
    pub raw: String,
    pub value: f64,
}

/// Per-letter parameter values, present only for letters that appeared
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Parameters {
    values: [Option<ParamValue>; 5],
}

impl Parameters {
    /// Numeric value of a letter, if present
    pub fn get(&self, letter: Letter) -> Option<f64> {
        self.values[letter.index()].as_ref().map(|v| v.value)
    }

    /// Value text exactly as it appeared on the line
    pub fn raw(&self, letter: Letter) -> Option<&str> {
        self.values[letter.index()].as_ref().map(|v| v.raw.as_str())
    }

    pub fn contains(&self, letter: Letter) -> bool {
        self.values[letter.index()].is_some()
    }

    /// Present letters in X, Y, Z, E, S order
    pub fn letters(&self) -> impl Iterator<Item = Letter> + '_ {
        Letter::ALL.into_iter().filter(|l| self.contains(*l))
    }

    pub fn is_empty(&self) -> bool {
        self.values.iter().all(Option::is_none)
    }

    /// The first valid occurrence of a letter wins.
    fn insert_if_absent(&mut self, letter: Letter, raw: &str, value: f64) {
        let slot = &mut self.values[letter.index()];
        if slot.is_none() {
            *slot = Some(ParamValue {
                raw: raw.to_string(),
                value,
            });
        }
    }
}

/// One instruction line after normalization and tokenization
#[derive(Debug, Clone, PartialEq)]
pub struct TokenizedLine {
    /// Uppercased, trimmed source text
    pub text: String,
    /// Normalized code words in line order (e.g., "G1", "M104")
    pub codes: Vec<String>,
    /// X/Y/Z/E/S values present on the line
    pub params: Parameters,
}

impl TokenizedLine {
    pub fn has_code(&self, code: &str) -> bool {
        self.codes.iter().any(|c| c == code)
    }

    pub fn has_any_code(&self, codes: &[&str]) -> bool {
        codes.iter().any(|code| self.has_code(code))
    }
}

/// Result of tokenizing one raw line
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedLine {
    /// Blank or `;` comment line, never seen by the interpreters
    Skip,
    Instruction(TokenizedLine),
}

/// Build a tokenized line from the normalized text and its tokens
pub fn tokens_to_line(text: &str, tokens: &[Token<'_>]) -> TokenizedLine {
    let mut codes = Vec::new();
    let mut params = Parameters::default();

    for token in tokens {
        match token.kind {
            TokenKind::Code => {
                if let Some(code) = normalize_code(token.text) {
                    codes.push(code);
                }
            }
            TokenKind::Parameter => {
                let mut chars = token.text.chars();
                let Some(letter) = chars.next().and_then(Letter::from_char) else {
                    continue;
                };
                let raw = chars.as_str();
                if let Some(value) = scan_number(raw) {
                    params.insert_if_absent(letter, raw, value);
                }
            }
            TokenKind::Comment => {}
        }
    }

    TokenizedLine {
        text: text.to_string(),
        codes,
        params,
    }
}

/// Scan a parameter's numeric text
///
/// Accepts an optional sign followed by digits with at most one decimal
/// point and at least one digit. Exponents, `inf`, `nan` and stray
/// characters are rejected.
pub fn scan_number(text: &str) -> Option<f64> {
    let unsigned = text.strip_prefix(['+', '-']).unwrap_or(text);

    let mut seen_digit = false;
    let mut seen_point = false;
    for ch in unsigned.chars() {
        match ch {
            '0'..='9' => seen_digit = true,
            '.' if !seen_point => seen_point = true,
            _ => return None,
        }
    }

    if !seen_digit {
        return None;
    }

    text.parse::<f64>().ok()
}

/// Normalize a code word: uppercase letter, number without leading zeros
///
/// "G01" becomes "G1", "G28.1" stays as is. A code without a valid unsigned
/// number is dropped.
fn normalize_code(text: &str) -> Option<String> {
    let mut chars = text.chars();
    let letter = chars.next()?.to_ascii_uppercase();
    let number = chars.as_str();

    let (major, minor) = match number.split_once('.') {
        Some((major, minor)) => (major, Some(minor)),
        None => (number, None),
    };

    if major.is_empty() || !major.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    if let Some(minor) = minor
        && (minor.is_empty() || !minor.chars().all(|c| c.is_ascii_digit()))
    {
        return None;
    }

    let major = match major.trim_start_matches('0') {
        "" => "0",
        trimmed => trimmed,
    };

    Some(match minor {
        Some(minor) => format!("{letter}{major}.{minor}"),
        None => format!("{letter}{major}"),
    })
}
