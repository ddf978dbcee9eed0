//! G-code Lexer
//!
//! Fast, simple tokenization of a single normalized line.
//! Focus: split the line into words and comments without allocating.

/// Token types in G-code
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TokenKind {
    /// Code word like "G1", "M104", "T0"
    Code,
    /// Parameter word like "X10", "E-0.8"
    Parameter,
    /// Comment (semicolon or parenthetical)
    Comment,
}

/// A token borrowing its text from the line
#[derive(Debug, Clone, PartialEq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
}

/// Tokenize a line of G-code into tokens
///
/// A word is a letter followed by any run of digits, dots and signs, so
/// words do not need whitespace between them (`G1X10Y5` is three words).
pub fn tokenize_line(line: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut chars = line.char_indices().peekable();

    while let Some((start_idx, ch)) = chars.next() {
        match ch {
            // Skip whitespace
            ' ' | '\t' | '\r' | '\n' => continue,

            // Semicolon comment: consume rest of line
            ';' => {
                tokens.push(Token {
                    kind: TokenKind::Comment,
                    text: &line[start_idx..],
                });
                break;
            }

            // Parenthetical comment, unterminated ones run to end of line
            '(' => {
                let mut end_idx = line.len();

                for (idx, ch) in chars.by_ref() {
                    if ch == ')' {
                        end_idx = idx + 1;
                        break;
                    }
                }

                tokens.push(Token {
                    kind: TokenKind::Comment,
                    text: &line[start_idx..end_idx],
                });
            }

            // Letter starts a code or parameter word
            c if c.is_ascii_alphabetic() => {
                let mut end_idx = start_idx + 1;

                while let Some(&(idx, next_ch)) = chars.peek() {
                    if next_ch.is_ascii_digit() || matches!(next_ch, '.' | '-' | '+') {
                        end_idx = idx + 1;
                        chars.next();
                    } else {
                        break;
                    }
                }

                let text = &line[start_idx..end_idx];
                let kind = if is_code(text) {
                    TokenKind::Code
                } else {
                    TokenKind::Parameter
                };

                tokens.push(Token { kind, text });
            }

            // Skip other characters (malformed input)
            _ => continue,
        }
    }

    tokens
}

/// G/M/T words are codes, everything else is a parameter.
fn is_code(text: &str) -> bool {
    text.chars()
        .next()
        .is_some_and(|c| matches!(c.to_ascii_uppercase(), 'G' | 'M' | 'T'))
}
