//! G-code Parser
//!
//! Line normalization, tokenization and per-letter parameter extraction.
//! Nothing here knows about machine state.

pub mod ast;
pub mod lexer;

pub use ast::{Letter, ParamValue, Parameters, ParsedLine, TokenizedLine, scan_number};
pub use lexer::{Token, TokenKind, tokenize_line};

/// Parse a single raw line of G-code
///
/// Blank lines and lines starting with `;` are skipped. Everything else is
/// uppercased, trimmed and tokenized.
pub fn parse_line(line: &str) -> ParsedLine {
    let normalized = line.to_uppercase();
    let normalized = normalized.trim();

    if normalized.is_empty() || normalized.starts_with(';') {
        return ParsedLine::Skip;
    }

    let tokens = lexer::tokenize_line(normalized);
    ParsedLine::Instruction(ast::tokens_to_line(normalized, &tokens))
}
