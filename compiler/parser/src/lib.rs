//! The syntactic analyzer (parser).
//!
//! A handwritten top-down recursive-descent parser over the scanner's token
//! stream. Each buffer is drained into a token vector before parsing, so
//! lookahead is unbounded. Syntax errors are reported to the session and
//! recovered from by resynchronizing on statement- and declaration-level
//! token sets; the parser always produces a (possibly partial) tree.
//!
//! # Grammar Notation
//!
//! Grammar snippets in doc comments use an EBNF flavor: `"…"` is a lexed
//! terminal by text, `#T` a terminal by name, `A?`/`A*` option and
//! repetition, and `⟪unparsed⟫` marks token soup this front end skips
//! without interpreting.

use base::Parser;
use diagnostics::{Code, Diagnostic};
use lexer::{
    token::{Token, TokenKind},
    Scanner,
};
use session::Compiler;
use span::SourceMap;
use std::fmt;

mod base;
mod decl;

#[cfg(test)]
mod test;

/// Parse every buffer of the map into a list of source files.
pub fn parse_program(map: &SourceMap, compiler: &Compiler) -> Vec<ast::SourceFile> {
    let mut scanner = Scanner::new(map, compiler);
    let mut files = Vec::new();
    while let Some(file) = parse_next_file(&mut scanner, map, compiler) {
        files.push(file);
    }
    files
}

/// Parse a single buffer from the given scanner. `None` once all buffers
/// are consumed.
pub fn parse_one(
    scanner: &mut Scanner<'_>,
    map: &SourceMap,
    compiler: &Compiler,
) -> Option<ast::SourceFile> {
    parse_next_file(scanner, map, compiler)
}

fn parse_next_file(
    scanner: &mut Scanner<'_>,
    map: &SourceMap,
    compiler: &Compiler,
) -> Option<ast::SourceFile> {
    let tokens = scanner.scan_file()?;
    let file = tokens.last().expect("scan_file yields at least an end-of-file token").file
        .expect("end-of-file tokens carry their buffer");
    let name = map[file].name().clone();
    let tokens = strip_doc_comments(tokens, &name, compiler);

    let mut parser = Parser::new(tokens, file, name, compiler);
    Some(parser.parse_source_file())
}

/// Remove documentation lines from the stream, warning about runs that are
/// not followed by anything documentable.
fn strip_doc_comments(
    tokens: Vec<Token>,
    name: &std::rc::Rc<str>,
    compiler: &Compiler,
) -> Vec<Token> {
    let mut stripped = Vec::with_capacity(tokens.len());
    let mut pending: Option<span::Span> = None;

    for token in tokens {
        if token.kind == TokenKind::XmlCommentLine {
            pending.get_or_insert(token.span);
            continue;
        }

        if let Some(span) = pending.take() {
            if !is_documentable(token.kind) {
                compiler.report(Diagnostic::new(Code::CS1587).at(name.clone(), span));
            }
        }
        stripped.push(token);
    }

    stripped
}

/// Token kinds a documentation comment may legally precede.
fn is_documentable(kind: TokenKind) -> bool {
    kind.is_declaration_keyword()
        || kind.is_modifier_keyword()
        || kind.is_type_keyword()
        || matches!(
            kind,
            TokenKind::LeftBracket
                | TokenKind::Identifier
                | TokenKind::Namespace
                | TokenKind::Event
                | TokenKind::Tilde
        )
}

/// The sentinel returned by [`parse_expression`]: the expression grammar is
/// not part of this front end.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct ExpressionsUnsupported;

impl fmt::Display for ExpressionsUnsupported {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("expression parsing is not supported by this front end")
    }
}

impl std::error::Error for ExpressionsUnsupported {}

/// Expression parsing is deliberately unimplemented; the grammar covers
/// declaration scaffolding only. This always returns the documented
/// sentinel.
pub fn parse_expression(_tokens: &[Token]) -> Result<std::convert::Infallible, ExpressionsUnsupported> {
    Err(ExpressionsUnsupported)
}
