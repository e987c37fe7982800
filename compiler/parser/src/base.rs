//! The token buffer, expectation tracking, and error recovery.

use diagnostics::{Code, Diagnostic};
use lexer::token::{Token, TokenKind, TokenValue};
use session::Compiler;
use span::{SourceFileIndex, Span};
use std::{fmt, mem, rc::Rc};
use utility::{Conjunction, ListingExt};

/// "Already reported": the error is in the sink, the caller only unwinds to
/// its recovery point.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct SyntaxError;

pub(crate) type Result<T> = std::result::Result<T, SyntaxError>;

/// The parser over one buffer's tokens.
///
/// The scanner is drained into a vector per buffer, giving unbounded
/// lookahead; the cursor never advances past the trailing end-of-file
/// token.
pub(crate) struct Parser<'a> {
    tokens: Vec<Token>,
    index: usize,
    pub(crate) file: SourceFileIndex,
    pub(crate) name: Rc<str>,
    pub(crate) compiler: &'a Compiler,
    expectations: Vec<Expectation>,
    previous_span: Span,
}

impl<'a> Parser<'a> {
    pub(crate) fn new(
        tokens: Vec<Token>,
        file: SourceFileIndex,
        name: Rc<str>,
        compiler: &'a Compiler,
    ) -> Self {
        debug_assert!(matches!(
            tokens.last().map(|token| token.kind),
            Some(TokenKind::EndOfFile | TokenKind::EndOfDocument)
        ));

        let previous_span = tokens.first().map(|token| token.span).unwrap_or_default();
        Self { tokens, index: 0, file, name, compiler, expectations: Vec::new(), previous_span }
    }

    pub(crate) fn current(&self) -> &Token {
        &self.tokens[self.index]
    }

    pub(crate) fn token(&self) -> TokenKind {
        self.current().kind
    }

    pub(crate) fn span(&self) -> Span {
        self.current().span
    }

    /// A span from `start` through the last consumed token.
    pub(crate) fn span_from(&self, start: Span) -> Span {
        if self.previous_span.end >= start.start {
            Span::new(start.start, self.previous_span.end)
        } else {
            start
        }
    }

    /// Step to the next token, clearing the registered expectations. Never
    /// advances past the end-of-file token.
    pub(crate) fn advance(&mut self) {
        if self.index + 1 < self.tokens.len() {
            self.previous_span = self.span();
            self.index += 1;
        }
        self.expectations.clear();
    }

    /// The token `amount` ahead of the cursor, clamped to the trailing
    /// end-of-file token.
    pub(crate) fn peek(&self, amount: usize) -> &Token {
        self.tokens
            .get(self.index + amount)
            .unwrap_or_else(|| self.tokens.last().unwrap())
    }

    /// Whether the current token is the bare `=` (and not a compound
    /// assignment).
    pub(crate) fn at_bare_assign(&self) -> bool {
        self.token() == TokenKind::OpAssign
            && self.current().value == TokenValue::Operator(TokenKind::Equals)
    }

    pub(crate) fn at_end(&self) -> bool {
        matches!(self.token(), TokenKind::EndOfFile | TokenKind::EndOfDocument)
    }

    /// Register an expectation to be listed if the current token turns out
    /// to be unexpected.
    pub(crate) fn expected(&mut self, expectation: impl Into<Expectation>) {
        self.expectations.push(expectation.into());
    }

    /// Consume the current token if it matches.
    #[must_use]
    pub(crate) fn consume(&mut self, expectation: TokenKind) -> bool {
        if self.token() == expectation {
            self.advance();
            true
        } else {
            self.expected(expectation);
            false
        }
    }

    /// Expect and consume, or report and unwind.
    pub(crate) fn expect(&mut self, expectation: TokenKind) -> Result<Span> {
        if self.token() == expectation {
            let span = self.span();
            self.advance();
            Ok(span)
        } else {
            self.expected(expectation);
            self.error()
        }
    }

    /// Report the current token as unexpected, consuming the registered
    /// expectations.
    ///
    /// The most recent expectation decides the catalog entry; earlier ones
    /// only widen the generic listing.
    pub(crate) fn error<T>(&mut self) -> Result<T> {
        let expectations = mem::take(&mut self.expectations);
        let span = self.span();

        let diagnostic = match expectations.last() {
            Some(Expectation::Identifier) => {
                let keyword = self.token();
                if keyword.is_keyword() {
                    Diagnostic::new(Code::CS1041).arg(keyword)
                } else {
                    Diagnostic::new(Code::CS1001)
                }
            }
            Some(Expectation::Token(TokenKind::Semicolon)) => Diagnostic::new(Code::CS1002),
            Some(Expectation::Token(TokenKind::RightParen)) => Diagnostic::new(Code::CS1026),
            Some(Expectation::Token(TokenKind::LeftBrace)) => Diagnostic::new(Code::CS1514),
            Some(Expectation::Token(TokenKind::RightBrace)) => Diagnostic::new(Code::CS1513),
            _ => Diagnostic::new(Code::CS1003)
                .arg(expectations.iter().list(Conjunction::Or)),
        };

        self.compiler.report(diagnostic.at(self.name.clone(), span));
        Err(SyntaxError)
    }

    pub(crate) fn report(&self, diagnostic: Diagnostic, span: Span) {
        self.compiler.report(diagnostic.at(self.name.clone(), span));
    }

    //
    // Recovery
    //

    /// Skip tokens until one of the given kinds (or the end of the buffer).
    pub(crate) fn recover_to(&mut self, kinds: &[TokenKind]) {
        while !self.at_end() && !kinds.contains(&self.token()) {
            self.advance();
        }
    }

    /// Resynchronize after a declaration that went wrong: find the next
    /// `{`, `}`, or `;`; a `{` is skipped as a balanced block, anything
    /// else is consumed on its own.
    pub(crate) fn recover_from_bad_declaration(&mut self) {
        use TokenKind::*;

        self.recover_to(&[LeftBrace, RightBrace, Semicolon]);
        match self.token() {
            LeftBrace => self.skip_balanced_block(),
            RightBrace | Semicolon => self.advance(),
            _ => {}
        }
    }

    /// Skip a `{ … }` block including nested ones; the current token is the
    /// opening brace.
    pub(crate) fn skip_balanced_block(&mut self) {
        debug_assert_eq!(self.token(), TokenKind::LeftBrace);

        let mut depth = 0usize;
        loop {
            match self.token() {
                TokenKind::LeftBrace => depth += 1,
                TokenKind::RightBrace => {
                    self.advance();
                    if depth <= 1 {
                        return;
                    }
                    depth -= 1;
                    continue;
                }
                TokenKind::EndOfFile | TokenKind::EndOfDocument => return,
                _ => {}
            }
            self.advance();
        }
    }
}

pub(crate) enum Expectation {
    Token(TokenKind),
    Identifier,
    Type,
    AttributeArgument,
}

impl From<TokenKind> for Expectation {
    fn from(token: TokenKind) -> Self {
        match token {
            TokenKind::Identifier => Self::Identifier,
            token => Self::Token(token),
        }
    }
}

impl fmt::Display for Expectation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Token(token) => token.fmt(f),
            Self::Identifier => f.write_str("identifier"),
            Self::Type => f.write_str("type"),
            Self::AttributeArgument => f.write_str("attribute argument"),
        }
    }
}
