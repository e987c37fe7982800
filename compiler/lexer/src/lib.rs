//! The lexical scanner with its embedded preprocessor.
//!
//! [`Scanner::next_token`] produces one token per call, evaluating
//! conditional-compilation directives, tracking regions, applying warning
//! pragmas to the session's option scopes, and folding `#line` remapping
//! state into every emitted token. Lexical defects are reported to the
//! session and recovered from locally; the scanner never fails.

use diagnostics::{char_literal, Code, Diagnostic};
use session::Compiler;
use span::{Position, SourceMap, Span};
use std::{collections::VecDeque, mem, rc::Rc};

use reader::{Reader, END_OF_BUFFER};
use token::{keyword, Decimal, LineOverride, Token, TokenKind, TokenValue};

mod condition;
mod directive;
pub mod reader;
pub mod token;


pub struct Scanner<'a> {
    reader: Reader<'a>,
    compiler: &'a Compiler,
    pushed_back: VecDeque<Token>,
    buffer: BufferState,
    /// Whether a buffer is loaded and primed.
    active: bool,
}

/// Scanner state reset for every buffer.
#[derive(Default)]
struct BufferState {
    nesting: Vec<Branch>,
    region_depth: u32,
    first_on_line: bool,
    /// Whether a token has been emitted from this buffer; `#define` and
    /// `#undef` are rejected afterwards.
    saw_token: bool,
    line_override: LineOverride,
    source_override: Option<Rc<str>>,
}

/// The state of one open `#if`.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum Branch {
    /// Some branch of this conditional has been taken.
    True,
    /// No branch has been taken yet.
    False,
    /// The `#else` branch has been entered.
    Else,
}

impl<'a> Scanner<'a> {
    pub fn new(map: &'a SourceMap, compiler: &'a Compiler) -> Self {
        Self {
            reader: Reader::new(map),
            compiler,
            pushed_back: VecDeque::new(),
            buffer: BufferState::default(),
            active: false,
        }
    }

    /// Produce the next token, draining the push-back queue first.
    pub fn next_token(&mut self) -> Token {
        if let Some(token) = self.pushed_back.pop_front() {
            return token;
        }
        self.scan_token()
    }

    /// Queue a token for re-emission. Queued tokens re-emerge in the order
    /// they were pushed back, ahead of freshly scanned ones.
    pub fn push_back(&mut self, token: Token) {
        self.pushed_back.push_back(token);
    }

    /// Scan the next buffer through its end-of-file token. `None` once all
    /// buffers are consumed.
    pub fn scan_file(&mut self) -> Option<Vec<Token>> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token();
            match token.kind {
                TokenKind::EndOfFile => {
                    tokens.push(token);
                    return Some(tokens);
                }
                TokenKind::EndOfDocument => return None,
                _ => tokens.push(token),
            }
        }
    }

    /// Drain every buffer, ending with the end-of-document token.
    pub fn scan_all(&mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token();
            let kind = token.kind;
            tokens.push(token);
            if kind == TokenKind::EndOfDocument {
                return tokens;
            }
        }
    }

    fn scan_token(&mut self) -> Token {
        loop {
            if !self.active {
                if !self.reader.next_source() {
                    return Token {
                        kind: TokenKind::EndOfDocument,
                        value: TokenValue::None,
                        file: None,
                        span: Span::default(),
                        line_override: LineOverride::Default,
                        source_override: None,
                    };
                }

                // the on-source-loaded hook: fresh per-buffer state and a
                // nested option scope
                self.active = true;
                self.buffer = BufferState { first_on_line: true, ..BufferState::default() };
                self.compiler.push_options();
                self.reader.advance();
            }

            let character = self.skip_whitespace();
            let first_on_line = mem::replace(&mut self.buffer.first_on_line, false);

            if character == END_OF_BUFFER {
                return self.end_of_file();
            }

            if character == '#' {
                self.lex_directive(first_on_line);
                continue;
            }

            let start = self.reader.position();
            let token = match character {
                character if character.is_ascii_digit() => self.lex_number(start),
                '.' => self.lex_period_or_number(start),
                '"' => self.lex_string(start),
                '\'' => self.lex_character(start),
                '@' => match self.lex_verbatim(start) {
                    Some(token) => token,
                    None => continue,
                },
                '/' => match self.lex_slash(start) {
                    Some(token) => token,
                    None => continue,
                },
                character if is_identifier_start(character) || character == '\\' => {
                    match self.lex_identifier(start, false) {
                        Some(token) => token,
                        None => continue,
                    }
                }
                character => match self.lex_operator(character, start) {
                    Some(token) => token,
                    None => continue,
                },
            };

            self.buffer.saw_token = true;
            return token;
        }
    }

    /// Consume whitespace including newlines, remembering line starts.
    fn skip_whitespace(&mut self) -> char {
        loop {
            let character = self.reader.skip_whitespace(false);
            if character == '\n' {
                self.buffer.first_on_line = true;
                self.reader.advance();
                continue;
            }
            return character;
        }
    }

    fn end_of_file(&mut self) -> Token {
        let position = self.reader.position();
        if !self.buffer.nesting.is_empty() {
            self.report_at(Code::CS1027, Span::at(position), &[]);
        }
        if self.buffer.region_depth > 0 {
            self.report_at(Code::CS1038, Span::at(position), &[]);
        }

        let token = self.make(TokenKind::EndOfFile, TokenValue::None, Span::at(position));
        self.compiler.pop_options();
        self.active = false;
        token
    }

    fn make(&self, kind: TokenKind, value: TokenValue, span: Span) -> Token {
        Token {
            kind,
            value,
            file: Some(self.reader.file()),
            span,
            line_override: self.buffer.line_override,
            source_override: self.buffer.source_override.clone(),
        }
    }

    fn report_at(&self, code: Code, span: Span, args: &[&dyn std::fmt::Display]) {
        let mut diagnostic = Diagnostic::new(code).at(self.reader.name(), span);
        for argument in args {
            diagnostic = diagnostic.arg(argument);
        }
        self.compiler.report(diagnostic);
    }

    //
    // Identifiers
    //

    fn lex_identifier(&mut self, start: Position, verbatim: bool) -> Option<Token> {
        let mut name = String::new();
        let mut end = start;
        let mut had_escape = false;

        loop {
            let character = self.reader.current();
            if is_identifier_part(character) {
                name.push(character);
                end = self.reader.position();
                self.reader.advance();
            } else if character == '\\' {
                self.reader.save_state();
                let escape = self.reader.position();
                self.reader.advance();
                if matches!(self.reader.current(), 'u' | 'U') {
                    self.reader.forget_state();
                    self.reader.advance();
                    had_escape = true;
                    match self.read_hex_escape() {
                        Some(character) => {
                            name.push(character);
                            end = self.reader.last_position();
                        }
                        None => self.report_at(Code::CS1009, Span::at(escape), &[]),
                    }
                } else {
                    self.reader.restore_state();
                    if name.is_empty() {
                        self.report_at(Code::CS1056, Span::at(escape), &[&char_literal('\\')]);
                        self.reader.advance();
                        return None;
                    }
                    // a stray backslash terminates the identifier
                    break;
                }
            } else {
                break;
            }
        }

        let span = Span::new(start, end);

        if !verbatim && !had_escape {
            if let Some(kind) = keyword(&name) {
                return Some(match kind {
                    TokenKind::True => self.make(TokenKind::Literal, TokenValue::Bool(true), span),
                    TokenKind::False => {
                        self.make(TokenKind::Literal, TokenValue::Bool(false), span)
                    }
                    TokenKind::Null => self.make(TokenKind::Literal, TokenValue::Null, span),
                    kind => self.make(kind, TokenValue::None, span),
                });
            }
        }

        Some(self.make(TokenKind::Identifier, TokenValue::String(name), span))
    }

    /// Read 1-4 hex digits of a `\x`/`\u`/`\U` escape; the marker is already
    /// consumed. `None` when no digit follows or the value is no character.
    fn read_hex_escape(&mut self) -> Option<char> {
        let mut value = 0;
        let mut digits = 0;
        while digits < 4 {
            match self.reader.current().to_digit(16) {
                Some(digit) => {
                    value = value * 16 + digit;
                    digits += 1;
                    self.reader.advance();
                }
                None => break,
            }
        }

        if digits == 0 {
            return None;
        }
        char::from_u32(value)
    }

    //
    // Verbatim constructs
    //

    fn lex_verbatim(&mut self, start: Position) -> Option<Token> {
        self.reader.advance();
        match self.reader.current() {
            '"' => Some(self.lex_verbatim_string(start)),
            '\'' => Some(self.lex_verbatim_character(start)),
            character if is_identifier_start(character) || character == '\\' => {
                self.lex_identifier(start, true)
            }
            _ => {
                self.report_at(Code::CS1646, Span::at(start), &[]);
                None
            }
        }
    }

    /// `@"…"`: no escapes, the delimiter is doubled, newlines are allowed.
    fn lex_verbatim_string(&mut self, start: Position) -> Token {
        self.reader.advance();
        let mut value = String::new();

        loop {
            match self.reader.current() {
                '"' => {
                    let end = self.reader.position();
                    self.reader.advance();
                    if self.reader.current() == '"' {
                        value.push('"');
                        self.reader.advance();
                    } else {
                        return self.make(
                            TokenKind::Literal,
                            TokenValue::String(value),
                            Span::new(start, end),
                        );
                    }
                }
                END_OF_BUFFER => {
                    self.report_at(Code::CS1039, Span::at(start), &[]);
                    return self.make(
                        TokenKind::Literal,
                        TokenValue::String(value),
                        Span::new(start, self.reader.last_position()),
                    );
                }
                character => {
                    value.push(character);
                    self.reader.advance();
                }
            }
        }
    }

    fn lex_verbatim_character(&mut self, start: Position) -> Token {
        self.reader.advance();
        let mut value = String::new();

        let end = loop {
            match self.reader.current() {
                '\'' => {
                    let end = self.reader.position();
                    self.reader.advance();
                    if self.reader.current() == '\'' {
                        value.push('\'');
                        self.reader.advance();
                    } else {
                        break end;
                    }
                }
                END_OF_BUFFER => {
                    self.report_at(Code::CS1039, Span::at(start), &[]);
                    break self.reader.last_position();
                }
                character => {
                    value.push(character);
                    self.reader.advance();
                }
            }
        };

        let span = Span::new(start, end);
        let mut characters = value.chars();
        let character = match characters.next() {
            None => {
                self.report_at(Code::CS1011, span, &[]);
                '\0'
            }
            Some(character) => {
                if characters.next().is_some() {
                    self.report_at(Code::CS1012, span, &[]);
                }
                character
            }
        };

        self.make(TokenKind::Literal, TokenValue::Char(character), span)
    }

    //
    // String and character literals
    //

    /// Process an escape sequence; `current` is the backslash. Unrecognized
    /// escapes are reported and substituted by the escaped character itself.
    fn lex_escape(&mut self) -> char {
        self.reader.advance();
        let character = self.reader.current();
        let position = self.reader.position();

        let simple = match character {
            '\'' | '"' | '\\' => character,
            '0' => '\0',
            'a' => '\x07',
            'b' => '\x08',
            'f' => '\x0c',
            'n' => '\n',
            'r' => '\r',
            't' => '\t',
            'v' => '\x0b',
            'x' | 'u' | 'U' => {
                self.reader.advance();
                return match self.read_hex_escape() {
                    Some(character) => character,
                    None => {
                        self.report_at(Code::CS1009, Span::at(position), &[]);
                        character
                    }
                };
            }
            _ => {
                self.report_at(Code::CS1009, Span::at(position), &[]);
                self.reader.advance();
                return character;
            }
        };

        self.reader.advance();
        simple
    }

    fn lex_string(&mut self, start: Position) -> Token {
        self.reader.advance();
        let mut value = String::new();

        loop {
            match self.reader.current() {
                '"' => {
                    let end = self.reader.position();
                    self.reader.advance();
                    return self.make(
                        TokenKind::Literal,
                        TokenValue::String(value),
                        Span::new(start, end),
                    );
                }
                '\n' => {
                    self.report_at(Code::CS1010, Span::at(self.reader.position()), &[]);
                    break;
                }
                END_OF_BUFFER => {
                    self.report_at(Code::CS1039, Span::at(start), &[]);
                    break;
                }
                '\\' => value.push(self.lex_escape()),
                character => {
                    value.push(character);
                    self.reader.advance();
                }
            }
        }

        let end = self.reader.last_position();
        self.make(TokenKind::Literal, TokenValue::String(value), Span::new(start, end))
    }

    fn lex_character(&mut self, start: Position) -> Token {
        self.reader.advance();

        match self.reader.current() {
            '\'' => {
                let end = self.reader.position();
                self.reader.advance();
                let span = Span::new(start, end);
                self.report_at(Code::CS1011, span, &[]);
                return self.make(TokenKind::Literal, TokenValue::Char('\0'), span);
            }
            '\n' | END_OF_BUFFER => {
                self.report_at(Code::CS1010, Span::at(self.reader.position()), &[]);
                let span = Span::new(start, self.reader.last_position());
                return self.make(TokenKind::Literal, TokenValue::Char('\0'), span);
            }
            _ => {}
        }

        let value = if self.reader.current() == '\\' {
            self.lex_escape()
        } else {
            let character = self.reader.current();
            self.reader.advance();
            character
        };

        if self.reader.current() == '\'' {
            let end = self.reader.position();
            self.reader.advance();
            return self.make(TokenKind::Literal, TokenValue::Char(value), Span::new(start, end));
        }

        // more than one character: skip ahead to the closing quote
        loop {
            match self.reader.current() {
                '\'' => {
                    let end = self.reader.position();
                    self.reader.advance();
                    let span = Span::new(start, end);
                    self.report_at(Code::CS1012, span, &[]);
                    return self.make(TokenKind::Literal, TokenValue::Char(value), span);
                }
                '\n' | END_OF_BUFFER => {
                    self.report_at(
                        Code::CS1003,
                        Span::at(self.reader.position()),
                        &[&'\''],
                    );
                    let span = Span::new(start, self.reader.last_position());
                    return self.make(TokenKind::Literal, TokenValue::Char(value), span);
                }
                _ => {
                    self.reader.advance();
                }
            }
        }
    }

    //
    // Numeric literals
    //

    fn lex_period_or_number(&mut self, start: Position) -> Token {
        self.reader.save_state();
        self.reader.advance();
        let fraction = self.reader.current().is_ascii_digit();
        self.reader.restore_state();

        if fraction {
            self.lex_number(start)
        } else {
            self.reader.advance();
            self.make(TokenKind::Period, TokenValue::None, Span::at(start))
        }
    }

    fn lex_number(&mut self, start: Position) -> Token {
        if self.reader.current() == '0' {
            self.reader.save_state();
            self.reader.advance();
            if matches!(self.reader.current(), 'x' | 'X') {
                self.reader.forget_state();
                self.reader.advance();
                return self.finish_hex_number(start);
            }
            self.reader.restore_state();
        }

        let mut text = String::new();
        let mut end = start;
        let mut is_integer = true;
        let mut value = 0u64;
        let mut overflow = false;

        if self.reader.current() == '.' {
            text.push('0');
        }

        while let Some(digit) = self.reader.current().to_digit(10) {
            value = match value.checked_mul(10).and_then(|value| value.checked_add(digit as u64)) {
                Some(value) => value,
                None => {
                    overflow = true;
                    u64::MAX
                }
            };
            text.push(self.reader.current());
            end = self.reader.position();
            self.reader.advance();
        }

        if self.reader.current() == '.' {
            self.reader.save_state();
            self.reader.advance();
            if self.reader.current().is_ascii_digit() {
                self.reader.forget_state();
                is_integer = false;
                text.push('.');
                while self.reader.current().is_ascii_digit() {
                    text.push(self.reader.current());
                    end = self.reader.position();
                    self.reader.advance();
                }
            } else {
                // the period belongs to the next token
                self.reader.restore_state();
            }
        }

        let mut has_exponent = false;
        if matches!(self.reader.current(), 'e' | 'E') {
            text.push('e');
            self.reader.advance();
            if self.reader.current() == '-' {
                text.push('-');
                self.reader.advance();
            }
            if !self.reader.current().is_ascii_digit() {
                self.report_at(Code::CS1013, Span::new(start, self.reader.position()), &[]);
                return self.make(
                    TokenKind::Invalid,
                    TokenValue::None,
                    Span::new(start, self.reader.position()),
                );
            }
            is_integer = false;
            has_exponent = true;
            while self.reader.current().is_ascii_digit() {
                text.push(self.reader.current());
                end = self.reader.position();
                self.reader.advance();
            }
        }

        // suffixes
        match self.reader.current() {
            'f' | 'F' => {
                end = self.reader.position();
                self.reader.advance();
                return self.make_real(start, end, &text, RealKind::Float);
            }
            'd' | 'D' => {
                end = self.reader.position();
                self.reader.advance();
                return self.make_real(start, end, &text, RealKind::Double);
            }
            'm' | 'M' => {
                end = self.reader.position();
                self.reader.advance();
                return self.make_decimal(start, end, &text, has_exponent);
            }
            _ => {}
        }

        if !is_integer {
            return self.make_real(start, end, &text, RealKind::Double);
        }

        let (unsigned, long, suffix_end) = self.lex_integer_suffix();
        if let Some(suffix_end) = suffix_end {
            end = suffix_end;
        }
        let span = Span::new(start, end);

        if overflow {
            self.report_at(Code::CS1021, Span::at(start), &[]);
        }

        let value = match (unsigned, long) {
            (true, true) => TokenValue::ULong(value),
            (true, false) => {
                if value <= u32::MAX as u64 {
                    TokenValue::UInt(value as u32)
                } else {
                    TokenValue::ULong(value)
                }
            }
            (false, true) => {
                if value <= i64::MAX as u64 {
                    TokenValue::Long(value as i64)
                } else {
                    TokenValue::ULong(value)
                }
            }
            (false, false) => smallest_integer(value, false),
        };

        self.make(TokenKind::Literal, value, span)
    }

    fn finish_hex_number(&mut self, start: Position) -> Token {
        let mut value = 0u64;
        let mut digits = 0;
        let mut overflow = false;
        let mut end = self.reader.last_position();

        while let Some(digit) = self.reader.current().to_digit(16) {
            // a set bit shifted past bit 63 is an overflow
            if value >> 60 != 0 {
                overflow = true;
            }
            value = (value << 4) | digit as u64;
            digits += 1;
            end = self.reader.position();
            self.reader.advance();
        }

        if digits == 0 {
            let span = Span::new(start, end);
            self.report_at(Code::CS1013, span, &[]);
            return self.make(TokenKind::Invalid, TokenValue::None, span);
        }

        let (unsigned, long, suffix_end) = self.lex_integer_suffix();
        if let Some(suffix_end) = suffix_end {
            end = suffix_end;
        }
        let span = Span::new(start, end);

        if overflow {
            self.report_at(Code::CS1021, Span::at(start), &[]);
            value = u64::MAX;
        }

        let value = match (unsigned, long) {
            (true, true) => TokenValue::ULong(value),
            (true, false) => {
                if value <= u32::MAX as u64 {
                    TokenValue::UInt(value as u32)
                } else {
                    TokenValue::ULong(value)
                }
            }
            (false, true) => {
                if value <= i64::MAX as u64 {
                    TokenValue::Long(value as i64)
                } else {
                    TokenValue::ULong(value)
                }
            }
            (false, false) => smallest_integer(value, true),
        };

        self.make(TokenKind::Literal, value, span)
    }

    /// Read `u`/`l` integer suffixes in either order, warning about the
    /// easily misread lowercase `l`.
    fn lex_integer_suffix(&mut self) -> (bool, bool, Option<Position>) {
        let mut unsigned = false;
        let mut long = false;
        let mut end = None;

        for _ in 0..2 {
            match self.reader.current() {
                'u' | 'U' if !unsigned => {
                    unsigned = true;
                    end = Some(self.reader.position());
                    self.reader.advance();
                }
                'l' | 'L' if !long => {
                    if self.reader.current() == 'l' {
                        self.report_at(Code::CS0078, Span::at(self.reader.position()), &[]);
                    }
                    long = true;
                    end = Some(self.reader.position());
                    self.reader.advance();
                }
                _ => break,
            }
        }

        (unsigned, long, end)
    }

    fn make_real(&mut self, start: Position, end: Position, text: &str, kind: RealKind) -> Token {
        let span = Span::new(start, end);
        let value = match text.parse::<f64>() {
            Ok(value) => value,
            Err(_) => {
                self.report_at(Code::CS1013, span, &[]);
                return self.make(TokenKind::Invalid, TokenValue::None, span);
            }
        };

        let value = match kind {
            RealKind::Float => {
                if value.is_infinite() || value.abs() > f32::MAX as f64 {
                    self.report_at(Code::CS0594, Span::at(start), &[&"float"]);
                }
                TokenValue::Float(value as f32)
            }
            RealKind::Double => {
                if value.is_infinite() {
                    self.report_at(Code::CS0594, Span::at(start), &[&"double"]);
                }
                TokenValue::Double(value)
            }
        };

        self.make(TokenKind::Literal, value, span)
    }

    fn make_decimal(&mut self, start: Position, end: Position, text: &str, has_exponent: bool) -> Token {
        let span = Span::new(start, end);

        let decimal = if has_exponent {
            // exponents go through a double-precision intermediate
            text.parse::<f64>().ok().and_then(Decimal::from_f64)
        } else {
            parse_decimal(text)
        };

        match decimal {
            Some(decimal) => self.make(TokenKind::Literal, TokenValue::Decimal(decimal), span),
            None => {
                self.report_at(Code::CS0594, Span::at(start), &[&"decimal"]);
                self.make(TokenKind::Literal, TokenValue::Decimal(Decimal::new(0, 0)), span)
            }
        }
    }

    //
    // Comments and slashes
    //

    fn lex_slash(&mut self, start: Position) -> Option<Token> {
        self.reader.advance();
        match self.reader.current() {
            '/' => {
                self.reader.advance();
                if self.reader.current() == '/' {
                    self.reader.advance();
                    let mut text = String::new();
                    let mut end = self.reader.last_position();
                    while !matches!(self.reader.current(), '\n' | END_OF_BUFFER) {
                        text.push(self.reader.current());
                        end = self.reader.position();
                        self.reader.advance();
                    }
                    Some(self.make(
                        TokenKind::XmlCommentLine,
                        TokenValue::String(text),
                        Span::new(start, end),
                    ))
                } else {
                    while !matches!(self.reader.current(), '\n' | END_OF_BUFFER) {
                        self.reader.advance();
                    }
                    None
                }
            }
            '*' => {
                self.reader.advance();
                loop {
                    match self.reader.current() {
                        END_OF_BUFFER => {
                            self.report_at(Code::CS1035, Span::at(start), &[]);
                            break;
                        }
                        '*' => {
                            self.reader.advance();
                            if self.reader.current() == '/' {
                                self.reader.advance();
                                break;
                            }
                        }
                        _ => {
                            self.reader.advance();
                        }
                    }
                }
                None
            }
            '=' => {
                let end = self.reader.position();
                self.reader.advance();
                Some(self.make(
                    TokenKind::OpAssign,
                    TokenValue::Operator(TokenKind::Slash),
                    Span::new(start, end),
                ))
            }
            _ => Some(self.make(TokenKind::Slash, TokenValue::None, Span::at(start))),
        }
    }

    //
    // Punctuation and operators
    //

    fn lex_operator(&mut self, first: char, start: Position) -> Option<Token> {
        use TokenKind::*;

        self.reader.advance();

        // maximal munch over the fixed compound table
        let (kind, value, length) = match (first, self.reader.current()) {
            ('~', _) => (Tilde, TokenValue::None, 1),
            ('!', '=') => (NotEqual, TokenValue::None, 2),
            ('!', _) => (Not, TokenValue::None, 1),
            ('%', '=') => (OpAssign, TokenValue::Operator(Percent), 2),
            ('%', _) => (Percent, TokenValue::None, 1),
            ('^', '=') => (OpAssign, TokenValue::Operator(Caret), 2),
            ('^', _) => (Caret, TokenValue::None, 1),
            ('&', '&') => (LogicalAnd, TokenValue::None, 2),
            ('&', '=') => (OpAssign, TokenValue::Operator(Ampersand), 2),
            ('&', _) => (Ampersand, TokenValue::None, 1),
            ('|', '|') => (LogicalOr, TokenValue::None, 2),
            ('|', '=') => (OpAssign, TokenValue::Operator(Pipe), 2),
            ('|', _) => (Pipe, TokenValue::None, 1),
            ('*', '=') => (OpAssign, TokenValue::Operator(Star), 2),
            ('*', _) => (Star, TokenValue::None, 1),
            ('(', _) => (LeftParen, TokenValue::None, 1),
            (')', _) => (RightParen, TokenValue::None, 1),
            ('-', '-') => (Decrement, TokenValue::None, 2),
            ('-', '=') => (OpAssign, TokenValue::Operator(Minus), 2),
            ('-', '>') => (Arrow, TokenValue::None, 2),
            ('-', _) => (Minus, TokenValue::None, 1),
            ('+', '+') => (Increment, TokenValue::None, 2),
            ('+', '=') => (OpAssign, TokenValue::Operator(Plus), 2),
            ('+', _) => (Plus, TokenValue::None, 1),
            ('=', '=') => (EqualEqual, TokenValue::None, 2),
            ('=', _) => (OpAssign, TokenValue::Operator(Equals), 1),
            ('{', _) => (LeftBrace, TokenValue::None, 1),
            ('}', _) => (RightBrace, TokenValue::None, 1),
            ('[', _) => (LeftBracket, TokenValue::None, 1),
            (']', _) => (RightBracket, TokenValue::None, 1),
            (':', ':') => (ColonColon, TokenValue::None, 2),
            (':', _) => (Colon, TokenValue::None, 1),
            (';', _) => (Semicolon, TokenValue::None, 1),
            (',', _) => (Comma, TokenValue::None, 1),
            ('<', '<') => {
                self.reader.advance();
                if self.reader.current() == '=' {
                    let end = self.reader.position();
                    self.reader.advance();
                    return Some(self.make(
                        OpAssign,
                        TokenValue::Operator(ShiftLeft),
                        Span::new(start, end),
                    ));
                }
                return Some(self.make(
                    ShiftLeft,
                    TokenValue::None,
                    Span::new(start, self.reader.last_position()),
                ));
            }
            ('<', '=') => (LessEqual, TokenValue::None, 2),
            ('<', _) => (Less, TokenValue::None, 1),
            ('>', '>') => {
                self.reader.advance();
                if self.reader.current() == '=' {
                    let end = self.reader.position();
                    self.reader.advance();
                    return Some(self.make(
                        OpAssign,
                        TokenValue::Operator(ShiftRight),
                        Span::new(start, end),
                    ));
                }
                return Some(self.make(
                    ShiftRight,
                    TokenValue::None,
                    Span::new(start, self.reader.last_position()),
                ));
            }
            ('>', '=') => (GreaterEqual, TokenValue::None, 2),
            ('>', _) => (Greater, TokenValue::None, 1),
            ('?', '?') => (NullCoalesce, TokenValue::None, 2),
            ('?', _) => (Question, TokenValue::None, 1),
            _ => {
                self.report_at(Code::CS1056, Span::at(start), &[&char_literal(first)]);
                return None;
            }
        };

        let span = if length == 2 {
            let end = self.reader.position();
            self.reader.advance();
            Span::new(start, end)
        } else {
            Span::at(start)
        };

        Some(self.make(kind, value, span))
    }
}

#[derive(Clone, Copy)]
enum RealKind {
    Float,
    Double,
}

/// The smallest type that fits an unsuffixed integer literal. Hexadecimal
/// literals skip the `long` step and go straight to `ulong`.
fn smallest_integer(value: u64, hex: bool) -> TokenValue {
    if value <= i32::MAX as u64 {
        TokenValue::Int(value as i32)
    } else if value <= u32::MAX as u64 {
        TokenValue::UInt(value as u32)
    } else if !hex && value <= i64::MAX as u64 {
        TokenValue::Long(value as i64)
    } else {
        TokenValue::ULong(value)
    }
}

/// Parse the digits of an exponent-free decimal literal exactly.
fn parse_decimal(text: &str) -> Option<Decimal> {
    let mut mantissa = 0i128;
    let mut scale = 0;
    let mut in_fraction = false;

    for character in text.chars() {
        if character == '.' {
            in_fraction = true;
            continue;
        }
        let digit = character.to_digit(10)? as i128;
        mantissa = mantissa.checked_mul(10)?.checked_add(digit)?;
        if mantissa > Decimal::MAX_MANTISSA {
            return None;
        }
        if in_fraction {
            scale += 1;
            if scale > Decimal::MAX_SCALE {
                return None;
            }
        }
    }

    Some(Decimal::new(mantissa, scale))
}

fn is_identifier_start(character: char) -> bool {
    character.is_alphabetic() || character == '_'
}

fn is_identifier_part(character: char) -> bool {
    character.is_alphanumeric() || character == '_'
}
