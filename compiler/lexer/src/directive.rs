//! The preprocessor: directive parsing, conditional skipping, pragmas.

use crate::{
    condition,
    reader::END_OF_BUFFER,
    token::LineOverride,
    Branch, Scanner,
};
use diagnostics::Code;
use span::{Position, Span};
use std::rc::Rc;

impl Scanner<'_> {
    /// Handle a `#` at the current position. Directives never produce
    /// tokens; they act on the scanner and session state.
    pub(crate) fn lex_directive(&mut self, first_on_line: bool) {
        let start = self.reader.position();

        if !first_on_line {
            self.report_at(Code::CS1040, Span::at(start), &[]);
            self.skip_to_end_of_line();
            return;
        }

        self.reader.advance();
        self.reader.skip_whitespace(false);
        let word = self.read_directive_word();

        match word.as_str() {
            "define" => self.lex_define(start, true),
            "undef" => self.lex_define(start, false),
            "if" => self.lex_if(start),
            "elif" => self.lex_elif(start),
            "else" => self.lex_else(start),
            "endif" => self.lex_endif(start),
            "region" => {
                self.buffer.region_depth += 1;
                // region names are free text
                self.skip_to_end_of_line();
            }
            "endregion" => {
                if self.buffer.region_depth == 0 {
                    self.report_at(Code::CS1028, Span::at(start), &[]);
                } else {
                    self.buffer.region_depth -= 1;
                }
                self.skip_to_end_of_line();
            }
            "pragma" => self.lex_pragma(start),
            "line" => self.lex_line(start),
            "warning" => {
                let text = self.read_rest_of_line();
                self.report_at(Code::CS1030, Span::at(start), &[&text.trim()]);
            }
            "error" => {
                let text = self.read_rest_of_line();
                self.report_at(Code::CS1029, Span::at(start), &[&text.trim()]);
            }
            _ => {
                self.report_at(Code::CS1024, Span::at(start), &[]);
                self.skip_to_end_of_line();
            }
        }
    }

    fn lex_define(&mut self, start: Position, define: bool) {
        if self.buffer.saw_token {
            self.report_at(Code::CS1032, Span::at(start), &[]);
            self.skip_to_end_of_line();
            return;
        }

        self.reader.skip_whitespace(false);
        let name = self.read_symbol_name();
        if name.is_empty() {
            self.report_at(Code::CS1001, Span::at(self.reader.position()), &[]);
            self.skip_to_end_of_line();
            return;
        }

        self.compiler.with_options(|options| {
            if define {
                options.define(&name);
            } else {
                options.undefine(&name);
            }
        });

        self.finish_directive_line();
    }

    fn lex_if(&mut self, start: Position) {
        let text = self.read_rest_of_line();

        match condition::evaluate(&text, |symbol| self.compiler.options().is_defined(symbol)) {
            Ok(true) => self.buffer.nesting.push(Branch::True),
            Ok(false) => {
                self.buffer.nesting.push(Branch::False);
                self.skip_inactive(false);
            }
            Err(()) => {
                self.report_at(Code::CS1517, Span::at(start), &[]);
                self.buffer.nesting.push(Branch::False);
                self.skip_inactive(false);
            }
        }
    }

    fn lex_elif(&mut self, start: Position) {
        let text = self.read_rest_of_line();

        match self.buffer.nesting.last() {
            None | Some(Branch::Else) => {
                self.report_at(Code::CS1028, Span::at(start), &[]);
            }
            // a branch has been taken already, this one is dead
            Some(Branch::True) => self.skip_inactive(false),
            Some(Branch::False) => {
                let value =
                    match condition::evaluate(&text, |symbol| self.compiler.options().is_defined(symbol)) {
                        Ok(value) => value,
                        Err(()) => {
                            self.report_at(Code::CS1517, Span::at(start), &[]);
                            false
                        }
                    };

                self.buffer.nesting.pop();
                if value {
                    self.buffer.nesting.push(Branch::True);
                } else {
                    self.buffer.nesting.push(Branch::False);
                    self.skip_inactive(false);
                }
            }
        }
    }

    fn lex_else(&mut self, start: Position) {
        match self.buffer.nesting.last_mut() {
            None | Some(Branch::Else) => {
                self.report_at(Code::CS1028, Span::at(start), &[]);
            }
            Some(branch @ Branch::True) => {
                *branch = Branch::Else;
                self.finish_directive_line();
                self.skip_inactive(true);
            }
            Some(branch @ Branch::False) => {
                *branch = Branch::Else;
                self.finish_directive_line();
            }
        }
    }

    fn lex_endif(&mut self, start: Position) {
        if self.buffer.nesting.pop().is_none() {
            self.report_at(Code::CS1028, Span::at(start), &[]);
        }
        self.finish_directive_line();
    }

    /// Skip an inactive conditional block line by line, tracking nested
    /// `#if` depth. Stops at a depth-zero `#endif`, or a depth-zero
    /// `#elif`/`#else` unless the else branch is already behind us; the
    /// reader is rolled back so the stopping directive is rescanned by the
    /// main loop.
    fn skip_inactive(&mut self, skipping_else: bool) {
        let mut depth = 0u32;

        'line: loop {
            // the remainder of the current line is dead
            loop {
                match self.reader.current() {
                    '\n' => {
                        self.reader.advance();
                        break;
                    }
                    END_OF_BUFFER => {
                        self.report_at(Code::CS1027, Span::at(self.reader.position()), &[]);
                        self.buffer.nesting.clear();
                        return;
                    }
                    _ => {
                        self.reader.advance();
                    }
                }
            }

            if self.reader.skip_whitespace(false) != '#' {
                continue 'line;
            }

            let hash = self.reader.position();
            self.reader.save_state();
            self.reader.advance();
            self.reader.skip_whitespace(false);
            let word = self.read_directive_word();

            match word.as_str() {
                "if" => {
                    depth += 1;
                    self.reader.forget_state();
                }
                "endif" => {
                    if depth == 0 {
                        self.reader.restore_state();
                        self.buffer.first_on_line = true;
                        return;
                    }
                    depth -= 1;
                    self.reader.forget_state();
                }
                "elif" | "else" => {
                    if depth == 0 {
                        if skipping_else {
                            self.report_at(Code::CS1028, Span::at(hash), &[]);
                            self.reader.forget_state();
                        } else {
                            self.reader.restore_state();
                            self.buffer.first_on_line = true;
                            return;
                        }
                    } else {
                        self.reader.forget_state();
                    }
                }
                _ => self.reader.forget_state(),
            }
        }
    }

    fn lex_pragma(&mut self, start: Position) {
        self.reader.skip_whitespace(false);
        let word = self.read_directive_word();
        if word != "warning" {
            self.report_at(Code::CS1633, Span::at(start), &[]);
            self.skip_to_end_of_line();
            return;
        }

        self.reader.skip_whitespace(false);
        let action = self.read_directive_word();
        let disable = match action.as_str() {
            "disable" => true,
            "restore" => false,
            _ => {
                self.report_at(Code::CS1634, Span::at(start), &[]);
                self.skip_to_end_of_line();
                return;
            }
        };

        if matches!(self.reader.skip_whitespace(false), '\n' | END_OF_BUFFER) {
            self.compiler.with_options(|options| {
                if disable {
                    options.disable_all_warnings();
                } else {
                    options.restore_all_warnings();
                }
            });
            return;
        }

        loop {
            let position = self.reader.position();
            if !self.reader.current().is_ascii_digit() {
                self.report_at(Code::CS1634, Span::at(position), &[]);
                self.skip_to_end_of_line();
                return;
            }

            let mut number = 0u32;
            while let Some(digit) = self.reader.current().to_digit(10) {
                number = (number * 10 + digit).min(u16::MAX as u32);
                self.reader.advance();
            }

            if number <= 9999 && Code::is_valid_warning(number as u16) {
                self.compiler.with_options(|options| {
                    if disable {
                        options.disable_warning(number as u16);
                    } else {
                        options.restore_warning(number as u16);
                    }
                });
            } else {
                self.report_at(Code::CS1691, Span::at(position), &[&number]);
            }

            match self.reader.skip_whitespace(false) {
                ',' => {
                    self.reader.advance();
                    self.reader.skip_whitespace(false);
                }
                '\n' | END_OF_BUFFER => return,
                _ => {
                    self.report_at(Code::CS1634, Span::at(self.reader.position()), &[]);
                    self.skip_to_end_of_line();
                    return;
                }
            }
        }
    }

    fn lex_line(&mut self, start: Position) {
        self.reader.skip_whitespace(false);

        if self.reader.current().is_ascii_digit() {
            let mut line = 0u32;
            while let Some(digit) = self.reader.current().to_digit(10) {
                line = line.saturating_mul(10).saturating_add(digit);
                self.reader.advance();
            }

            if self.reader.skip_whitespace(false) == '"' {
                self.reader.advance();
                let mut name = String::new();
                loop {
                    match self.reader.current() {
                        '"' => {
                            self.reader.advance();
                            self.buffer.source_override = Some(Rc::from(name.as_str()));
                            break;
                        }
                        '\n' | END_OF_BUFFER => {
                            self.report_at(Code::CS1576, Span::at(start), &[]);
                            return;
                        }
                        character => {
                            name.push(character);
                            self.reader.advance();
                        }
                    }
                }
            }

            self.buffer.line_override = LineOverride::Line(line);
            self.finish_directive_line();
            return;
        }

        let word = self.read_directive_word();
        match word.as_str() {
            "hidden" => self.buffer.line_override = LineOverride::Hidden,
            "default" => {
                self.buffer.line_override = LineOverride::Default;
                self.buffer.source_override = None;
            }
            _ => {
                self.report_at(Code::CS1576, Span::at(start), &[]);
                self.skip_to_end_of_line();
                return;
            }
        }

        self.finish_directive_line();
    }

    //
    // Directive-line plumbing
    //

    fn read_directive_word(&mut self) -> String {
        let mut word = String::new();
        while self.reader.current().is_ascii_lowercase() {
            word.push(self.reader.current());
            self.reader.advance();
        }
        word
    }

    fn read_symbol_name(&mut self) -> String {
        let mut name = String::new();
        loop {
            let character = self.reader.current();
            if character.is_alphanumeric() || character == '_' {
                name.push(character);
                self.reader.advance();
            } else {
                return name;
            }
        }
    }

    fn read_rest_of_line(&mut self) -> String {
        let mut text = String::new();
        while !matches!(self.reader.current(), '\n' | END_OF_BUFFER) {
            text.push(self.reader.current());
            self.reader.advance();
        }
        text
    }

    fn skip_to_end_of_line(&mut self) {
        while !matches!(self.reader.current(), '\n' | END_OF_BUFFER) {
            self.reader.advance();
        }
    }

    /// The rest of a directive line must be blank or a single-line comment.
    fn finish_directive_line(&mut self) {
        match self.reader.skip_whitespace(false) {
            '\n' | END_OF_BUFFER => {}
            '/' => {
                self.reader.save_state();
                self.reader.advance();
                if self.reader.current() == '/' {
                    self.reader.forget_state();
                    self.skip_to_end_of_line();
                } else {
                    self.reader.restore_state();
                    self.report_at(Code::CS1025, Span::at(self.reader.position()), &[]);
                    self.skip_to_end_of_line();
                }
            }
            _ => {
                self.report_at(Code::CS1025, Span::at(self.reader.position()), &[]);
                self.skip_to_end_of_line();
            }
        }
    }
}
