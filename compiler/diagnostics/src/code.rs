//! The catalog of diagnostic codes.

use crate::Severity;
use once_cell::sync::Lazy;
use std::fmt;

/// A catalogued diagnostic code.
///
/// Every variant corresponds to one numeric `CS` code with a fixed severity,
/// warning level, and message template. Placeholders `{0}`, `{1}`, … in the
/// template are filled by [`Diagnostic::arg`](crate::Diagnostic::arg).
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug, Hash)]
pub enum Code {
    /// Lowercase 'l' suffix on an integer literal.
    CS0078,
    /// Interfaces cannot declare types.
    CS0524,
    /// Interfaces cannot contain fields.
    CS0525,
    /// Interfaces cannot contain constructors.
    CS0526,
    /// Only class types can contain destructors.
    CS0575,
    /// Real constant is outside the range of its type.
    CS0594,
    /// Attribute location is not valid for this declaration.
    CS0657,
    /// Unrecognized attribute location.
    CS0658,
    /// Identifier expected.
    CS1001,
    /// `;` expected.
    CS1002,
    /// Syntax error, a specific token was expected.
    CS1003,
    /// Duplicate modifier.
    CS1004,
    /// Invalid enum base type.
    CS1008,
    /// Unrecognized escape sequence.
    CS1009,
    /// Newline in constant.
    CS1010,
    /// Empty character literal.
    CS1011,
    /// Too many characters in character literal.
    CS1012,
    /// Invalid number.
    CS1013,
    /// Named attribute argument expected.
    CS1016,
    /// Integral constant is too large.
    CS1021,
    /// Type or namespace definition, or end-of-file expected.
    CS1022,
    /// Preprocessor directive expected.
    CS1024,
    /// Single-line comment or end-of-line expected after a directive.
    CS1025,
    /// `)` expected.
    CS1026,
    /// `#endif` directive expected.
    CS1027,
    /// Unexpected preprocessor directive.
    CS1028,
    /// User-issued `#error`.
    CS1029,
    /// User-issued `#warning`.
    CS1030,
    /// `#define`/`#undef` after the first token of the buffer.
    CS1032,
    /// Unterminated multi-line comment.
    CS1035,
    /// `#endregion` directive expected.
    CS1038,
    /// Unterminated string literal.
    CS1039,
    /// Preprocessor directive is not the first non-whitespace on its line.
    CS1040,
    /// Identifier expected but a keyword was found.
    CS1041,
    /// Unexpected character.
    CS1056,
    /// `}` expected.
    CS1513,
    /// `{` expected.
    CS1514,
    /// Invalid preprocessor expression.
    CS1517,
    /// Type declaration expected.
    CS1518,
    /// Invalid token in a type declaration.
    CS1519,
    /// Invalid `#line` directive.
    CS1576,
    /// XML comment is not placed on a valid language element.
    CS1587,
    /// Unrecognized `#pragma` directive.
    CS1633,
    /// Malformed `#pragma warning` directive.
    CS1634,
    /// Misplaced verbatim specifier `@`.
    CS1646,
    /// Invalid warning number in a `#pragma warning` list.
    CS1691,
}

use crate::Severity::{Error, Warning};
use Code::*;

impl Code {
    pub(crate) const ALL: &'static [Code] = &[
        CS0078, CS0524, CS0525, CS0526, CS0575, CS0594, CS0657, CS0658, CS1001, CS1002, CS1003,
        CS1004, CS1008, CS1009, CS1010, CS1011, CS1012, CS1013, CS1016, CS1021, CS1022, CS1024,
        CS1025, CS1026, CS1027, CS1028, CS1029, CS1030, CS1032, CS1035, CS1038, CS1039, CS1040,
        CS1041, CS1056, CS1513, CS1514, CS1517, CS1518, CS1519, CS1576, CS1587, CS1633, CS1634,
        CS1646, CS1691,
    ];

    /// The catalog row: number, severity, warning level, message template.
    const fn entry(self) -> (u16, Severity, u8, &'static str) {
        match self {
            CS0078 => (78, Warning, 1, "The 'l' suffix is easily confused with the digit '1' -- use 'L' for clarity"),
            CS0524 => (524, Error, 0, "'{0}': interfaces cannot declare types"),
            CS0525 => (525, Error, 0, "Interfaces cannot contain fields"),
            CS0526 => (526, Error, 0, "Interfaces cannot contain constructors"),
            CS0575 => (575, Error, 0, "Only class types can contain destructors"),
            CS0594 => (594, Error, 0, "Floating-point constant is outside the range of type '{0}'"),
            CS0657 => (657, Warning, 1, "'{0}' is not a valid attribute location for this declaration. All attributes in this block will be ignored."),
            CS0658 => (658, Warning, 1, "'{0}' is not a recognized attribute location. All attributes in this block will be ignored."),
            CS1001 => (1001, Error, 0, "Identifier expected"),
            CS1002 => (1002, Error, 0, "; expected"),
            CS1003 => (1003, Error, 0, "Syntax error, '{0}' expected"),
            CS1004 => (1004, Error, 0, "Duplicate '{0}' modifier"),
            CS1008 => (1008, Error, 0, "Type byte, sbyte, short, ushort, int, uint, long, or ulong expected"),
            CS1009 => (1009, Error, 0, "Unrecognized escape sequence"),
            CS1010 => (1010, Error, 0, "Newline in constant"),
            CS1011 => (1011, Error, 0, "Empty character literal"),
            CS1012 => (1012, Error, 0, "Too many characters in character literal"),
            CS1013 => (1013, Error, 0, "Invalid number"),
            CS1016 => (1016, Error, 0, "Named attribute argument expected"),
            CS1021 => (1021, Error, 0, "Integral constant is too large"),
            CS1022 => (1022, Error, 0, "Type or namespace definition, or end-of-file expected"),
            CS1024 => (1024, Error, 0, "Preprocessor directive expected"),
            CS1025 => (1025, Error, 0, "Single-line comment or end-of-line expected"),
            CS1026 => (1026, Error, 0, ") expected"),
            CS1027 => (1027, Error, 0, "#endif directive expected"),
            CS1028 => (1028, Error, 0, "Unexpected preprocessor directive"),
            CS1029 => (1029, Error, 0, "#error: '{0}'"),
            CS1030 => (1030, Warning, 1, "#warning: '{0}'"),
            CS1032 => (1032, Error, 0, "Cannot define/undefine preprocessor symbols after first token in file"),
            CS1035 => (1035, Error, 0, "End-of-file found, '*/' expected"),
            CS1038 => (1038, Error, 0, "#endregion directive expected"),
            CS1039 => (1039, Error, 0, "Unterminated string literal"),
            CS1040 => (1040, Error, 0, "Preprocessor directives must appear as the first non-whitespace character on a line"),
            CS1041 => (1041, Error, 0, "Identifier expected; '{0}' is a keyword"),
            CS1056 => (1056, Error, 0, "Unexpected character {0}"),
            CS1513 => (1513, Error, 0, "} expected"),
            CS1514 => (1514, Error, 0, "{ expected"),
            CS1517 => (1517, Error, 0, "Invalid preprocessor expression"),
            CS1518 => (1518, Error, 0, "Expected class, delegate, enum, interface, or struct"),
            CS1519 => (1519, Error, 0, "Invalid token '{0}' in class, struct, or interface member declaration"),
            CS1576 => (1576, Error, 0, "The line number specified for #line directive is missing or invalid"),
            CS1587 => (1587, Warning, 2, "XML comment is not placed on a valid language element"),
            CS1633 => (1633, Warning, 1, "Unrecognized #pragma directive"),
            CS1634 => (1634, Warning, 1, "Expected disable or restore"),
            CS1646 => (1646, Error, 0, "Keyword, identifier, or string expected after verbatim specifier: @"),
            CS1691 => (1691, Warning, 1, "'{0}' is not a valid warning number"),
        }
    }

    pub const fn number(self) -> u16 {
        self.entry().0
    }

    pub const fn severity(self) -> Severity {
        self.entry().1
    }

    /// The warning level; `0` for non-warnings.
    pub const fn warning_level(self) -> u8 {
        self.entry().2
    }

    pub const fn template(self) -> &'static str {
        self.entry().3
    }

    /// Whether the given number names a warning in the catalog.
    ///
    /// Backed by a sorted index built on first use; `#pragma warning` lists
    /// are checked against it.
    pub fn is_valid_warning(number: u16) -> bool {
        WARNINGS.binary_search(&number).is_ok()
    }
}

/// Sorted numbers of all warning-severity codes.
static WARNINGS: Lazy<Vec<u16>> = Lazy::new(|| {
    if cfg!(debug_assertions) {
        let mut numbers: Vec<_> = Code::ALL.iter().map(|code| code.number()).collect();
        numbers.sort_unstable();
        numbers.dedup();
        assert_eq!(numbers.len(), Code::ALL.len(), "diagnostic codes are not unique");
    }

    Code::ALL
        .iter()
        .filter(|code| code.severity() == Warning)
        .map(|code| code.number())
        .collect()
});

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CS{:04}", self.number())
    }
}
