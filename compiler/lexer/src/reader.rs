//! The character-level reader over the compilation's source buffers.

use span::{Position, SourceFileIndex, SourceMap};
use std::rc::Rc;

/// The character returned once a buffer is exhausted. Embedded NULs in
/// input are rewritten to spaces so the sentinel stays unambiguous.
pub const END_OF_BUFFER: char = '\0';

/// Presents one buffer at a time as a character stream with line/column
/// tracking and newline normalization (`\r` and `\r\n` fold to `\n`).
pub struct Reader<'a> {
    map: &'a SourceMap,
    /// Index into the map of the next buffer to load.
    next: usize,
    file: Option<SourceFileIndex>,
    chars: Vec<char>,
    state: State,
    saved: Option<State>,
}

/// The resettable part of the reader: the cursor and its positions.
#[derive(Clone, Copy)]
struct State {
    current: char,
    /// Index of the next unread character.
    index: usize,
    position: Position,
    last_position: Position,
    /// Set after reading a newline; the line increment is deferred so the
    /// newline itself is reported on the line it terminates.
    at_end_of_line: bool,
}

impl Default for State {
    fn default() -> Self {
        // `current` is never observed before the priming advance
        Self {
            current: '\n',
            index: 0,
            position: Position::new(1, 0),
            last_position: Position::new(1, 0),
            at_end_of_line: false,
        }
    }
}

impl<'a> Reader<'a> {
    pub fn new(map: &'a SourceMap) -> Self {
        Self {
            map,
            next: 0,
            file: None,
            chars: Vec::new(),
            state: State::default(),
            saved: None,
        }
    }

    /// Move to the next buffer. Returns `false` once all are consumed.
    pub fn next_source(&mut self) -> bool {
        let Some((index, file)) = self.map.file_at(self.next) else {
            self.file = None;
            return false;
        };

        self.chars = file.content().chars().collect();
        self.file = Some(index);
        self.next += 1;
        self.state = State::default();
        self.saved = None;
        true
    }

    /// Whether a buffer is loaded, loading the next one if necessary.
    pub fn ensure_valid_source(&mut self) -> bool {
        self.file.is_some() || self.next_source()
    }

    pub fn file(&self) -> SourceFileIndex {
        self.file.expect("no source buffer is loaded")
    }

    pub fn name(&self) -> Rc<str> {
        self.map[self.file()].name().clone()
    }

    /// The most recently read character.
    pub fn current(&self) -> char {
        self.state.current
    }

    /// The position of the most recently read character.
    pub fn position(&self) -> Position {
        self.state.position
    }

    /// The position of the character read before the current one.
    pub fn last_position(&self) -> Position {
        self.state.last_position
    }

    /// Read the next character, or [`END_OF_BUFFER`] once exhausted.
    pub fn advance(&mut self) -> char {
        assert!(self.file.is_some(), "attempt to read before a source buffer is loaded");

        let state = &mut self.state;

        if state.index >= self.chars.len() {
            state.last_position = state.position;
            // settle one position past the last character, once
            if state.current != END_OF_BUFFER {
                if state.at_end_of_line {
                    state.position = Position::new(state.position.line + 1, 1);
                    state.at_end_of_line = false;
                } else {
                    state.position.column += 1;
                }
            }
            state.current = END_OF_BUFFER;
            return END_OF_BUFFER;
        }

        let mut character = self.chars[state.index];
        state.index += 1;

        match character {
            '\r' => {
                if self.chars.get(state.index) == Some(&'\n') {
                    state.index += 1;
                }
                character = '\n';
            }
            // the NUL sentinel is reserved for end-of-buffer
            '\0' => character = ' ',
            _ => {}
        }

        state.last_position = state.position;
        if state.at_end_of_line {
            state.position = Position::new(state.position.line + 1, 0);
            state.at_end_of_line = false;
        }
        state.position.column += 1;

        if character == '\n' {
            state.at_end_of_line = true;
        }

        state.current = character;
        character
    }

    /// Consume whitespace, stopping at newlines unless told to skip them.
    /// Returns the first character not consumed.
    pub fn skip_whitespace(&mut self, skip_newlines: bool) -> char {
        loop {
            let character = self.state.current;
            if character == '\n' && !skip_newlines {
                return character;
            }
            if character == END_OF_BUFFER || !character.is_whitespace() {
                return character;
            }
            self.advance();
        }
    }

    /// Snapshot the cursor. A single slot: overlapping saves are a caller
    /// bug.
    pub fn save_state(&mut self) {
        assert!(self.saved.is_none(), "overlapping reader state saves");
        self.saved = Some(self.state);
    }

    /// Roll the cursor back to the last [`save_state`](Self::save_state).
    pub fn restore_state(&mut self) {
        self.state = self.saved.take().expect("restore without a saved reader state");
    }

    /// Drop the saved snapshot, keeping the cursor where it is.
    pub fn forget_state(&mut self) {
        assert!(self.saved.take().is_some(), "forget without a saved reader state");
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn map(source: &str) -> SourceMap {
        let mut map = SourceMap::default();
        map.add("reader.cs", source);
        map
    }

    #[test]
    fn advance_tracks_lines_and_columns() {
        let map = map("ab\nc");
        let mut reader = Reader::new(&map);
        assert!(reader.next_source());

        assert_eq!(reader.advance(), 'a');
        assert_eq!(reader.position(), Position::new(1, 1));
        assert_eq!(reader.advance(), 'b');
        assert_eq!(reader.position(), Position::new(1, 2));
        // the newline is reported on the line it terminates
        assert_eq!(reader.advance(), '\n');
        assert_eq!(reader.position(), Position::new(1, 3));
        assert_eq!(reader.advance(), 'c');
        assert_eq!(reader.position(), Position::new(2, 1));
        assert_eq!(reader.last_position(), Position::new(1, 3));

        assert_eq!(reader.advance(), END_OF_BUFFER);
        assert_eq!(reader.position(), Position::new(2, 2));
        // the end position settles
        assert_eq!(reader.advance(), END_OF_BUFFER);
        assert_eq!(reader.position(), Position::new(2, 2));
    }

    #[test]
    fn line_endings_fold_to_a_single_newline() {
        let map = map("a\r\nb\rc");
        let mut reader = Reader::new(&map);
        reader.next_source();

        let mut characters = String::new();
        loop {
            match reader.advance() {
                END_OF_BUFFER => break,
                character => characters.push(character),
            }
        }
        assert_eq!(characters, "a\nb\nc");
    }

    #[test]
    fn embedded_nul_reads_as_a_space() {
        let map = map("a\0b");
        let mut reader = Reader::new(&map);
        reader.next_source();

        reader.advance();
        assert_eq!(reader.advance(), ' ');
        assert_eq!(reader.advance(), 'b');
    }

    #[test]
    fn save_and_restore_round_trip() {
        let map = map("xyz");
        let mut reader = Reader::new(&map);
        reader.next_source();

        assert_eq!(reader.advance(), 'x');
        reader.save_state();
        assert_eq!(reader.advance(), 'y');
        assert_eq!(reader.advance(), 'z');
        reader.restore_state();

        assert_eq!(reader.current(), 'x');
        assert_eq!(reader.position(), Position::new(1, 1));
        assert_eq!(reader.advance(), 'y');
    }

    #[test]
    #[should_panic(expected = "overlapping reader state saves")]
    fn overlapping_saves_are_rejected() {
        let map = map("xy");
        let mut reader = Reader::new(&map);
        reader.next_source();
        reader.save_state();
        reader.save_state();
    }

    #[test]
    #[should_panic(expected = "before a source buffer is loaded")]
    fn reading_before_loading_a_buffer() {
        let map = SourceMap::default();
        Reader::new(&map).advance();
    }

    #[test]
    fn buffers_are_walked_in_order() {
        let mut map = SourceMap::default();
        map.add("one.cs", "1");
        map.add("two.cs", "2");
        let mut reader = Reader::new(&map);

        assert!(reader.ensure_valid_source());
        assert_eq!(&*reader.name(), "one.cs");
        assert!(reader.next_source());
        assert_eq!(&*reader.name(), "two.cs");
        assert!(!reader.next_source());
    }
}
