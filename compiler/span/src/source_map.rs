//! The ordered collection of named source buffers a compilation reads.

use std::{fmt, io, ops::Index, rc::Rc};

/// A mapping from [index](SourceFileIndex) to [source buffer](SourceFile).
///
/// Buffers are scanned in insertion order; the scanner walks them front to
/// back, one at a time.
#[derive(Default)]
pub struct SourceMap {
    files: Vec<SourceFile>,
}

impl SourceMap {
    /// Add text to the map creating a [`SourceFile`] in the process.
    pub fn add(&mut self, name: impl Into<Rc<str>>, content: impl Into<String>) -> SourceFileIndex {
        let index = SourceFileIndex(self.files.len() as u32);
        self.files.push(SourceFile { name: name.into(), content: content.into() });
        index
    }

    /// Open a buffer given only its name and add it to the map.
    pub fn load(
        &mut self,
        name: impl Into<Rc<str>>,
        loader: &dyn SourceLoader,
    ) -> io::Result<SourceFileIndex> {
        let name = name.into();
        let content = loader.load(&name)?;
        Ok(self.add(name, content))
    }

    pub fn files(&self) -> impl Iterator<Item = &SourceFile> {
        self.files.iter()
    }

    /// The buffer at the given position in insertion order.
    pub fn file_at(&self, position: usize) -> Option<(SourceFileIndex, &SourceFile)> {
        let file = self.files.get(position)?;
        Some((SourceFileIndex(position as u32), file))
    }

    pub fn get(&self, index: SourceFileIndex) -> Option<&SourceFile> {
        self.files.get(index.0 as usize)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl Index<SourceFileIndex> for SourceMap {
    type Output = SourceFile;

    fn index(&self, index: SourceFileIndex) -> &Self::Output {
        &self.files[index.0 as usize]
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct SourceFileIndex(u32);

impl fmt::Debug for SourceFileIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}f", self.0)
    }
}

/// A named text buffer.
pub struct SourceFile {
    name: Rc<str>,
    content: String,
}

impl SourceFile {
    pub fn name(&self) -> &Rc<str> {
        &self.name
    }

    pub fn content(&self) -> &str {
        &self.content
    }
}

/// Opens buffers that were supplied by name only.
///
/// The default implementation reads from the file system; tests and embedders
/// inject their own.
pub trait SourceLoader {
    fn load(&self, name: &str) -> io::Result<String>;
}

pub struct FileSystemLoader;

impl SourceLoader for FileSystemLoader {
    fn load(&self, name: &str) -> io::Result<String> {
        std::fs::read_to_string(name)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::io;

    #[test]
    fn buffers_are_kept_in_insertion_order() {
        let mut map = SourceMap::default();
        let one = map.add("one.cs", "1");
        let two = map.add("two.cs", "2");

        assert_eq!(&**map[one].name(), "one.cs");
        assert_eq!(map[two].content(), "2");
        assert_eq!(
            map.files().map(|file| &**file.name()).collect::<Vec<_>>(),
            ["one.cs", "two.cs"],
        );
    }

    #[test]
    fn loader_failures_propagate() {
        struct Failing;

        impl SourceLoader for Failing {
            fn load(&self, _: &str) -> io::Result<String> {
                Err(io::Error::new(io::ErrorKind::NotFound, "no such buffer"))
            }
        }

        let mut map = SourceMap::default();
        assert!(map.load("missing.cs", &Failing).is_err());
        assert!(map.is_empty());
    }
}
