//! Treebank reading
//!
//! A convenience layer for bulk input on top of [`Tree::from_text_with`]. It
//! adds no tree semantics of its own: every line goes through the same parser,
//! and the tree, traversal and codec contracts do not depend on this module.
//!
//! A treebank holds one bracketed tree per line; blank lines are skipped and
//! every line is normalized before parsing. Files ending in `.gz` are
//! decompressed on the fly.
//!
//! [`TreeReader`] reports every failure with its line number. [`Treebank`]
//! collects trees from a string, a file, several files or a glob pattern and
//! logs and skips whatever it cannot read.

use crate::error::TreeError;
use crate::text::TextOptions;
use crate::tree::Tree;
use flate2::read::MultiGzDecoder;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Cursor, Lines};
use std::path::{Path, PathBuf};

/// Reader yielding one tree per non-blank line
pub struct TreeReader<R: BufRead> {
    lines: Lines<R>,
    line_num: usize,
    options: TextOptions,
}

impl<R: BufRead> TreeReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            line_num: 0,
            options: TextOptions::default(),
        }
    }

    pub fn with_options(mut self, options: TextOptions) -> Self {
        self.options = options;
        self
    }
}

impl TreeReader<Box<dyn BufRead + Send>> {
    /// Create a reader from a file path, decompressing `.gz` files
    pub fn from_path(path: &Path) -> io::Result<Self> {
        let file = File::open(path)?;
        let reader: Box<dyn BufRead + Send> = if path.extension().is_some_and(|ext| ext == "gz") {
            Box::new(BufReader::new(MultiGzDecoder::new(file)))
        } else {
            Box::new(BufReader::new(file))
        };
        Ok(Self::new(reader))
    }
}

impl TreeReader<Cursor<String>> {
    /// Reader over in-memory text
    pub fn from_string(text: &str) -> Self {
        Self::new(Cursor::new(text.to_string()))
    }
}

impl<R: BufRead> Iterator for TreeReader<R> {
    type Item = Result<Tree, TreeError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            self.line_num += 1;
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(e) => return Some(Err(TreeError::at_line(self.line_num, e.into()))),
            };

            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            return Some(
                Tree::from_text_with(line, self.options)
                    .map_err(|e| TreeError::at_line(self.line_num, e)),
            );
        }
    }
}

/// Source of trees for a treebank
#[derive(Debug, Clone)]
enum TreeSource {
    /// Lines held in memory
    String(String),
    /// A single file
    File(PathBuf),
    /// Several files, read in order
    Files(Vec<PathBuf>),
}

/// Trees read from in-memory text or treebank files
///
/// # Examples
///
/// ```no_run
/// use parsetree::Treebank;
///
/// for tree in Treebank::from_glob("data/*.tree.gz").unwrap() {
///     for relation in tree.get_relations(None, true) {
///         println!("{}", relation);
///     }
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Treebank {
    source: TreeSource,
}

impl Treebank {
    /// One tree per line of `text`
    pub fn from_string(text: &str) -> Self {
        Self {
            source: TreeSource::String(text.to_string()),
        }
    }

    /// One treebank file, gzipped or plain
    pub fn from_file(path: impl AsRef<Path>) -> Self {
        Self {
            source: TreeSource::File(path.as_ref().to_path_buf()),
        }
    }

    /// Several treebank files, read in the given order
    pub fn from_paths(file_paths: Vec<PathBuf>) -> Self {
        Self {
            source: TreeSource::Files(file_paths),
        }
    }

    /// Every file matching `pattern`, read in path order
    pub fn from_glob(pattern: &str) -> Result<Self, glob::PatternError> {
        let mut file_paths: Vec<PathBuf> = glob::glob(pattern)?.filter_map(Result::ok).collect();
        file_paths.sort();
        Ok(Self::from_paths(file_paths))
    }

    /// Every tree or error, in source order
    pub fn try_iter(&self) -> Box<dyn Iterator<Item = Result<Tree, TreeError>> + Send> {
        match &self.source {
            TreeSource::String(text) => Box::new(TreeReader::from_string(text)),
            TreeSource::File(path) => file_trees(path.clone()),
            TreeSource::Files(paths) => Box::new(paths.clone().into_iter().flat_map(file_trees)),
        }
    }

    /// Readable trees only; failures are logged and skipped
    pub fn iter(&self) -> Box<dyn Iterator<Item = Tree> + Send> {
        Box::new(self.try_iter().filter_map(|result| match result {
            Ok(tree) => Some(tree),
            Err(e) => {
                tracing::warn!(error = %e, "skipping tree");
                None
            }
        }))
    }
}

impl IntoIterator for Treebank {
    type Item = Tree;
    type IntoIter = Box<dyn Iterator<Item = Self::Item> + Send>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Helper: open a file and return an iterator over its trees
///
/// A file that cannot be opened yields a single error.
fn file_trees(path: PathBuf) -> Box<dyn Iterator<Item = Result<Tree, TreeError>> + Send> {
    match TreeReader::from_path(&path) {
        Ok(reader) => Box::new(reader),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "failed to open treebank file");
            Box::new(std::iter::once(Err(TreeError::Io(e))))
        }
    }
}
