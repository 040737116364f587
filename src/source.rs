//! Page text acquisition.
//!
//! Extracting text from binary document formats is left to interchangeable
//! backends behind the [`PageSource`] trait. The crate ships
//! [`PlainTextSource`], which reads text that has already been extracted
//! (for example by `pdftotext`), with pages separated by form feeds.

use std::{
    ffi::OsStr,
    io,
    path::{Path, PathBuf},
};

use walkdir::WalkDir;

use crate::domain::Config;

/// The text of one page of a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    /// 1-based page number.
    pub number: usize,
    /// The raw text of the page.
    pub text: String,
}

impl Page {
    /// Create a page.
    pub fn new(number: usize, text: impl Into<String>) -> Self {
        Self {
            number,
            text: text.into(),
        }
    }
}

/// Errors produced by a [`PageSource`].
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// The document could not be read.
    #[error("document {} is unavailable: {source}", path.display())]
    Unavailable {
        /// The document path.
        path: PathBuf,
        /// The underlying I/O error.
        source: io::Error,
    },

    /// The document exists but is not in a format this source understands.
    #[error("document {} has an unsupported format", .0.display())]
    Unsupported(PathBuf),

    /// The source itself is unusable; no document can be read.
    #[error("page source is misconfigured: {0}")]
    Misconfigured(String),
}

impl SourceError {
    /// Whether the error affects every document rather than just one.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::Misconfigured(_))
    }
}

/// Supplies the text of a document, page by page.
///
/// Implementations must be shareable across threads, since documents are
/// read in parallel.
pub trait PageSource: Sync {
    /// The pages of the document at `path`, in order.
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be read or understood. An
    /// unreadable document must never be reported as empty text.
    fn page_text(&self, path: &Path) -> Result<Vec<Page>, SourceError>;
}

/// Reads UTF-8 text files, splitting pages on form feed characters.
#[derive(Debug, Clone)]
pub struct PlainTextSource {
    extensions: Vec<String>,
}

impl Default for PlainTextSource {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl PlainTextSource {
    /// Create a source accepting the given file extensions.
    #[must_use]
    pub const fn new(extensions: Vec<String>) -> Self {
        Self { extensions }
    }

    /// Create a source accepting the document extensions of the configuration.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.document_extensions().to_vec())
    }

    fn accepts(&self, path: &Path) -> bool {
        path.extension()
            .and_then(OsStr::to_str)
            .is_some_and(|ext| self.extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)))
    }
}

impl PageSource for PlainTextSource {
    fn page_text(&self, path: &Path) -> Result<Vec<Page>, SourceError> {
        if self.extensions.is_empty() {
            return Err(SourceError::Misconfigured(
                "no document extensions configured".to_string(),
            ));
        }

        if !self.accepts(path) {
            return Err(SourceError::Unsupported(path.to_path_buf()));
        }

        let text = std::fs::read_to_string(path).map_err(|source| match source.kind() {
            io::ErrorKind::InvalidData => SourceError::Unsupported(path.to_path_buf()),
            _ => SourceError::Unavailable {
                path: path.to_path_buf(),
                source,
            },
        })?;

        // `pdftotext` terminates every page, including the last, with a form feed.
        let text = text.strip_suffix('\u{c}').unwrap_or(&text);

        let pages: Vec<Page> = text
            .split('\u{c}')
            .enumerate()
            .map(|(i, page)| Page::new(i + 1, page))
            .collect();

        tracing::debug!("Read {} pages from {}", pages.len(), path.display());
        Ok(pages)
    }
}

/// Expand the given paths into a list of documents.
///
/// Files are taken as they are. Directories are walked recursively for files
/// whose extension the configuration recognises; their contents are sorted
/// so the corpus is built in a stable order.
#[must_use]
pub fn collect_documents(paths: &[PathBuf], config: &Config) -> Vec<PathBuf> {
    let mut documents = Vec::new();

    for path in paths {
        if !path.is_dir() {
            documents.push(path.clone());
            continue;
        }

        let mut found: Vec<PathBuf> = WalkDir::new(path)
            .into_iter()
            .filter_map(Result::ok)
            .filter(|entry| entry.file_type().is_file())
            .filter(|entry| {
                entry
                    .path()
                    .extension()
                    .and_then(OsStr::to_str)
                    .is_some_and(|ext| config.is_document_extension(ext))
            })
            .map(walkdir::DirEntry::into_path)
            .collect();
        found.sort();

        tracing::debug!("Found {} documents in {}", found.len(), path.display());
        documents.extend(found);
    }

    documents
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    #[test]
    fn pages_split_on_form_feed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("code.txt");
        fs::write(&path, "LOI 1\ntexte\u{c}LOI 2\nsuite\u{c}").unwrap();

        let pages = PlainTextSource::default().page_text(&path).unwrap();

        assert_eq!(
            pages,
            vec![Page::new(1, "LOI 1\ntexte"), Page::new(2, "LOI 2\nsuite")]
        );
    }

    #[test]
    fn text_without_form_feed_is_one_page() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("code.txt");
        fs::write(&path, "LOI 1\n").unwrap();

        let pages = PlainTextSource::default().page_text(&path).unwrap();
        assert_eq!(pages, vec![Page::new(1, "LOI 1\n")]);
    }

    #[test]
    fn missing_file_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let error = PlainTextSource::default()
            .page_text(&dir.path().join("missing.txt"))
            .unwrap_err();

        assert!(matches!(error, SourceError::Unavailable { .. }));
        assert!(!error.is_fatal());
    }

    #[test]
    fn unknown_extension_is_unsupported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("code.pdf");
        fs::write(&path, b"%PDF-1.7").unwrap();

        let error = PlainTextSource::default().page_text(&path).unwrap_err();
        assert!(matches!(error, SourceError::Unsupported(_)));
    }

    #[test]
    fn invalid_utf8_is_unsupported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("code.txt");
        fs::write(&path, [0xff, 0xfe, 0x00]).unwrap();

        let error = PlainTextSource::default().page_text(&path).unwrap_err();
        assert!(matches!(error, SourceError::Unsupported(_)));
    }

    #[test]
    fn no_extensions_is_fatal() {
        let error = PlainTextSource::new(Vec::new())
            .page_text(Path::new("code.txt"))
            .unwrap_err();
        assert!(error.is_fatal());
    }

    #[test]
    fn collect_walks_directories_in_sorted_order() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("annexes")).unwrap();
        fs::write(dir.path().join("b.txt"), "").unwrap();
        fs::write(dir.path().join("a.txt"), "").unwrap();
        fs::write(dir.path().join("notes.md"), "").unwrap();
        fs::write(dir.path().join("annexes").join("c.TXT"), "").unwrap();

        let explicit = PathBuf::from("elsewhere.pdf");
        let documents =
            collect_documents(&[dir.path().to_path_buf(), explicit.clone()], &Config::default());

        assert_eq!(
            documents,
            vec![
                dir.path().join("a.txt"),
                dir.path().join("annexes").join("c.TXT"),
                dir.path().join("b.txt"),
                explicit,
            ]
        );
    }
}
