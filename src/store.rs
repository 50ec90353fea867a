use std::{
    fmt,
    fs::File,
    io::{self, Read, Write},
    path::{Path, PathBuf},
};

use serde_json::Value;

use crate::book::{Book, BookStatus};

/// Custom error type for library store operations
#[derive(Debug)]
pub enum LibraryError {
    /// A stored record is missing required fields or has uncoercible values
    MalformedRecord(String),
    /// A status outside the two-value enumeration was supplied
    InvalidStatus(String),
    /// An I/O failure other than "file does not exist"
    Storage(String),
}

impl std::error::Error for LibraryError {}

impl fmt::Display for LibraryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MalformedRecord(reason) => write!(f, "malformed library record: {reason}"),
            Self::InvalidStatus(value) => {
                write!(f, "invalid status '{value}': use 'available' or 'checked-out'")
            }
            Self::Storage(reason) => write!(f, "storage error: {reason}"),
        }
    }
}

/// Optional filters applied conjunctively by [`LibraryStore::search`]
#[derive(Debug, Clone, Default)]
pub struct SearchQuery {
    /// Case-insensitive substring match on the title
    pub title: Option<String>,
    /// Case-insensitive substring match on the author
    pub author: Option<String>,
    /// Exact match on the publication year
    pub year: Option<i32>,
}

/// Handle to a JSON-file-backed book collection.
///
/// The store owns the persisted representation exclusively; callers always
/// receive value snapshots of records. Every operation reloads the full
/// collection from the storage location, applies its logic, and for
/// mutations rewrites the whole file before returning.
#[derive(Debug, Clone)]
pub struct LibraryStore {
    /// Location of the JSON file holding the collection
    path: PathBuf,
}

impl LibraryStore {
    /// Create a store handle bound to the given storage location
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Storage location this store reads and writes
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the full collection from the storage location.
    ///
    /// A missing file, or contents that do not parse as a JSON array, are
    /// the recoverable "empty library" condition and yield an empty vector.
    ///
    /// # Errors
    ///
    /// Returns `LibraryError::Storage` for I/O failures other than a
    /// missing file, and `LibraryError::MalformedRecord` when an array
    /// element cannot be decoded into a record.
    pub fn load(&self) -> Result<Vec<Book>, LibraryError> {
        let mut file = match File::open(&self.path) {
            Ok(file) => file,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => {
                return Err(LibraryError::Storage(format!(
                    "failed to open {}: {err}",
                    self.path.display()
                )));
            }
        };

        let mut contents = String::new();
        file.read_to_string(&mut contents).map_err(|err| {
            LibraryError::Storage(format!("failed to read {}: {err}", self.path.display()))
        })?;

        // A file that is not a JSON array at all counts as an empty library.
        let Ok(values) = serde_json::from_str::<Vec<Value>>(&contents) else {
            return Ok(Vec::new());
        };

        values.iter().map(Book::from_value).collect()
    }

    /// Serialize the full ordered collection and overwrite the storage
    /// location completely, confirming the write on success.
    ///
    /// # Errors
    ///
    /// Returns `LibraryError::Storage` if serialization or any write step
    /// fails. Durability of the prior contents in that case is undefined;
    /// there is no temp-file-and-rename step.
    pub fn save(&self, books: &[Book]) -> Result<(), LibraryError> {
        let serialized = serde_json::to_string_pretty(books)
            .map_err(|err| LibraryError::Storage(format!("failed to serialize library: {err}")))?;

        let mut file = File::create(&self.path).map_err(|err| {
            LibraryError::Storage(format!("failed to create {}: {err}", self.path.display()))
        })?;

        file.write_all(serialized.as_bytes()).map_err(|err| {
            LibraryError::Storage(format!("failed to write {}: {err}", self.path.display()))
        })?;

        println!("PERSISTENCE: library data written to {}", self.path.display());

        Ok(())
    }

    /// Add a new record with a freshly assigned id and default status,
    /// appended after all existing records.
    ///
    /// The new id is one more than the largest id currently in the
    /// collection, or 1 for an empty library. Ids of removed records are
    /// not tracked, so gaps stay gaps. No duplicate detection is done.
    ///
    /// # Errors
    ///
    /// Propagates any load or save failure.
    #[allow(clippy::arithmetic_side_effects)]
    pub fn add(&self, title: &str, author: &str, year: i32) -> Result<Book, LibraryError> {
        let mut books = self.load()?;

        let next_id = books.iter().map(|book| book.id).max().unwrap_or(0) + 1;
        let book = Book {
            id: next_id,
            title: title.to_string(),
            author: author.to_string(),
            year,
            status: BookStatus::default(),
        };

        books.push(book.clone());
        self.save(&books)?;

        Ok(book)
    }

    /// Remove the record with the given id.
    ///
    /// Returns `true` and saves when a record was removed; returns `false`
    /// without touching the file when no record matched.
    ///
    /// # Errors
    ///
    /// Propagates any load or save failure.
    pub fn remove(&self, id: u64) -> Result<bool, LibraryError> {
        let mut books = self.load()?;

        let before = books.len();
        books.retain(|book| book.id != id);
        if books.len() == before {
            return Ok(false);
        }

        self.save(&books)?;
        Ok(true)
    }

    /// Set the status of the record with the given id.
    ///
    /// Status validity is enforced by the [`BookStatus`] type before any
    /// I/O happens; parsing a label is the rejection boundary. Returns
    /// `true` and saves when the record was updated; returns `false`
    /// without saving when no record matched.
    ///
    /// # Errors
    ///
    /// Propagates any load or save failure.
    pub fn update_status(&self, id: u64, status: BookStatus) -> Result<bool, LibraryError> {
        let mut books = self.load()?;

        let Some(book) = books.iter_mut().find(|book| book.id == id) else {
            return Ok(false);
        };
        book.status = status;

        self.save(&books)?;
        Ok(true)
    }

    /// Return the full collection unfiltered, in stored order
    ///
    /// # Errors
    ///
    /// Propagates any load failure.
    pub fn list(&self) -> Result<Vec<Book>, LibraryError> {
        self.load()
    }

    /// Return the records matching all provided filters, in stored order.
    ///
    /// Filters apply conjunctively: case-insensitive substring on title,
    /// case-insensitive substring on author, exact year. Unset or empty
    /// filters are not applied. Read-only; nothing is saved.
    ///
    /// # Errors
    ///
    /// Propagates any load failure.
    pub fn search(&self, query: &SearchQuery) -> Result<Vec<Book>, LibraryError> {
        let mut results = self.load()?;

        if let Some(title) = query.title.as_deref().filter(|text| !text.is_empty()) {
            let needle = title.to_lowercase();
            results.retain(|book| book.title.to_lowercase().contains(needle.as_str()));
        }
        if let Some(author) = query.author.as_deref().filter(|text| !text.is_empty()) {
            let needle = author.to_lowercase();
            results.retain(|book| book.author.to_lowercase().contains(needle.as_str()));
        }
        if let Some(year) = query.year {
            results.retain(|book| book.year == year);
        }

        Ok(results)
    }
}

// Include tests module
#[cfg(test)]
mod tests;
