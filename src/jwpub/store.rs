//! Read-only access to the embedded publication database.
//!
//! The database arrives as bytes inside the inner archive. SQLite opens
//! files, not buffers, so the bytes are staged in a named temporary file
//! that is removed on every exit path, including failures.

use crate::errors::{ParserError, ParserResult};
use rusqlite::{Connection, OpenFlags, OptionalExtension};
use std::io::Write;
use tempfile::NamedTempFile;

/// `Document.Class` codes queried by the parser.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum DocumentClass {
    /// One Meeting Workbook week per document.
    MwbWeek = 106,
    /// The Watchtower table of contents.
    WatchtowerToc = 68,
    /// One Watchtower study article per document.
    WatchtowerArticle = 40,
}

/// The publication identity row, input to key derivation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct PublicationRow {
    pub(crate) meps_language_index: i64,
    pub(crate) symbol: String,
    pub(crate) year: i64,
    pub(crate) issue_tag: i64,
}

/// One open publication database.
///
/// The temporary backing file outlives the connection and is deleted
/// when the store drops.
pub(crate) struct DocumentStore {
    connection: Connection,
    _backing: NamedTempFile,
}

impl DocumentStore {
    /// Stages the database bytes and opens them read-only.
    ///
    /// # Errors
    /// - [`ParserError::Io`]: the temporary file cannot be created.
    /// - [`ParserError::InvalidDatabase`]: SQLite rejects the file.
    pub(crate) fn open(database: &[u8]) -> ParserResult<Self> {
        let mut backing = NamedTempFile::with_prefix("jwpub_")?;
        backing.write_all(database)?;
        backing.flush()?;

        let connection = Connection::open_with_flags(
            backing.path(),
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(|error| ParserError::InvalidDatabase(error.to_string()))?;

        Ok(Self {
            connection,
            _backing: backing,
        })
    }

    /// The publication identity row.
    ///
    /// # Errors
    /// [`ParserError::InvalidDatabase`] when the `Publication` relation
    /// is missing or empty.
    pub(crate) fn publication(&self) -> ParserResult<PublicationRow> {
        self.connection
            .query_row(
                "SELECT MepsLanguageIndex, Symbol, Year, IssueTagNumber FROM Publication LIMIT 1",
                [],
                |row| {
                    Ok(PublicationRow {
                        meps_language_index: row.get(0)?,
                        symbol: row.get(1)?,
                        year: row.get(2)?,
                        issue_tag: row.get(3)?,
                    })
                },
            )
            .optional()
            .map_err(|error| ParserError::InvalidDatabase(error.to_string()))?
            .ok_or_else(|| ParserError::InvalidDatabase("Publication table is empty".to_owned()))
    }

    /// Content blobs of every document of `class`, in natural row order.
    pub(crate) fn contents(&self, class: DocumentClass) -> ParserResult<Vec<Vec<u8>>> {
        let mut statement = self
            .connection
            .prepare("SELECT Content FROM Document WHERE Class = ?1")
            .map_err(|error| ParserError::InvalidDatabase(error.to_string()))?;

        let rows = statement
            .query_map([class as i64], |row| row.get::<_, Vec<u8>>(0))
            .map_err(|error| ParserError::InvalidDatabase(error.to_string()))?;

        rows.collect::<Result<_, _>>()
            .map_err(|error| ParserError::InvalidDatabase(error.to_string()))
    }

    /// Identifier and content blob of every study article document.
    pub(crate) fn article_contents(&self) -> ParserResult<Vec<(i64, Vec<u8>)>> {
        let mut statement = self
            .connection
            .prepare("SELECT MepsDocumentId, Content FROM Document WHERE Class = ?1")
            .map_err(|error| ParserError::InvalidDatabase(error.to_string()))?;

        let rows = statement
            .query_map([DocumentClass::WatchtowerArticle as i64], |row| {
                Ok((row.get::<_, i64>(0)?, row.get::<_, Vec<u8>>(1)?))
            })
            .map_err(|error| ParserError::InvalidDatabase(error.to_string()))?;

        rows.collect::<Result<_, _>>()
            .map_err(|error| ParserError::InvalidDatabase(error.to_string()))
    }
}
