//! Error-related types for schedule parsing.

use crate::publication::PublicationType;
use std::io;

/// Alias for `Result<T, ParserError>`.
pub type ParserResult<T> = Result<T, ParserError>;

/// Possible errors while parsing a publication.
///
/// Every variant maps to exactly one [`ErrorCode`], retrievable through
/// [`ParserError::code`], so callers can branch on the flat tag set without
/// destructuring variant payloads.
#[non_exhaustive]
#[derive(thiserror::Error, Debug)]
pub enum ParserError {
    ////////////////////////////////////////////////////////////////////////////////
    // Input rejections (no bytes inspected yet)
    ////////////////////////////////////////////////////////////////////////////////
    /// The filename does not follow the publication naming convention:
    /// `{mwb|w}_LANG_YYYYMM.{jwpub|epub}` with `LANG` 1-3 ASCII uppercase letters.
    #[error(
        "Invalid filename `{0}`: expected mwb_LANG_YYYYMM.jwpub/epub or w_LANG_YYYYMM.jwpub/epub"
    )]
    InvalidFilename(String),

    /// The publication issue predates the minimum supported month.
    ///
    /// Meeting Workbooks are supported from July 2022, Watchtower Study
    /// editions from April 2023.
    #[error("Unsupported {publication} issue {issue}: issues before {minimum} cannot be parsed")]
    UnsupportedIssue {
        /// The publication family the filename resolved to.
        publication: PublicationType,
        /// The rejected issue as `year * 100 + month`.
        issue: u32,
        /// The oldest supported issue as `year * 100 + month`.
        minimum: u32,
    },

    /// The container format cannot be determined from the filename.
    #[error("Unsupported container format: {0}")]
    UnsupportedFormat(String),

    ////////////////////////////////////////////////////////////////////////////////
    // Archive safety
    ////////////////////////////////////////////////////////////////////////////////
    /// The byte buffer is not a readable ZIP archive.
    #[error("Invalid archive")]
    InvalidArchive(#[source] io::Error),

    /// The input or its decompressed contents exceed the configured size cap.
    #[error("Publication exceeds the size limit of {limit} bytes")]
    FileTooLarge {
        /// The configured cap in bytes.
        limit: u64,
    },

    /// The archive holds more entries than the configured cap.
    #[error("Publication contains more than {limit} entries")]
    TooManyFiles {
        /// The configured entry cap.
        limit: usize,
    },

    /// An entry path escapes the logical archive root (zip-slip).
    #[error("Publication contains a suspicious entry path: {entry}")]
    SuspiciousContent {
        /// The offending entry name as stored in the archive.
        entry: String,
    },

    ////////////////////////////////////////////////////////////////////////////////
    // Content
    ////////////////////////////////////////////////////////////////////////////////
    /// The embedded database is missing, has no `Publication` row,
    /// or a query against it failed.
    #[error("Invalid publication database: {0}")]
    InvalidDatabase(String),

    /// A content blob could not be decrypted, and the plain-inflation
    /// fallback failed as well.
    #[error("Failed to decrypt publication content")]
    DecryptionFailed,

    /// The publication archive is readable but its documents do not have
    /// the expected shape.
    #[error("Malformed publication content: {0}")]
    MalformedContent(String),

    /// Unexpected I/O failure, such as staging the embedded database
    /// to a temporary file.
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl ParserError {
    /// The flat error tag for this failure.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::InvalidFilename(_) => ErrorCode::InvalidFilename,
            Self::UnsupportedIssue { .. } => ErrorCode::UnsupportedIssue,
            Self::UnsupportedFormat(_) => ErrorCode::UnsupportedFormat,
            Self::InvalidArchive(_) => ErrorCode::InvalidArchive,
            Self::FileTooLarge { .. } => ErrorCode::FileTooLarge,
            Self::TooManyFiles { .. } => ErrorCode::TooManyFiles,
            Self::SuspiciousContent { .. } => ErrorCode::SuspiciousContent,
            Self::InvalidDatabase(_) => ErrorCode::InvalidDatabase,
            Self::DecryptionFailed => ErrorCode::DecryptionFailed,
            Self::MalformedContent(_) => ErrorCode::MalformedContent,
            Self::Io(_) => ErrorCode::IoError,
        }
    }
}

/// Flat failure tags, one per [`ParserError`] variant.
#[non_exhaustive]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// See [`ParserError::InvalidFilename`].
    InvalidFilename,
    /// See [`ParserError::UnsupportedIssue`].
    UnsupportedIssue,
    /// See [`ParserError::UnsupportedFormat`].
    UnsupportedFormat,
    /// See [`ParserError::InvalidArchive`].
    InvalidArchive,
    /// See [`ParserError::FileTooLarge`].
    FileTooLarge,
    /// See [`ParserError::TooManyFiles`].
    TooManyFiles,
    /// See [`ParserError::SuspiciousContent`].
    SuspiciousContent,
    /// See [`ParserError::InvalidDatabase`].
    InvalidDatabase,
    /// See [`ParserError::DecryptionFailed`].
    DecryptionFailed,
    /// See [`ParserError::MalformedContent`].
    MalformedContent,
    /// See [`ParserError::Io`].
    IoError,
}
