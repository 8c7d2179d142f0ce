//! The top-level parsing façade.

use crate::errors::{ParserError, ParserResult};
use crate::options::ParserOptions;
use crate::publication::{basename, Container, IssueKey};
use crate::schedule::ParseResult;
use crate::{epub, jwpub};
use std::fs;
use std::io::Read;
use std::path::Path;

/// Parses Meeting Workbook and Watchtower Study publications into
/// schedule records.
///
/// Options are frozen at construction; one instance may serve concurrent
/// calls. Each call is synchronous and works on a fully buffered input.
///
/// # Examples
/// ```no_run
/// # use jwsched::errors::ParserResult;
/// # fn main() -> ParserResult<()> {
/// let parser = jwsched::SchedulesParser::new();
/// let result = parser.parse_file("mwb_E_202401.jwpub")?;
///
/// for week in result.mwb_schedules().unwrap_or_default() {
///     println!("{:?}: {:?}", week.week_date, week.song_first);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug, Default)]
pub struct SchedulesParser {
    options: ParserOptions,
}

impl SchedulesParser {
    /// Creates a parser with default [`ParserOptions`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a parser with the specified [`ParserOptions`].
    ///
    /// # Examples
    /// ```
    /// # use jwsched::{ParserOptions, SchedulesParser};
    /// let parser = SchedulesParser::with_options(
    ///     ParserOptions::builder().max_entries(50),
    /// );
    /// ```
    pub fn with_options(options: impl Into<ParserOptions>) -> Self {
        Self {
            options: options.into(),
        }
    }

    /// The options this parser was constructed with.
    pub fn options(&self) -> &ParserOptions {
        &self.options
    }

    /// Parses a publication file from the given [`Path`].
    ///
    /// The file's basename must follow the publication naming
    /// convention; it carries the issue metadata.
    ///
    /// # Errors
    /// - [`ParserError::InvalidFilename`] / [`ParserError::UnsupportedIssue`]:
    ///   the filename is rejected before any bytes are read.
    /// - Any archive, database, or content error from the pipeline.
    pub fn parse_file(&self, path: impl AsRef<Path>) -> ParserResult<ParseResult> {
        let path = path.as_ref();
        let filename = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or_default()
            .to_owned();
        let issue = IssueKey::from_filename(&filename)?;

        let data = fs::read(path)?;
        self.parse_issue(&data, &issue)
    }

    /// Parses a publication from a reader, buffering it fully.
    ///
    /// See [`Self::parse_bytes`] for the filename contract.
    pub fn parse_reader(&self, mut reader: impl Read, filename: &str) -> ParserResult<ParseResult> {
        let issue = IssueKey::from_filename(filename)?;

        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        self.parse_issue(&data, &issue)
    }

    /// Parses a publication from a byte buffer.
    ///
    /// `filename` may be a bare basename or any path-like string ending
    /// in one; only the basename is classified.
    pub fn parse_bytes(&self, data: &[u8], filename: &str) -> ParserResult<ParseResult> {
        let issue = IssueKey::from_filename(basename(filename))?;
        self.parse_issue(data, &issue)
    }

    fn parse_issue(&self, data: &[u8], issue: &IssueKey) -> ParserResult<ParseResult> {
        // Oversized inputs are rejected before any archive or
        // cryptographic work happens.
        if data.len() as u64 > self.options.max_total_bytes {
            return Err(ParserError::FileTooLarge {
                limit: self.options.max_total_bytes,
            });
        }

        tracing::debug!(
            publication = %issue.publication_type,
            language = %issue.language,
            year = issue.year,
            month = issue.month,
            "parsing publication"
        );

        match issue.container {
            Container::Jwpub => jwpub::parse(data, issue, &self.options),
            Container::Epub => epub::parse(data, issue, &self.options),
        }
    }
}
