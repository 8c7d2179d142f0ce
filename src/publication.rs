//! Publication identity: filename classification and issue metadata.

use crate::errors::{ParserError, ParserResult};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};
use std::sync::LazyLock;

/// Oldest supported Meeting Workbook issue (`year * 100 + month`).
const MIN_MWB_ISSUE: u32 = 202207;
/// Oldest supported Watchtower Study issue (`year * 100 + month`).
const MIN_W_ISSUE: u32 = 202304;

static MWB_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^mwb_([A-Z]{1,3})_(20[2-9]\d)(0[1-9]|1[0-2])\.(jwpub|epub)$")
        .expect("valid mwb filename pattern")
});

static W_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^w_([A-Z]{1,3})_(20[2-9]\d)(0[1-9]|1[0-2])\.(jwpub|epub)$")
        .expect("valid w filename pattern")
});

/// The two supported publication families.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PublicationType {
    /// Meeting Workbook (`mwb`): the midweek-meeting schedule publication.
    #[serde(rename = "MWB")]
    Mwb,
    /// Watchtower Study edition (`w`): the weekend study-article publication.
    #[serde(rename = "WATCHTOWER")]
    Watchtower,
}

impl PublicationType {
    fn minimum_issue(self) -> u32 {
        match self {
            Self::Mwb => MIN_MWB_ISSUE,
            Self::Watchtower => MIN_W_ISSUE,
        }
    }
}

impl Display for PublicationType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Mwb => "Meeting Workbook",
            Self::Watchtower => "Watchtower Study",
        })
    }
}

/// The two supported container formats.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Container {
    /// Nested-ZIP publication wrapping an encrypted embedded database.
    Jwpub,
    /// Conventional ZIP of HTML/XHTML documents.
    Epub,
}

impl Container {
    /// Determines the container from a filename extension.
    ///
    /// # Errors
    /// [`ParserError::UnsupportedFormat`] when the extension is neither
    /// `jwpub` nor `epub`.
    pub fn from_filename(filename: &str) -> ParserResult<Self> {
        let basename = basename(filename);
        let extension = basename.rsplit_once('.').map(|(_, ext)| ext).unwrap_or("");

        if extension.eq_ignore_ascii_case("jwpub") {
            Ok(Self::Jwpub)
        } else if extension.eq_ignore_ascii_case("epub") {
            Ok(Self::Epub)
        } else {
            Err(ParserError::UnsupportedFormat(basename.to_owned()))
        }
    }
}

/// Identity of one publication issue, recovered from its filename.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct IssueKey {
    /// The publication family.
    pub publication_type: PublicationType,
    /// The language tag, kept in the case it appears in the filename.
    pub language: String,
    /// Four-digit issue year.
    pub year: i32,
    /// Issue month, `1..=12`.
    pub month: u8,
    /// The container format.
    pub container: Container,
}

impl IssueKey {
    /// Classifies a path-like string against the publication naming
    /// convention `{mwb|w}_LANG_YYYYMM.{jwpub|epub}`.
    ///
    /// Only the trailing basename is inspected; directories and URL
    /// prefixes are ignored.
    ///
    /// # Errors
    /// - [`ParserError::InvalidFilename`]: neither pattern matches.
    /// - [`ParserError::UnsupportedIssue`]: the issue predates the
    ///   publication minimum (`mwb` 2022-07, `w` 2023-04).
    pub fn from_filename(filename: &str) -> ParserResult<Self> {
        let basename = basename(filename);

        let (publication_type, captures) = if let Some(captures) = MWB_PATTERN.captures(basename) {
            (PublicationType::Mwb, captures)
        } else if let Some(captures) = W_PATTERN.captures(basename) {
            (PublicationType::Watchtower, captures)
        } else {
            return Err(ParserError::InvalidFilename(basename.to_owned()));
        };

        // The pattern pins each group to digits/letters; parses cannot fail.
        let language = captures[1].to_owned();
        let year: i32 = captures[2].parse().unwrap_or_default();
        let month: u8 = captures[3].parse().unwrap_or_default();
        let container = Container::from_filename(basename)?;

        let issue = year as u32 * 100 + u32::from(month);
        let minimum = publication_type.minimum_issue();
        if issue < minimum {
            return Err(ParserError::UnsupportedIssue {
                publication: publication_type,
                issue,
                minimum,
            });
        }

        Ok(Self {
            publication_type,
            language,
            year,
            month,
            container,
        })
    }
}

/// Reduces a path or URL to its trailing basename.
///
/// Splits on `/` and `\`, whichever occurs later.
pub(crate) fn basename(path: &str) -> &str {
    match path.rfind(['/', '\\']) {
        Some(index) => &path[index + 1..],
        None => path,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorCode;

    #[test]
    fn classifies_mwb_and_watchtower() {
        let issue = IssueKey::from_filename("mwb_E_202401.jwpub").unwrap();

        assert_eq!(PublicationType::Mwb, issue.publication_type);
        assert_eq!("E", issue.language);
        assert_eq!(2024, issue.year);
        assert_eq!(1, issue.month);
        assert_eq!(Container::Jwpub, issue.container);

        let issue = IssueKey::from_filename("w_POL_202312.epub").unwrap();

        assert_eq!(PublicationType::Watchtower, issue.publication_type);
        assert_eq!("POL", issue.language);
        assert_eq!(Container::Epub, issue.container);
    }

    #[test]
    fn reduces_to_basename() {
        let issue = IssueKey::from_filename("/downloads/2024\\mwb_U_202403.epub").unwrap();

        assert_eq!("U", issue.language);
        assert_eq!(3, issue.month);
    }

    #[test]
    fn rejects_unrelated_filenames() {
        for filename in [
            "",
            "mwb.jwpub",
            "mwb_E_202401.zip",
            "mwb_TOOLONG_202401.jwpub",
            "w_E_201912.epub",
            "notes_E_202401.jwpub",
        ] {
            let error = IssueKey::from_filename(filename).unwrap_err();
            assert_eq!(ErrorCode::InvalidFilename, error.code(), "{filename}");
        }
    }

    #[test]
    fn enforces_minimum_issues() {
        let error = IssueKey::from_filename("mwb_E_202206.jwpub").unwrap_err();
        assert_eq!(ErrorCode::UnsupportedIssue, error.code());
        assert!(IssueKey::from_filename("mwb_E_202207.jwpub").is_ok());

        let error = IssueKey::from_filename("w_E_202303.jwpub").unwrap_err();
        assert_eq!(ErrorCode::UnsupportedIssue, error.code());
        assert!(IssueKey::from_filename("w_E_202304.jwpub").is_ok());
    }
}
