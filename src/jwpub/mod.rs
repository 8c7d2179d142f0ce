//! JWPUB container pipeline.
//!
//! A JWPUB is a ZIP whose `contents` member is itself a ZIP holding the
//! publication database. Each document row decrypts through the
//! publication key schedule before HTML interpretation.

mod crypto;
mod store;

use crate::archive::RawArchive;
use crate::errors::{ParserError, ParserResult};
use crate::html::{self, mwb, watchtower, Interpretation};
use crate::jwpub::crypto::KeyMaterial;
use crate::jwpub::store::{DocumentClass, DocumentStore};
use crate::options::ParserOptions;
use crate::publication::{IssueKey, PublicationType};
use crate::schedule::ParseResult;

/// Outer archive member holding the per-document archive.
const CONTENTS_MEMBER: &str = "contents";

/// Inner archive entry suffix identifying the publication database.
const DATABASE_SUFFIX: &str = ".db";

pub(crate) fn parse(
    data: &[u8],
    issue: &IssueKey,
    options: &ParserOptions,
) -> ParserResult<ParseResult> {
    let outer = RawArchive::read(data, options)?;
    let contents = outer.get(CONTENTS_MEMBER).ok_or_else(|| {
        ParserError::InvalidArchive(std::io::Error::other(
            "JWPUB file missing `contents` archive",
        ))
    })?;

    let inner = RawArchive::read(contents, options)?;
    let database = inner.find_by_suffix(DATABASE_SUFFIX).ok_or_else(|| {
        ParserError::InvalidDatabase("no database entry in `contents` archive".to_owned())
    })?;

    let store = DocumentStore::open(database)?;
    let publication = store.publication()?;
    let material = KeyMaterial::derive(&publication)?;
    tracing::debug!(
        symbol = %publication.symbol,
        issue = publication.issue_tag,
        "opened publication database"
    );

    let interpretation = Interpretation {
        year: issue.year,
        profile: options
            .enhanced_parsing
            .then(|| crate::lang::profile(&issue.language))
            .flatten(),
    };

    match issue.publication_type {
        PublicationType::Mwb => {
            let schedules = store
                .contents(DocumentClass::MwbWeek)?
                .iter()
                .map(|blob| material.decrypt_content(blob))
                .collect::<ParserResult<Vec<_>>>()?
                .iter()
                .map(|text| mwb::interpret_week(&html::parse_document(text), &interpretation))
                .collect();

            Ok(ParseResult::from_mwb(issue, schedules))
        }
        PublicationType::Watchtower => {
            let toc = match store.contents(DocumentClass::WatchtowerToc)?.first() {
                Some(blob) => html::parse_document(&material.decrypt_content(blob)?),
                // Without a table of contents there is nothing to anchor
                // studies on; an empty schedule list is not an error.
                None => return Ok(ParseResult::from_watchtower(issue, Vec::new())),
            };

            let articles = store
                .article_contents()?
                .into_iter()
                .map(|(id, blob)| Ok((id, material.decrypt_content(&blob)?)))
                .collect::<ParserResult<Vec<(i64, String)>>>()?;

            let schedules = watchtower::interpret_studies(&toc, &interpretation, |href| {
                let id = watchtower::linked_document_id(href)?;
                articles
                    .iter()
                    .find(|(article_id, _)| *article_id == id)
                    .map(|(_, text)| html::parse_document(text))
            });

            Ok(ParseResult::from_watchtower(issue, schedules))
        }
    }
}
