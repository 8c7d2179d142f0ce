//! EPUB container pipeline.
//!
//! An EPUB publication is a plain ZIP of HTML documents; weeks and the
//! Watchtower table of contents are recognized by document shape rather
//! than by manifest metadata.

use crate::archive::RawArchive;
use crate::errors::{ParserError, ParserResult};
use crate::html::{self, mwb, watchtower, Interpretation};
use crate::options::ParserOptions;
use crate::publication::{IssueKey, PublicationType};
use crate::schedule::ParseResult;
use scraper::Html;

pub(crate) fn parse(
    data: &[u8],
    issue: &IssueKey,
    options: &ParserOptions,
) -> ParserResult<ParseResult> {
    let archive = RawArchive::read(data, options)?;

    let mut documents: Vec<Html> = Vec::new();
    for (name, content) in archive.iter() {
        if !is_html_entry(name) {
            continue;
        }

        let document = html::parse_document(&String::from_utf8_lossy(content));
        let valid = match issue.publication_type {
            PublicationType::Mwb => mwb::is_week_document(&document),
            PublicationType::Watchtower => watchtower::is_toc_document(&document),
        };
        if valid {
            documents.push(document);
        }
    }

    if documents.is_empty() {
        return Err(ParserError::MalformedContent(format!(
            "no valid {} documents in EPUB file",
            issue.publication_type,
        )));
    }

    let interpretation = Interpretation {
        year: issue.year,
        profile: options
            .enhanced_parsing
            .then(|| crate::lang::profile(&issue.language))
            .flatten(),
    };

    match issue.publication_type {
        PublicationType::Mwb => {
            let schedules = documents
                .iter()
                .map(|document| mwb::interpret_week(document, &interpretation))
                .collect();

            Ok(ParseResult::from_mwb(issue, schedules))
        }
        PublicationType::Watchtower => {
            if documents.len() > 1 {
                return Err(ParserError::MalformedContent(
                    "Watchtower EPUB file contains more than one table of contents".to_owned(),
                ));
            }

            let schedules =
                watchtower::interpret_studies(&documents[0], &interpretation, |href| {
                    let target = link_basename(href)?;
                    let content = archive.find_by_basename(target)?;
                    Some(html::parse_document(&String::from_utf8_lossy(content)))
                });

            Ok(ParseResult::from_watchtower(issue, schedules))
        }
    }
}

fn is_html_entry(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    lower.ends_with(".html") || lower.ends_with(".xhtml") || lower.ends_with(".htm")
}

/// Last path segment of a link target, ignoring a trailing slash.
fn link_basename(href: &str) -> Option<&str> {
    let trimmed = href.trim_end_matches('/');
    let base = crate::publication::basename(trimmed);
    (!base.is_empty()).then_some(base)
}
