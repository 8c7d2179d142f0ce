//! Watchtower Study extraction: table of contents plus article pairs.

use crate::html::{self, Interpretation, ANCHOR, H2, H3};
use crate::lang;
use crate::schedule::WStudy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;

static DESCRIPTION: LazyLock<Selector> = LazyLock::new(|| html::selector(".desc"));
static PUB_REFS: LazyLock<Selector> = LazyLock::new(|| html::selector(".pubRefs"));
static BLOCK_TEACH: LazyLock<Selector> = LazyLock::new(|| html::selector(".blockTeach"));

/// Document-identifier tail of a table-of-contents link.
static DOCUMENT_LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r".+:(\w+)/$").expect("valid document link pattern"));

/// Whether a document has the shape of a Watchtower table of contents.
pub(crate) fn is_toc_document(document: &Html) -> bool {
    document.select(&H3).next().is_some()
}

/// The numeric document identifier a table-of-contents link points at,
/// when its href carries one.
pub(crate) fn linked_document_id(href: &str) -> Option<i64> {
    DOCUMENT_LINK
        .captures(href)
        .and_then(|captures| captures[1].parse().ok())
}

/// Walks the table of contents and extracts one study per resolvable
/// entry.
///
/// `resolve` maps a link href to the linked article document; rows whose
/// sibling, link, or article cannot be resolved are skipped without
/// failing the publication.
pub(crate) fn interpret_studies(
    toc: &Html,
    interpretation: &Interpretation,
    mut resolve: impl FnMut(&str) -> Option<Html>,
) -> Vec<WStudy> {
    let mut studies = Vec::new();

    for entry in toc.select(&H3) {
        let Some(sibling) = html::next_element_sibling(&entry) else {
            continue;
        };
        let Some(link) = sibling.select(&ANCHOR).next() else {
            continue;
        };
        let href = link.value().attr("href").unwrap_or_default();
        if href.is_empty() {
            continue;
        }
        let Some(article) = resolve(href) else {
            tracing::debug!(href, "skipping unresolvable study article link");
            continue;
        };

        studies.push(interpret_study(&entry, &article, interpretation));
    }

    studies
}

/// Extracts one study from its table-of-contents entry and article body.
fn interpret_study(
    entry: &ElementRef,
    article: &Html,
    interpretation: &Interpretation,
) -> WStudy {
    let mut study = WStudy::default();

    let raw_date = entry
        .select(&DESCRIPTION)
        .next()
        .map(|description| html::element_text(&description))
        .unwrap_or_else(|| html::element_text(entry));
    let raw_date = html::normalize_text(&raw_date);

    if !raw_date.is_empty() {
        if let Some(profile) = interpretation.profile {
            let normalized = lang::normalize_study_date(&raw_date, profile);
            study.study_date = Some(normalized.unwrap_or_else(|| raw_date.clone()));
            study.study_date_locale = Some(raw_date);
        } else {
            study.study_date = Some(raw_date);
        }
    }

    study.study_title = article
        .select(&H2)
        .next()
        .map(|title| html::normalize_text(&html::element_text(&title)))
        .or_else(|| {
            // Older tables of contents carry the title on the link itself.
            html::next_element_sibling(entry)
                .and_then(|sibling| sibling.select(&ANCHOR).next())
                .map(|link| html::normalize_text(&html::element_text(&link)))
        });

    let references: Vec<_> = article.select(&PUB_REFS).collect();
    if let (Some(first), Some(last)) = (references.first(), references.last()) {
        study.opening_song = lang::extract_song_number(&html::element_text(first));

        study.concluding_song = if references.len() == 2 {
            match article.select(&BLOCK_TEACH).next() {
                Some(block) => html::next_element_sibling(&block)
                    .and_then(|sibling| lang::extract_song_number(&html::element_text(&sibling))),
                // Some article shapes drop the teaching-box block; the
                // final reference list still names the concluding song.
                None => lang::extract_song_number(&html::element_text(last)),
            }
        } else {
            lang::extract_song_number(&html::element_text(last))
        };
    }

    study
}
