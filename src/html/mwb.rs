//! Meeting Workbook week extraction.
//!
//! A week document yields a single `@`-joined token sequence whose
//! positions map onto schedule fields. Two layouts produce it: the
//! `.pGroup` paragraph lists (current issues) or, when those are absent,
//! a heading walk over every `h3` (older issues).

use crate::html::{
    self, Interpretation, H1, H2, H3, LIST_ITEM, PARAGRAPH, P_GROUP,
};
use crate::lang::{self, LanguageProfile};
use crate::schedule::MwbWeek;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;

static SECTION_AYF: LazyLock<Selector> = LazyLock::new(|| html::selector("#section3"));
static SECTION_LC: LazyLock<Selector> = LazyLock::new(|| html::selector("#section4"));
static AYF_MARKER: LazyLock<Selector> = LazyLock::new(|| html::selector(".du-color--gold-700"));
static LC_MARKER: LazyLock<Selector> = LazyLock::new(|| {
    html::selector(".du-color--maroon-600.du-margin-top--8.du-margin-bottom--0")
});
static MUSIC_ICON: LazyLock<Selector> = LazyLock::new(|| html::selector(".dc-icon--music"));

/// Leading `N.` part numbering followed by the part name, up to an
/// opening parenthesis or the end of the segment.
static PART_TYPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)\.\s*(.+?)(?:\s*\(|$)").expect("valid part type pattern"));

/// Whether a document has the shape of a Meeting Workbook week:
/// a week heading, a Bible reading heading, and at least one part list.
pub(crate) fn is_week_document(document: &Html) -> bool {
    document.select(&H1).next().is_some()
        && document.select(&H2).next().is_some()
        && (document.select(&P_GROUP).next().is_some() || document.select(&H3).next().is_some())
}

/// Extracts one week schedule from a valid week document.
pub(crate) fn interpret_week(document: &Html, interpretation: &Interpretation) -> MwbWeek {
    let profile = interpretation.profile;
    let mut week = MwbWeek::default();

    if let Some(heading) = document.select(&H1).next() {
        let raw = html::normalize_text(&html::element_text(&heading));
        if let Some(profile) = profile {
            let normalized = lang::normalize_week_date(&raw, interpretation.year, profile);
            week.week_date = Some(normalized.unwrap_or_else(|| raw.clone()));
            week.week_date_locale = Some(raw);
        } else {
            week.week_date = Some(raw);
        }
    }

    week.weekly_bible_reading = document
        .select(&H2)
        .next()
        .map(|heading| html::normalize_text(&html::element_text(&heading)));

    let sources = collect_sources(document);
    let segments: Vec<&str> = sources.split('@').collect();

    if let Some(segment) = segments.get(1) {
        week.song_first = lang::extract_song_ref(segment);
    }

    if let Some(segment) = segments.get(3) {
        let segment = segment.trim();
        if let Some(profile) = profile {
            let source = SourceParts::decompose(segment, profile);
            week.tgw_talk = source.part_type;
            week.tgw_talk_title = source.full_title;
        } else {
            week.tgw_talk = Some(segment.to_owned());
        }
    }

    if let Some(segment) = segments.get(4) {
        let segment = segment.trim();
        if let Some(profile) = profile {
            week.tgw_gems_title = SourceParts::decompose(segment, profile).full_title;
        } else {
            week.tgw_gems_title = Some(segment.to_owned());
        }
    }

    if let Some(segment) = segments.get(7) {
        let segment = segment.trim();
        if let Some(profile) = profile {
            let source = SourceParts::decompose(segment, profile);
            week.tgw_bread = source.source;
            week.tgw_bread_title = source.full_title;
        } else {
            week.tgw_bread = Some(segment.to_owned());
        }
    }

    let ayf_count = ayf_part_count(document);
    week.ayf_count = Some(ayf_count);

    let mut ayf_parts = [
        (&mut week.ayf_part1, &mut week.ayf_part1_time, &mut week.ayf_part1_type, &mut week.ayf_part1_title),
        (&mut week.ayf_part2, &mut week.ayf_part2_time, &mut week.ayf_part2_type, &mut week.ayf_part2_title),
        (&mut week.ayf_part3, &mut week.ayf_part3_time, &mut week.ayf_part3_type, &mut week.ayf_part3_title),
        (&mut week.ayf_part4, &mut week.ayf_part4_time, &mut week.ayf_part4_type, &mut week.ayf_part4_title),
    ];
    for (ordinal, (base, time, part_type, title)) in ayf_parts.iter_mut().enumerate() {
        // The first student part is unconditional; the rest depend on
        // how many parts the section actually schedules.
        if ordinal > 0 && ayf_count <= ordinal as u8 {
            continue;
        }
        let Some(segment) = segments.get(8 + ordinal) else {
            continue;
        };
        let segment = segment.trim();
        if let Some(profile) = profile {
            let source = SourceParts::decompose(segment, profile);
            **base = source.source;
            **time = source.time;
            **part_type = source.part_type;
            **title = source.full_title;
        } else {
            **base = Some(segment.to_owned());
        }
    }

    let mut index = 8 + ayf_count as usize;
    if let Some(segment) = segments.get(index) {
        week.song_middle = lang::extract_song_ref(segment);
    }

    let lc_count = lc_part_count(document);
    week.lc_count = Some(lc_count);

    index += 1;
    if let Some(segment) = segments.get(index) {
        let segment = segment.trim();
        if let Some(profile) = profile {
            let source = SourceParts::decompose(segment, profile);
            week.lc_part1 = source.part_type;
            week.lc_part1_time = source.time;
            week.lc_part1_title = source.full_title;
            week.lc_part1_content = source.source.filter(|content| !content.is_empty());
        } else {
            week.lc_part1 = Some(segment.to_owned());
        }
    }

    if lc_count == 2 {
        index += 1;
        if let Some(segment) = segments.get(index) {
            let segment = segment.trim();
            if let Some(profile) = profile {
                let source = SourceParts::decompose(segment, profile);
                week.lc_part2 = source.part_type;
                week.lc_part2_time = source.time;
                week.lc_part2_title = source.full_title;
                week.lc_part2_content = source.source.filter(|content| !content.is_empty());
            } else {
                week.lc_part2 = Some(segment.to_owned());
            }
        }
    }

    index += 1;
    if let Some(segment) = segments.get(index) {
        let segment = segment.trim();
        if let Some(profile) = profile {
            let source = SourceParts::decompose(segment, profile);
            week.lc_cbs = source.source;
            week.lc_cbs_title = source.full_title;
        } else {
            week.lc_cbs = Some(segment.to_owned());
        }
    }

    index += 2;
    if let Some(segment) = segments.get(index) {
        week.song_conclude = lang::extract_song_ref(segment.trim());
    }

    week
}

/// Number of student parts in the field-ministry section.
///
/// Current issues carry an explicit `#section3` list; older ones are
/// counted through the section's gold heading markers.
fn ayf_part_count(document: &Html) -> u8 {
    if let Some(section) = document.select(&SECTION_AYF).next() {
        return section.select(&LIST_ITEM).count() as u8;
    }

    let markers = document.select(&AYF_MARKER).count();
    markers.saturating_sub(1).max(1) as u8
}

/// Number of parts in the Living as Christians section.
///
/// An explicit `#section4` list holds six items exactly when two parts
/// are scheduled before the congregation Bible study.
fn lc_part_count(document: &Html) -> u8 {
    if let Some(section) = document.select(&SECTION_LC).next() {
        let items = section.select(&LIST_ITEM).count();
        return if items == 6 { 2 } else { 1 };
    }

    let markers = document.select(&LC_MARKER).count();
    markers.saturating_sub(1).max(1) as u8
}

/// Builds the `@`-joined token sequence for one week document.
fn collect_sources(document: &Html) -> String {
    let mut sources = String::new();

    for group in document.select(&P_GROUP) {
        for item in group.select(&LIST_ITEM) {
            if let Some(paragraph) = item.select(&PARAGRAPH).next() {
                sources.push('@');
                sources.push_str(&html::element_text(&paragraph));
            }
        }
    }

    if sources.is_empty() {
        collect_sources_from_headings(document, &mut sources);
    }

    html::normalize_text(&sources)
}

/// Heading-walk fallback for issues without `.pGroup` lists.
///
/// Songs and parts interleave under `h3` headings; two `junk` tokens are
/// inserted before the fifth separator to reserve positions that only
/// the paragraph-list layout produces. This is a format heuristic kept
/// for compatibility with the heading layout currently in circulation.
fn collect_sources_from_headings(document: &Html, sources: &mut String) {
    let mut song_ordinal = 0;

    for heading in document.select(&H3) {
        let is_song = html::has_class(&heading, "dc-icon--music")
            || heading.select(&MUSIC_ICON).next().is_some();
        let is_part = heading
            .parent()
            .and_then(ElementRef::wrap)
            .is_none_or(|parent| !html::has_class(&parent, "boxContent"));

        if is_song {
            song_ordinal += 1;
        }
        if !is_song && !is_part {
            continue;
        }

        let mut data = html::element_text(&heading);
        if is_song {
            data = data.replace('|', "@");
        }
        if is_part {
            if let Some(paragraph) = html::next_element_sibling(&heading)
                .and_then(|sibling| sibling.select(&PARAGRAPH).next())
            {
                data.push(' ');
                data.push_str(&html::element_text(&paragraph));
            }
        }

        sources.push('@');
        sources.push_str(&data);

        // The middle song is followed by the Living as Christians parts,
        // which hang off plain divs rather than their own headings.
        if is_song && song_ordinal == 2 {
            if let Some(sibling) = html::next_element_sibling(&heading) {
                let after_sibling = html::next_element_sibling(&sibling);
                let heading_follows =
                    after_sibling.as_ref().is_some_and(|next| html::is_tag(next, "h3"));

                if html::is_tag(&sibling, "div") && !heading_follows {
                    if let Some(paragraph) = sibling.select(&PARAGRAPH).next() {
                        sources.push('@');
                        sources.push_str(&html::element_text(&paragraph));

                        if let Some(paragraph) =
                            after_sibling.and_then(|next| next.select(&PARAGRAPH).next())
                        {
                            sources.push(' ');
                            sources.push_str(&html::element_text(&paragraph));
                        }
                    }
                }
            }
        }
    }

    if let Some(position) = nth_index_of(sources, '@', 5) {
        if position > 0 {
            sources.insert_str(position, "@junk@junk");
        }
    }
}

/// Byte index of the `n`th occurrence of `needle`, 1-based.
fn nth_index_of(text: &str, needle: char, n: usize) -> Option<usize> {
    text.char_indices()
        .filter(|(_, character)| *character == needle)
        .nth(n.checked_sub(1)?)
        .map(|(index, _)| index)
}

/// One schedule segment decomposed into enhanced fields.
struct SourceParts {
    /// The part name without its leading number.
    part_type: Option<String>,
    /// Duration in minutes.
    time: Option<u32>,
    /// The parenthetical source, or the whole segment without one.
    source: Option<String>,
    /// The `N. name` form, or the whole segment when unnumbered.
    full_title: Option<String>,
}

impl SourceParts {
    fn decompose(segment: &str, profile: &LanguageProfile) -> Self {
        if segment.is_empty() {
            return Self {
                part_type: None,
                time: None,
                source: None,
                full_title: Some(String::new()),
            };
        }

        let time = lang::extract_minutes(segment, Some(profile));

        let (part_type, full_title) = match PART_TYPE.captures(segment) {
            Some(captures) => {
                let name = captures[2].trim().to_owned();
                let full_title = format!("{}. {}", &captures[1], name);
                (Some(name), Some(full_title))
            }
            None => (None, Some(segment.to_owned())),
        };

        let source = match segment.find('(') {
            Some(open) if open > 0 => {
                let inner = &segment[open + 1..];
                match inner.rfind(')') {
                    Some(close) if close > 0 => &inner[..close],
                    _ => inner,
                }
            }
            _ => segment,
        };

        Self {
            part_type,
            time,
            source: Some(source.trim().to_owned()),
            full_title,
        }
    }
}
