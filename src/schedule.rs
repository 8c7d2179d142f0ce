//! Parsed schedule records and the serializable result.
//!
//! Field names in the serialized form are a wire contract; they are kept
//! byte-identical across releases and guarded by `schemaVersion`.

use crate::errors::ParserResult;
use crate::publication::{IssueKey, PublicationType};
use serde::{Deserialize, Serialize};

/// Version of the serialized result layout.
pub const SCHEMA_VERSION: &str = "1.0.0";

/// A song reference: a songbook number when one could be recognized,
/// otherwise the source text.
///
/// Serializes untagged, as a bare integer or string.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SongRef {
    /// A songbook number in `1..=162`.
    Number(u16),
    /// Free-form source text that did not resolve to a songbook number.
    Text(String),
}

/// One midweek-meeting week extracted from a Meeting Workbook.
///
/// Every field is optional; absent fields are omitted from the
/// serialized form. The `*_time`, `*_type`, and `*_title` companions are
/// populated only for languages with an enhanced profile.
#[non_exhaustive]
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MwbWeek {
    /// Week date, normalized to `YYYY/MM/DD` when enhanced parsing
    /// applies, otherwise the source heading text.
    #[serde(rename = "mwb_week_date", skip_serializing_if = "Option::is_none")]
    pub week_date: Option<String>,
    /// The source week heading, kept alongside the normalized date.
    #[serde(rename = "mwb_week_date_locale", skip_serializing_if = "Option::is_none")]
    pub week_date_locale: Option<String>,
    /// The weekly Bible reading heading.
    #[serde(
        rename = "mwb_weekly_bible_reading",
        skip_serializing_if = "Option::is_none"
    )]
    pub weekly_bible_reading: Option<String>,
    /// Opening song.
    #[serde(rename = "mwb_song_first", skip_serializing_if = "Option::is_none")]
    pub song_first: Option<SongRef>,
    /// Treasures talk part name.
    #[serde(rename = "mwb_tgw_talk", skip_serializing_if = "Option::is_none")]
    pub tgw_talk: Option<String>,
    /// Treasures talk full title, `N. name` form.
    #[serde(rename = "mwb_tgw_talk_title", skip_serializing_if = "Option::is_none")]
    pub tgw_talk_title: Option<String>,
    /// Spiritual gems title.
    #[serde(rename = "mwb_tgw_gems_title", skip_serializing_if = "Option::is_none")]
    pub tgw_gems_title: Option<String>,
    /// Bible reading source (the parenthetical verse range).
    #[serde(rename = "mwb_tgw_bread", skip_serializing_if = "Option::is_none")]
    pub tgw_bread: Option<String>,
    /// Bible reading full title.
    #[serde(rename = "mwb_tgw_bread_title", skip_serializing_if = "Option::is_none")]
    pub tgw_bread_title: Option<String>,
    /// Number of student parts in the field-ministry section, `1..=4`.
    #[serde(rename = "mwb_ayf_count", skip_serializing_if = "Option::is_none")]
    pub ayf_count: Option<u8>,
    #[serde(rename = "mwb_ayf_part1", skip_serializing_if = "Option::is_none")]
    pub ayf_part1: Option<String>,
    #[serde(rename = "mwb_ayf_part1_time", skip_serializing_if = "Option::is_none")]
    pub ayf_part1_time: Option<u32>,
    #[serde(rename = "mwb_ayf_part1_type", skip_serializing_if = "Option::is_none")]
    pub ayf_part1_type: Option<String>,
    #[serde(rename = "mwb_ayf_part1_title", skip_serializing_if = "Option::is_none")]
    pub ayf_part1_title: Option<String>,
    #[serde(rename = "mwb_ayf_part2", skip_serializing_if = "Option::is_none")]
    pub ayf_part2: Option<String>,
    #[serde(rename = "mwb_ayf_part2_time", skip_serializing_if = "Option::is_none")]
    pub ayf_part2_time: Option<u32>,
    #[serde(rename = "mwb_ayf_part2_type", skip_serializing_if = "Option::is_none")]
    pub ayf_part2_type: Option<String>,
    #[serde(rename = "mwb_ayf_part2_title", skip_serializing_if = "Option::is_none")]
    pub ayf_part2_title: Option<String>,
    #[serde(rename = "mwb_ayf_part3", skip_serializing_if = "Option::is_none")]
    pub ayf_part3: Option<String>,
    #[serde(rename = "mwb_ayf_part3_time", skip_serializing_if = "Option::is_none")]
    pub ayf_part3_time: Option<u32>,
    #[serde(rename = "mwb_ayf_part3_type", skip_serializing_if = "Option::is_none")]
    pub ayf_part3_type: Option<String>,
    #[serde(rename = "mwb_ayf_part3_title", skip_serializing_if = "Option::is_none")]
    pub ayf_part3_title: Option<String>,
    #[serde(rename = "mwb_ayf_part4", skip_serializing_if = "Option::is_none")]
    pub ayf_part4: Option<String>,
    #[serde(rename = "mwb_ayf_part4_time", skip_serializing_if = "Option::is_none")]
    pub ayf_part4_time: Option<u32>,
    #[serde(rename = "mwb_ayf_part4_type", skip_serializing_if = "Option::is_none")]
    pub ayf_part4_type: Option<String>,
    #[serde(rename = "mwb_ayf_part4_title", skip_serializing_if = "Option::is_none")]
    pub ayf_part4_title: Option<String>,
    /// Middle song.
    #[serde(rename = "mwb_song_middle", skip_serializing_if = "Option::is_none")]
    pub song_middle: Option<SongRef>,
    /// Number of parts in the Living as Christians section, `1..=2`.
    #[serde(rename = "mwb_lc_count", skip_serializing_if = "Option::is_none")]
    pub lc_count: Option<u8>,
    #[serde(rename = "mwb_lc_part1", skip_serializing_if = "Option::is_none")]
    pub lc_part1: Option<String>,
    #[serde(rename = "mwb_lc_part1_time", skip_serializing_if = "Option::is_none")]
    pub lc_part1_time: Option<u32>,
    #[serde(rename = "mwb_lc_part1_content", skip_serializing_if = "Option::is_none")]
    pub lc_part1_content: Option<String>,
    #[serde(rename = "mwb_lc_part1_title", skip_serializing_if = "Option::is_none")]
    pub lc_part1_title: Option<String>,
    #[serde(rename = "mwb_lc_part2", skip_serializing_if = "Option::is_none")]
    pub lc_part2: Option<String>,
    #[serde(rename = "mwb_lc_part2_time", skip_serializing_if = "Option::is_none")]
    pub lc_part2_time: Option<u32>,
    #[serde(rename = "mwb_lc_part2_content", skip_serializing_if = "Option::is_none")]
    pub lc_part2_content: Option<String>,
    #[serde(rename = "mwb_lc_part2_title", skip_serializing_if = "Option::is_none")]
    pub lc_part2_title: Option<String>,
    /// Congregation Bible study source.
    #[serde(rename = "mwb_lc_cbs", skip_serializing_if = "Option::is_none")]
    pub lc_cbs: Option<String>,
    /// Congregation Bible study full title.
    #[serde(rename = "mwb_lc_cbs_title", skip_serializing_if = "Option::is_none")]
    pub lc_cbs_title: Option<String>,
    /// Concluding song.
    #[serde(rename = "mwb_song_conclude", skip_serializing_if = "Option::is_none")]
    pub song_conclude: Option<SongRef>,
}

/// One weekend study article extracted from a Watchtower Study edition.
#[non_exhaustive]
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WStudy {
    /// Study date, normalized to `YYYY/MM/DD` when enhanced parsing
    /// applies, otherwise the source text.
    #[serde(rename = "w_study_date", skip_serializing_if = "Option::is_none")]
    pub study_date: Option<String>,
    /// The source study date line, kept alongside the normalized date.
    #[serde(rename = "w_study_date_locale", skip_serializing_if = "Option::is_none")]
    pub study_date_locale: Option<String>,
    /// Study article title.
    #[serde(rename = "w_study_title", skip_serializing_if = "Option::is_none")]
    pub study_title: Option<String>,
    /// Opening song number.
    #[serde(
        rename = "w_study_opening_song",
        skip_serializing_if = "Option::is_none"
    )]
    pub opening_song: Option<u16>,
    /// Concluding song number.
    #[serde(
        rename = "w_study_concluding_song",
        skip_serializing_if = "Option::is_none"
    )]
    pub concluding_song: Option<u16>,
}

/// The outcome of parsing one publication issue.
///
/// Exactly one schedule list is populated, matching
/// [`ParseResult::publication_type`]. List order follows the source:
/// table-of-contents order for Watchtower editions, document iteration
/// order for Meeting Workbooks.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ParseResult {
    #[serde(rename = "schemaVersion")]
    schema_version: String,
    #[serde(rename = "publicationType")]
    publication_type: PublicationType,
    language: String,
    year: i32,
    month: u8,
    #[serde(rename = "mwbSchedules", skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    mwb_schedules: Option<Vec<MwbWeek>>,
    #[serde(rename = "wSchedules", skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    w_schedules: Option<Vec<WStudy>>,
}

impl ParseResult {
    pub(crate) fn from_mwb(issue: &IssueKey, schedules: Vec<MwbWeek>) -> Self {
        Self {
            schema_version: SCHEMA_VERSION.to_owned(),
            publication_type: issue.publication_type,
            language: issue.language.clone(),
            year: issue.year,
            month: issue.month,
            mwb_schedules: Some(schedules),
            w_schedules: None,
        }
    }

    pub(crate) fn from_watchtower(issue: &IssueKey, schedules: Vec<WStudy>) -> Self {
        Self {
            schema_version: SCHEMA_VERSION.to_owned(),
            publication_type: issue.publication_type,
            language: issue.language.clone(),
            year: issue.year,
            month: issue.month,
            mwb_schedules: None,
            w_schedules: Some(schedules),
        }
    }

    /// The serialized layout version this result conforms to.
    pub fn schema_version(&self) -> &str {
        &self.schema_version
    }

    /// The publication family this result was extracted from.
    pub fn publication_type(&self) -> PublicationType {
        self.publication_type
    }

    /// The language tag from the source filename.
    pub fn language(&self) -> &str {
        &self.language
    }

    /// The issue year.
    pub fn year(&self) -> i32 {
        self.year
    }

    /// The issue month, `1..=12`.
    pub fn month(&self) -> u8 {
        self.month
    }

    /// Meeting Workbook weeks, present for `MWB` results.
    pub fn mwb_schedules(&self) -> Option<&[MwbWeek]> {
        self.mwb_schedules.as_deref()
    }

    /// Watchtower studies, present for `WATCHTOWER` results.
    pub fn w_schedules(&self) -> Option<&[WStudy]> {
        self.w_schedules.as_deref()
    }

    /// Renders the full result, issue metadata included, as JSON.
    pub fn to_json(&self) -> ParserResult<String> {
        serde_json::to_string(self).map_err(|error| std::io::Error::other(error).into())
    }

    /// Renders the populated schedule list alone as JSON.
    pub fn to_schedules_json(&self) -> ParserResult<String> {
        let rendered = match self.publication_type {
            PublicationType::Mwb => serde_json::to_string(&self.mwb_schedules),
            PublicationType::Watchtower => serde_json::to_string(&self.w_schedules),
        };
        rendered.map_err(|error| std::io::Error::other(error).into())
    }
}
