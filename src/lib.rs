//! # jwsched
//!
//! A library that extracts structured weekly meeting schedules from
//! Meeting Workbook (`mwb`) and Watchtower Study (`w`) publication
//! files, in both the JWPUB and EPUB container formats.
//!
//! ## Examples
//! Parsing a publication file:
//! ```no_run
//! # use jwsched::errors::ParserResult;
//! # fn main() -> ParserResult<()> {
//! let parser = jwsched::SchedulesParser::new();
//! let result = parser.parse_file("mwb_E_202401.jwpub")?;
//!
//! // Issue metadata recovered from the filename
//! assert_eq!("E", result.language());
//! assert_eq!(2024, result.year());
//!
//! // One record per midweek-meeting week
//! for week in result.mwb_schedules().unwrap_or_default() {
//!     println!("{:?}: {:?}", week.week_date, week.weekly_bible_reading);
//! }
//!
//! // Serializable form with stable field names
//! println!("{}", result.to_json()?);
//! # Ok(())
//! # }
//! ```
//! Parsing from a buffer with custom limits:
//! ```no_run
//! # use jwsched::errors::ParserResult;
//! # fn main() -> ParserResult<()> {
//! use jwsched::{ParserOptions, SchedulesParser};
//!
//! let parser = SchedulesParser::with_options(
//!     ParserOptions::builder()
//!         .max_total_bytes(4 * 1024 * 1024)
//!         .max_entries(100),
//! );
//!
//! # let bytes: Vec<u8> = Vec::new();
//! let result = parser.parse_bytes(&bytes, "w_E_202404.epub")?;
//! for study in result.w_schedules().unwrap_or_default() {
//!     println!("{:?}: {:?}", study.study_date, study.study_title);
//! }
//! # Ok(())
//! # }
//! ```

mod archive;
mod epub;
mod html;
mod jwpub;
mod lang;
mod options;
mod parser;
mod publication;
mod schedule;

pub mod errors;

pub use self::lang::supported_languages;
pub use self::options::{ParserOptions, ParserOptionsBuilder};
pub use self::parser::SchedulesParser;
pub use self::publication::{Container, IssueKey, PublicationType};
pub use self::schedule::{MwbWeek, ParseResult, SongRef, WStudy, SCHEMA_VERSION};
