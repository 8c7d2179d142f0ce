mod common;

use jwsched::errors::ErrorCode;
use jwsched::{SchedulesParser, SongRef};
use std::io::Cursor;

#[test]
fn extracts_one_week_per_valid_document() {
    let week1 = common::mwb_week_html("January 1-7");
    let week2 = common::mwb_week_html("January 8-14");
    let data = common::zip_bytes(&[
        ("mimetype", b"application/epub+zip"),
        ("OEBPS/week1.xhtml", week1.as_bytes()),
        ("OEBPS/week2.xhtml", week2.as_bytes()),
        ("OEBPS/styles.css", b"body {}"),
    ]);

    let result = SchedulesParser::new()
        .parse_bytes(&data, "mwb_E_202401.epub")
        .unwrap();

    let weeks = result.mwb_schedules().unwrap();
    assert_eq!(2, weeks.len());

    assert_eq!(Some("2024/01/01"), weeks[0].week_date.as_deref());
    assert_eq!(Some("January 1-7"), weeks[0].week_date_locale.as_deref());
    assert_eq!(Some("Genesis 1-3"), weeks[0].weekly_bible_reading.as_deref());
    assert_eq!(Some(&SongRef::Number(1)), weeks[0].song_first.as_ref());
    assert_eq!(Some("Treasures Talk"), weeks[0].tgw_talk.as_deref());
    assert_eq!(Some("1. Treasures Talk"), weeks[0].tgw_talk_title.as_deref());
    assert_eq!(Some("2. Spiritual Gems"), weeks[0].tgw_gems_title.as_deref());
    assert_eq!(Some("Ge 1:1-19"), weeks[0].tgw_bread.as_deref());
    assert_eq!(Some(1), weeks[0].ayf_count);
    assert_eq!(Some(3), weeks[0].ayf_part1_time);

    assert_eq!(Some("2024/01/08"), weeks[1].week_date.as_deref());
}

#[test]
fn unknown_language_keeps_source_text() {
    let week = common::mwb_week_html("1-7 января");
    let data = common::zip_bytes(&[("week.xhtml", week.as_bytes())]);

    let result = SchedulesParser::new()
        .parse_bytes(&data, "mwb_X_202401.epub")
        .unwrap();

    let weeks = result.mwb_schedules().unwrap();
    assert_eq!(Some("1-7 января"), weeks[0].week_date.as_deref());
    assert_eq!(None, weeks[0].week_date_locale);
    assert_eq!(None, weeks[0].ayf_part1_time);
}

#[test]
fn ukrainian_and_polish_dates_normalize() {
    for (language, heading) in [("U", "1-7 січня"), ("P", "1-7 stycznia")] {
        let week = common::mwb_week_html(heading);
        let data = common::zip_bytes(&[("week.xhtml", week.as_bytes())]);

        let result = SchedulesParser::new()
            .parse_bytes(&data, &format!("mwb_{language}_202401.epub"))
            .unwrap();

        let weeks = result.mwb_schedules().unwrap();
        assert_eq!(Some("2024/01/01"), weeks[0].week_date.as_deref(), "{language}");
        assert_eq!(Some(heading), weeks[0].week_date_locale.as_deref());
    }
}

#[test]
fn epub_without_week_documents_is_malformed() {
    let data = common::zip_bytes(&[
        ("mimetype", b"application/epub+zip"),
        ("cover.xhtml", b"<html><body><h1>Cover</h1></body></html>"),
    ]);

    let error = SchedulesParser::new()
        .parse_bytes(&data, "mwb_E_202401.epub")
        .unwrap_err();
    assert_eq!(ErrorCode::MalformedContent, error.code());
}

#[test]
fn archive_safety_applies_before_interpretation() {
    let data = common::zip_bytes(&[("../escape.xhtml", b"<h1>x</h1>")]);
    let error = SchedulesParser::new()
        .parse_bytes(&data, "mwb_E_202401.epub")
        .unwrap_err();
    assert_eq!(ErrorCode::SuspiciousContent, error.code());

    let week = common::mwb_week_html("January 1-7");
    let entries: Vec<(String, Vec<u8>)> = (0..400)
        .map(|index| (format!("file{index}.xhtml"), week.clone().into_bytes()))
        .collect();
    let borrowed: Vec<(&str, &[u8])> = entries
        .iter()
        .map(|(name, content)| (name.as_str(), content.as_slice()))
        .collect();
    let error = SchedulesParser::new()
        .parse_bytes(&common::zip_bytes(&borrowed), "mwb_E_202401.epub")
        .unwrap_err();
    assert_eq!(ErrorCode::TooManyFiles, error.code());
}

#[test]
fn reader_and_buffer_inputs_agree() {
    let week = common::mwb_week_html("January 1-7");
    let data = common::zip_bytes(&[("week.xhtml", week.as_bytes())]);
    let parser = SchedulesParser::new();

    let from_bytes = parser.parse_bytes(&data, "mwb_E_202401.epub").unwrap();
    let from_reader = parser
        .parse_reader(Cursor::new(data), "mwb_E_202401.epub")
        .unwrap();

    assert_eq!(from_bytes, from_reader);
}

#[test]
fn results_round_trip_through_json() {
    let week = common::mwb_week_html("January 1-7");
    let data = common::zip_bytes(&[("week.xhtml", week.as_bytes())]);

    let result = SchedulesParser::new()
        .parse_bytes(&data, "mwb_E_202401.epub")
        .unwrap();

    let json = result.to_json().unwrap();
    assert!(json.contains("\"schemaVersion\":\"1.0.0\""));
    assert!(json.contains("\"publicationType\":\"MWB\""));
    assert!(json.contains("\"mwb_week_date\":\"2024/01/01\""));

    let reparsed: jwsched::ParseResult = serde_json::from_str(&json).unwrap();
    assert_eq!(result, reparsed);
}
