mod common;

use common::PublicationFixture;
use jwsched::errors::ErrorCode;
use jwsched::{ParserOptions, SchedulesParser, SongRef};

fn mwb_publication() -> PublicationFixture {
    PublicationFixture {
        meps_language_index: 0,
        symbol: "mwb",
        year: 2024,
        issue_tag: 202401,
    }
}

#[test]
fn decrypts_and_extracts_a_week() {
    let publication = mwb_publication();
    let week = common::mwb_week_html("January 1-7");
    let content = common::encrypt_document(&week, &publication.tag());
    let database = common::database_bytes(&publication, &[(1, 106, &content)]);
    let data = common::jwpub_bytes(&database);

    let result = SchedulesParser::new()
        .parse_bytes(&data, "mwb_E_202401.jwpub")
        .unwrap();

    let weeks = result.mwb_schedules().unwrap();
    assert_eq!(1, weeks.len());
    assert_eq!(Some("2024/01/01"), weeks[0].week_date.as_deref());
    assert_eq!(Some("January 1-7"), weeks[0].week_date_locale.as_deref());
    assert_eq!(Some(&SongRef::Number(1)), weeks[0].song_first.as_ref());
    assert_eq!(Some("Treasures Talk"), weeks[0].tgw_talk.as_deref());
    assert_eq!(Some("Ge 1:1-19"), weeks[0].tgw_bread.as_deref());
}

#[test]
fn week_documents_keep_row_order() {
    let publication = mwb_publication();
    let tag = publication.tag();
    let first = common::encrypt_document(&common::mwb_week_html("January 1-7"), &tag);
    let second = common::encrypt_document(&common::mwb_week_html("January 8-14"), &tag);
    let database = common::database_bytes(&publication, &[(1, 106, &first), (2, 106, &second)]);

    let result = SchedulesParser::new()
        .parse_bytes(&common::jwpub_bytes(&database), "mwb_E_202401.jwpub")
        .unwrap();

    let weeks = result.mwb_schedules().unwrap();
    assert_eq!(Some("2024/01/01"), weeks[0].week_date.as_deref());
    assert_eq!(Some("2024/01/08"), weeks[1].week_date.as_deref());
}

#[test]
fn extracts_watchtower_studies_by_document_id() {
    let publication = PublicationFixture {
        meps_language_index: 0,
        symbol: "w",
        year: 2024,
        issue_tag: 202403,
    };
    let tag = publication.tag();

    let toc = r#"<html><body>
      <h3><p class="desc">Study Article 1: March 4-10, 2024</p></h3>
      <div><a href="jwpub://b/x:2024281/">Serve Whole-Souled</a></div>
    </body></html>"#;
    let article = r#"<html><body>
      <h2>Serve Whole-Souled</h2>
      <p class="pubRefs">SONG 45</p>
      <p class="pubRefs">SONG 137</p>
    </body></html>"#;

    let toc_blob = common::encrypt_document(toc, &tag);
    let article_blob = common::encrypt_document(article, &tag);
    let database = common::database_bytes(
        &publication,
        &[(10, 68, &toc_blob), (2024281, 40, &article_blob)],
    );

    let result = SchedulesParser::new()
        .parse_bytes(&common::jwpub_bytes(&database), "w_E_202403.jwpub")
        .unwrap();

    let studies = result.w_schedules().unwrap();
    assert_eq!(1, studies.len());
    assert_eq!(Some("2024/03/04"), studies[0].study_date.as_deref());
    assert_eq!(Some("Serve Whole-Souled"), studies[0].study_title.as_deref());
    assert_eq!(Some(45), studies[0].opening_song);
    assert_eq!(Some(137), studies[0].concluding_song);
}

#[test]
fn watchtower_without_a_toc_yields_no_studies() {
    let publication = PublicationFixture {
        meps_language_index: 0,
        symbol: "w",
        year: 2024,
        issue_tag: 202403,
    };
    let database = common::database_bytes(&publication, &[]);

    let result = SchedulesParser::new()
        .parse_bytes(&common::jwpub_bytes(&database), "w_E_202403.jwpub")
        .unwrap();

    assert_eq!(Some(&[][..]), result.w_schedules());
    assert_eq!(None, result.mwb_schedules());
}

#[test]
fn missing_contents_member_is_an_invalid_archive() {
    let data = common::zip_bytes(&[("unrelated", b"x")]);

    let error = SchedulesParser::new()
        .parse_bytes(&data, "mwb_E_202401.jwpub")
        .unwrap_err();
    assert_eq!(ErrorCode::InvalidArchive, error.code());
}

#[test]
fn missing_database_is_invalid() {
    let inner = common::zip_bytes(&[("readme.txt", b"no database here")]);
    let data = common::zip_bytes(&[("contents", &inner)]);

    let error = SchedulesParser::new()
        .parse_bytes(&data, "mwb_E_202401.jwpub")
        .unwrap_err();
    assert_eq!(ErrorCode::InvalidDatabase, error.code());
}

#[test]
fn suspicious_inner_entries_are_rejected() {
    let inner = common::zip_bytes(&[("../evil.db", b"x")]);
    let data = common::zip_bytes(&[("contents", &inner)]);

    let error = SchedulesParser::new()
        .parse_bytes(&data, "mwb_E_202401.jwpub")
        .unwrap_err();
    assert_eq!(ErrorCode::SuspiciousContent, error.code());
}

#[test]
fn oversized_inputs_are_rejected_before_decryption() {
    let options = ParserOptions::builder().max_total_bytes(1024).build();
    let parser = SchedulesParser::with_options(options);

    // Not even a ZIP: the size gate must fire first.
    let error = parser
        .parse_bytes(&vec![0u8; 2048], "mwb_E_202401.jwpub")
        .unwrap_err();
    assert_eq!(ErrorCode::FileTooLarge, error.code());
}

#[test]
fn corrupted_content_surfaces_decryption_failure() {
    let publication = mwb_publication();
    let database = common::database_bytes(&publication, &[(1, 106, b"garbage blob")]);

    let error = SchedulesParser::new()
        .parse_bytes(&common::jwpub_bytes(&database), "mwb_E_202401.jwpub")
        .unwrap_err();
    assert_eq!(ErrorCode::DecryptionFailed, error.code());
}

#[test]
fn watchtower_json_uses_wire_field_names() {
    let publication = PublicationFixture {
        meps_language_index: 0,
        symbol: "w",
        year: 2024,
        issue_tag: 202403,
    };
    let database = common::database_bytes(&publication, &[]);

    let result = SchedulesParser::new()
        .parse_bytes(&common::jwpub_bytes(&database), "w_E_202403.jwpub")
        .unwrap();

    let json = result.to_json().unwrap();
    assert!(json.contains("\"publicationType\":\"WATCHTOWER\""));
    assert!(json.contains("\"wSchedules\":[]"));
    assert!(!json.contains("mwbSchedules"));

    assert_eq!("[]", result.to_schedules_json().unwrap());
}
