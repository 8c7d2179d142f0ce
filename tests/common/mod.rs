//! Shared fixture builders: synthetic EPUB, JWPUB, and database files.

use aes::cipher::block_padding::Pkcs7;
use aes::cipher::{BlockEncryptMut, KeyIvInit};
use aes::Aes128;
use flate2::write::DeflateEncoder;
use flate2::Compression;
use rusqlite::Connection;
use sha2::{Digest, Sha256};
use std::io::{Cursor, Write};
use zip::write::SimpleFileOptions;

type Aes128CbcEnc = cbc::Encryptor<Aes128>;

/// The fixed content mask, hex form (the crate embeds it as Base64).
const CONTENT_MASK_HEX: &str = "11cbb5587e32846d4c26790c633da289f66fe5842a3a585ce1bc3a294af5ada7";

pub fn zip_bytes(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    for (name, content) in entries {
        writer
            .start_file(*name, SimpleFileOptions::default())
            .unwrap();
        writer.write_all(content).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

/// Derives the publication key and IV the way every JWPUB reader does.
pub fn derive_key_iv(tag: &str) -> ([u8; 16], [u8; 16]) {
    let digest = Sha256::digest(tag.as_bytes());
    let mask = hex::decode(CONTENT_MASK_HEX).unwrap();

    let mixed: Vec<u8> = digest
        .iter()
        .zip(mask.iter())
        .map(|(a, b)| a ^ b)
        .collect();

    let mut key = [0u8; 16];
    let mut iv = [0u8; 16];
    key.copy_from_slice(&mixed[..16]);
    iv.copy_from_slice(&mixed[16..32]);
    (key, iv)
}

/// Deflates and encrypts document HTML the way publications store it.
pub fn encrypt_document(html: &str, tag: &str) -> Vec<u8> {
    let mut encoder = DeflateEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(html.as_bytes()).unwrap();
    let deflated = encoder.finish().unwrap();

    let (key, iv) = derive_key_iv(tag);
    Aes128CbcEnc::new(&key.into(), &iv.into()).encrypt_padded_vec_mut::<Pkcs7>(&deflated)
}

pub struct PublicationFixture {
    pub meps_language_index: i64,
    pub symbol: &'static str,
    pub year: i64,
    pub issue_tag: i64,
}

impl PublicationFixture {
    pub fn tag(&self) -> String {
        format!(
            "{}_{}_{}_{}",
            self.meps_language_index, self.symbol, self.year, self.issue_tag
        )
    }
}

/// Builds a publication database holding the identity row and the given
/// `(MepsDocumentId, Class, Content)` documents.
pub fn database_bytes(publication: &PublicationFixture, documents: &[(i64, i64, &[u8])]) -> Vec<u8> {
    let file = tempfile::NamedTempFile::new().unwrap();
    {
        let connection = Connection::open(file.path()).unwrap();
        connection
            .execute_batch(
                "CREATE TABLE Publication (
                     MepsLanguageIndex INTEGER, Symbol TEXT,
                     Year INTEGER, IssueTagNumber INTEGER
                 );
                 CREATE TABLE Document (
                     MepsDocumentId INTEGER, Class INTEGER, Content BLOB
                 );",
            )
            .unwrap();
        connection
            .execute(
                "INSERT INTO Publication VALUES (?1, ?2, ?3, ?4)",
                rusqlite::params![
                    publication.meps_language_index,
                    publication.symbol,
                    publication.year,
                    publication.issue_tag,
                ],
            )
            .unwrap();
        for (id, class, content) in documents {
            connection
                .execute(
                    "INSERT INTO Document VALUES (?1, ?2, ?3)",
                    rusqlite::params![id, class, content],
                )
                .unwrap();
        }
    }
    std::fs::read(file.path()).unwrap()
}

/// Wraps a database into the nested JWPUB container layout.
pub fn jwpub_bytes(database: &[u8]) -> Vec<u8> {
    let inner = zip_bytes(&[("publication.db", database)]);
    zip_bytes(&[("contents", &inner)])
}

/// A minimal, well-formed Meeting Workbook week document.
pub fn mwb_week_html(week_heading: &str) -> String {
    format!(
        r#"<html><body>
          <h1>{week_heading}</h1>
          <h2>Genesis 1-3</h2>
          <div class="pGroup"><ul>
            <li><p>SONG 1</p></li>
            <li><p>Opening Comments (1 min.)</p></li>
            <li><p>1. Treasures Talk (10 min.)</p></li>
            <li><p>2. Spiritual Gems (10 min.)</p></li>
            <li><p>Filler A</p></li>
            <li><p>Filler B</p></li>
            <li><p>3. Bible Reading (Ge 1:1-19)</p></li>
            <li><p>4. Starting a Conversation (3 min.)</p></li>
          </ul></div>
          <div id="section3"><ul><li>part</li></ul></div>
          <div id="section4"><ul><li>a</li><li>b</li><li>c</li></ul></div>
        </body></html>"#
    )
}
