//! Per-publication key derivation and content decryption.
//!
//! Every JWPUB reader derives the same AES-128 key and IV from the
//! publication's identity row and a fixed mask; the recipe is a format
//! constant, not a secret.

use crate::errors::{ParserError, ParserResult};
use crate::jwpub::store::PublicationRow;
use aes::cipher::block_padding::{Pkcs7, UnpadError};
use aes::cipher::{BlockDecryptMut, KeyIvInit};
use aes::Aes128;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine as _;
use flate2::read::{DeflateDecoder, ZlibDecoder};
use sha2::{Digest, Sha256};
use std::io::Read;

type Aes128CbcDec = cbc::Decryptor<Aes128>;

/// Base64 of the hex-encoded 32-byte content mask shared by all
/// publications.
const CONTENT_MASK_BASE64: &str =
    "MTFjYmI1NTg3ZTMyODQ2ZDRjMjY3OTBjNjMzZGEyODlmNjZmZTU4NDJhM2E1ODVjZTFiYzNhMjk0YWY1YWRhNw==";

/// AES-128-CBC key and IV for one publication issue.
pub(crate) struct KeyMaterial {
    key: [u8; 16],
    iv: [u8; 16],
}

impl KeyMaterial {
    /// Derives the key schedule from the publication identity:
    /// `SHA-256("<lang>_<symbol>_<year>_<issue>")` XOR the content mask,
    /// split into the 16-byte key and 16-byte IV.
    pub(crate) fn derive(publication: &PublicationRow) -> ParserResult<Self> {
        let tag = format!(
            "{}_{}_{}_{}",
            publication.meps_language_index,
            publication.symbol,
            publication.year,
            publication.issue_tag,
        );

        let digest = Sha256::digest(tag.as_bytes());
        let mask = content_mask()?;
        let mixed = xor_wrapping(&digest, &mask);

        let mut key = [0u8; 16];
        let mut iv = [0u8; 16];
        key.copy_from_slice(&mixed[..16]);
        iv.copy_from_slice(&mixed[16..32]);

        Ok(Self { key, iv })
    }

    /// Decrypts and inflates one `Document.Content` blob into text.
    ///
    /// The primary path is AES-128-CBC with PKCS#7 padding followed by a
    /// raw DEFLATE stream. When either step fails, the blob is retried
    /// as a plain zlib stream, which covers publications whose content
    /// was stored unencrypted.
    ///
    /// # Errors
    /// [`ParserError::DecryptionFailed`] when both paths fail.
    pub(crate) fn decrypt_content(&self, blob: &[u8]) -> ParserResult<String> {
        self.decrypt_and_inflate(blob)
            .or_else(|_| inflate_zlib(blob))
            .map_err(|_| ParserError::DecryptionFailed)
    }

    fn decrypt_and_inflate(&self, blob: &[u8]) -> Result<String, ContentError> {
        let plaintext = Aes128CbcDec::new(&self.key.into(), &self.iv.into())
            .decrypt_padded_vec_mut::<Pkcs7>(blob)?;

        let mut inflated = Vec::new();
        DeflateDecoder::new(plaintext.as_slice()).read_to_end(&mut inflated)?;

        Ok(String::from_utf8_lossy(&inflated).into_owned())
    }
}

/// Decodes the embedded mask: Base64, then the resulting hex text.
fn content_mask() -> ParserResult<Vec<u8>> {
    let hex_text = BASE64_STANDARD
        .decode(CONTENT_MASK_BASE64)
        .map_err(|_| ParserError::DecryptionFailed)?;
    let hex_text = std::str::from_utf8(&hex_text).map_err(|_| ParserError::DecryptionFailed)?;
    hex::decode(hex_text).map_err(|_| ParserError::DecryptionFailed)
}

/// Byte-wise XOR, wrapping around the shorter buffer.
fn xor_wrapping(left: &[u8], right: &[u8]) -> Vec<u8> {
    let length = left.len().min(right.len());
    (0..length)
        .map(|index| left[index] ^ right[index % right.len()])
        .collect()
}

fn inflate_zlib(blob: &[u8]) -> Result<String, ContentError> {
    let mut inflated = Vec::new();
    ZlibDecoder::new(blob).read_to_end(&mut inflated)?;
    Ok(String::from_utf8_lossy(&inflated).into_owned())
}

enum ContentError {
    Padding,
    Io,
}

impl From<UnpadError> for ContentError {
    fn from(_: UnpadError) -> Self {
        Self::Padding
    }
}

impl From<std::io::Error> for ContentError {
    fn from(_: std::io::Error) -> Self {
        Self::Io
    }
}
