//! Decoding ladder for log files written by older tools.
//!
//! Files are written as UTF-8, but earlier builds and hand-edited copies
//! show up as UTF-16 (Notepad, PowerShell redirection) or Windows-1252.

use encoding_rs::{Encoding, UTF_16BE, UTF_16LE, UTF_8, WINDOWS_1252};

/// Order in which encodings are attempted
pub fn ladder() -> [&'static Encoding; 4] {
    [UTF_8, UTF_16LE, UTF_16BE, WINDOWS_1252]
}

/// Decode `bytes` with the first encoding in the ladder that accepts them.
///
/// A byte-order mark takes precedence. UTF-16 without a BOM is only
/// attempted when the NUL-byte layout looks like UTF-16, since almost any
/// even-length input decodes to something.
pub fn decode(bytes: &[u8]) -> Option<(String, &'static Encoding)> {
    if let Some((encoding, bom_len)) = Encoding::for_bom(bytes) {
        if let Some(text) = strict(encoding, &bytes[bom_len..]) {
            return Some((text, encoding));
        }
        log::debug!("{} byte-order mark present but content invalid", encoding.name());
    }

    let utf16_layout = looks_like_utf16(bytes, UTF_16LE) || looks_like_utf16(bytes, UTF_16BE);

    for encoding in ladder() {
        let is_utf16 = encoding == UTF_16LE || encoding == UTF_16BE;
        if is_utf16 && !looks_like_utf16(bytes, encoding) {
            continue;
        }
        // ASCII-only UTF-16 is valid UTF-8 full of NULs
        if encoding == UTF_8 && utf16_layout && bytes.contains(&0) {
            continue;
        }
        match strict(encoding, bytes) {
            Some(text) => return Some((text, encoding)),
            None => log::debug!("Decoding as {} failed, trying next", encoding.name()),
        }
    }

    None
}

fn strict(encoding: &'static Encoding, bytes: &[u8]) -> Option<String> {
    encoding
        .decode_without_bom_handling_and_without_replacement(bytes)
        .map(|text| text.into_owned())
}

/// ASCII-heavy UTF-16 has a zero byte in every other position.
fn looks_like_utf16(bytes: &[u8], encoding: &'static Encoding) -> bool {
    if bytes.len() < 2 || bytes.len() % 2 != 0 {
        return false;
    }
    let high = if encoding == UTF_16LE { 1 } else { 0 };
    let units = bytes.len() / 2;
    let zero_high = bytes
        .chunks_exact(2)
        .filter(|unit| unit[high] == 0)
        .count();
    zero_high * 2 >= units
}
