use std::borrow::Cow;

use memchr::{memchr, memchr2};

use crate::{Error, Result};

/// Decode a form component: `+` becomes a space and `%XX` becomes the byte it
/// names. Input without either is returned borrowed.
///
/// # Examples
/// ```
/// use nested_query::text::decode_url;
///
/// assert_eq!(&*decode_url(b"m%40rried+5+time%24").unwrap(), b"m@rried 5 time$");
/// assert!(decode_url(b"100%").is_err());
/// ```
pub fn decode_url(input: &[u8]) -> Result<Cow<'_, [u8]>> {
    match memchr2(b'%', b'+', input) {
        Some(first) => decode_from(input, first, true).map(Cow::Owned),
        None => Ok(Cow::Borrowed(input)),
    }
}

/// Decode a URL path: like [`decode_url`] but `+` is kept literally.
///
/// # Examples
/// ```
/// use nested_query::text::decode_path;
///
/// assert_eq!(&*decode_path(b"/a+b/%7Euser").unwrap(), b"/a+b/~user");
/// ```
pub fn decode_path(input: &[u8]) -> Result<Cow<'_, [u8]>> {
    match memchr(b'%', input) {
        Some(first) => decode_from(input, first, false).map(Cow::Owned),
        None => Ok(Cow::Borrowed(input)),
    }
}

/// Decode a captured value into an owned string. `base` is the offset of
/// `input` inside the buffer being parsed and is added to error offsets.
pub(crate) fn decode_value(input: &[u8], base: usize) -> Result<String> {
    let decoded = decode_url(input).map_err(|err| err.offset_by(base))?;
    into_string(decoded).ok_or(Error::InvalidUtf8 { offset: base })
}

pub(crate) fn into_string(bytes: Cow<'_, [u8]>) -> Option<String> {
    match bytes {
        Cow::Borrowed(raw) => std::str::from_utf8(raw).ok().map(str::to_owned),
        Cow::Owned(raw) => String::from_utf8(raw).ok(),
    }
}

fn decode_from(input: &[u8], first: usize, plus_as_space: bool) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(input.len());
    out.extend_from_slice(&input[..first]);
    let mut idx = first;
    while idx < input.len() {
        match input[idx] {
            b'%' => {
                let hi = input.get(idx + 1).copied().and_then(hex_value);
                let lo = input.get(idx + 2).copied().and_then(hex_value);
                match (hi, lo) {
                    (Some(hi), Some(lo)) => {
                        out.push((hi << 4) | lo);
                        idx += 3;
                    }
                    _ => return Err(Error::MalformedEncoding { offset: idx }),
                }
            }
            b'+' if plus_as_space => {
                out.push(b' ');
                idx += 1;
            }
            byte => {
                out.push(byte);
                idx += 1;
            }
        }
    }
    Ok(out)
}

fn hex_value(byte: u8) -> Option<u8> {
    match byte {
        b'0'..=b'9' => Some(byte - b'0'),
        b'a'..=b'f' => Some(byte - b'a' + 10),
        b'A'..=b'F' => Some(byte - b'A' + 10),
        _ => None,
    }
}

const HEX_UPPER: &[u8; 16] = b"0123456789ABCDEF";

/// Percent-encode a value for a form body. Unreserved bytes pass through and
/// spaces become `+`.
pub fn encode_component_into(out: &mut String, text: &str) {
    for &byte in text.as_bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' => {
                out.push(byte as char)
            }
            b' ' => out.push('+'),
            _ => {
                out.push('%');
                out.push(HEX_UPPER[(byte >> 4) as usize] as char);
                out.push(HEX_UPPER[(byte & 0x0f) as usize] as char);
            }
        }
    }
}
