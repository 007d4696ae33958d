//! Decoder for nested query strings and `application/x-www-form-urlencoded`
//! bodies.
//!
//! Keys follow the bracket-path convention: `a[b]=1` builds a map, `a[]=1`
//! appends to a list, and repeated labels inside `a[][label]` group into one
//! map per record.
//!
//! ```
//! use serde_json::json;
//!
//! let map = nested_query::parse("a=1&b[]=2&c[d]=3").unwrap();
//! assert_eq!(nested_query::to_json(&map), json!({"a": "1", "b": ["2"], "c": {"d": "3"}}));
//! ```

pub mod decode;
pub mod encode;
pub mod error;
pub mod options;
pub mod text;
pub mod value;

mod serde;

use std::io::Read;

use ::serde::de::DeserializeOwned;

pub use crate::error::{Error, ErrorKind};
pub use crate::options::{ParseOptions, ValuelessBrackets, DEFAULT_MAX_DEPTH};
pub use crate::value::{Map, Value, ValueKind};

pub type Result<T> = std::result::Result<T, Error>;

pub fn parse(input: impl AsRef<[u8]>) -> Result<Map> {
    parse_with_options(input, &ParseOptions::default())
}

pub fn parse_with_options(input: impl AsRef<[u8]>, options: &ParseOptions) -> Result<Map> {
    decode::parse(input.as_ref(), options)
}

/// Parse a form body whose delimiters may themselves be percent-encoded. The
/// whole body is decoded once before the pairs are split.
pub fn parse_urlencoded(input: impl AsRef<[u8]>) -> Result<Map> {
    parse_urlencoded_with_options(input, &ParseOptions::default())
}

pub fn parse_urlencoded_with_options(
    input: impl AsRef<[u8]>,
    options: &ParseOptions,
) -> Result<Map> {
    decode::parse_urlencoded(input.as_ref(), options)
}

pub fn from_str<T: DeserializeOwned>(input: &str) -> Result<T> {
    from_str_with_options(input, &ParseOptions::default())
}

pub fn from_str_with_options<T: DeserializeOwned>(
    input: &str,
    options: &ParseOptions,
) -> Result<T> {
    decode::from_str(input, options)
}

pub fn from_bytes<T: DeserializeOwned>(input: &[u8]) -> Result<T> {
    from_bytes_with_options(input, &ParseOptions::default())
}

pub fn from_bytes_with_options<T: DeserializeOwned>(
    input: &[u8],
    options: &ParseOptions,
) -> Result<T> {
    decode::from_slice(input, options)
}

pub fn from_reader<T: DeserializeOwned, R: Read>(reader: R) -> Result<T> {
    from_reader_with_options(reader, &ParseOptions::default())
}

pub fn from_reader_with_options<T: DeserializeOwned, R: Read>(
    reader: R,
    options: &ParseOptions,
) -> Result<T> {
    decode::from_reader(reader, options)
}

pub fn to_json(map: &Map) -> serde_json::Value {
    serde_json::Value::Object(value::map_to_json(map))
}

/// Parse independent buffers on the rayon pool. Results keep input order.
#[cfg(feature = "parallel")]
pub fn parse_many<I>(inputs: &[I], options: &ParseOptions) -> Vec<Result<Map>>
where
    I: AsRef<[u8]> + Sync,
{
    use rayon::prelude::*;

    inputs
        .par_iter()
        .map(|input| decode::parse(input.as_ref(), options))
        .collect()
}
