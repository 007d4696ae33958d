mod group;
mod path;
mod scan;

use std::io::Read;

use ::serde::de::DeserializeOwned;
use smol_str::SmolStr;

use crate::decode::path::{assign, Context};
use crate::decode::scan::{HeadEnd, Segment, Step};
use crate::text::percent::{decode_url, decode_value};
use crate::value::{Map, Value};
use crate::{Error, ParseOptions, Result, ValuelessBrackets};

pub fn parse(input: &[u8], options: &ParseOptions) -> Result<Map> {
    let result = Parser::new(input, options).run();
    if let Err(err) = &result {
        tracing::debug!(error = %err, len = input.len(), "query parse aborted");
    }
    result
}

pub fn parse_urlencoded(input: &[u8], options: &ParseOptions) -> Result<Map> {
    let decoded = decode_url(input)?;
    parse(&decoded, options)
}

pub fn from_slice<T: DeserializeOwned>(input: &[u8], options: &ParseOptions) -> Result<T> {
    let root = Value::Map(parse(input, options)?);
    T::deserialize(&root)
}

pub fn from_str<T: DeserializeOwned>(input: &str, options: &ParseOptions) -> Result<T> {
    from_slice(input.as_bytes(), options)
}

pub fn from_reader<T: DeserializeOwned, R: Read>(
    mut reader: R,
    options: &ParseOptions,
) -> Result<T> {
    let mut buf = Vec::new();
    reader
        .read_to_end(&mut buf)
        .map_err(|err| Error::Io(err.to_string()))?;
    from_slice(&buf, options)
}

struct Parser<'i> {
    input: &'i [u8],
    max_depth: usize,
    valueless: ValuelessBrackets,
}

impl<'i> Parser<'i> {
    fn new(input: &'i [u8], options: &ParseOptions) -> Self {
        Self {
            input,
            max_depth: options.max_depth,
            valueless: options.valueless_brackets,
        }
    }

    fn run(&self) -> Result<Map> {
        let mut root = Map::new();
        let mut pos = 0;
        while pos < self.input.len() {
            if self.input[pos] == b'&' {
                pos += 1;
                continue;
            }
            pos = self.parse_pair(&mut root, pos)?;
        }
        Ok(root)
    }

    /// Consume one `key[...]=value` pair starting at `start` and return the
    /// position after its terminator.
    fn parse_pair(&self, root: &mut Map, start: usize) -> Result<usize> {
        let (head_end, end) = scan::key_head(self.input, start);
        let key = self.text(start, head_end)?;
        let key_path = &self.input[start..head_end];
        match end {
            HeadEnd::Assign => {
                let (value, next) = self.capture_value(head_end + 1)?;
                assign(root, key, Value::string(value), key_path)?;
                Ok(next)
            }
            HeadEnd::Separator => {
                assign(root, key, Value::absent(), key_path)?;
                Ok(head_end + 1)
            }
            HeadEnd::Bracket => self.parse_bracketed(root, key, start, head_end),
        }
    }

    fn parse_bracketed(
        &self,
        root: &mut Map,
        key: SmolStr,
        start: usize,
        mut pos: usize,
    ) -> Result<usize> {
        let mut ctx = Context::Root(root, key);
        let mut depth = 0;
        loop {
            match scan::next_step(self.input, pos) {
                Step::Segment { segment, next } => {
                    depth += 1;
                    let path = &self.input[start..next];
                    if depth > self.max_depth {
                        return Err(Error::too_deep(path, self.max_depth));
                    }
                    ctx = match segment {
                        Segment::Array => ctx.enter_array(path)?,
                        Segment::Label(_) => {
                            let label = self.text(pos + 1, next - 1)?;
                            ctx.enter_label(label, &self.input[next..], path)?
                        }
                    };
                    pos = next;
                }
                Step::Assign => {
                    let (value, next) = self.capture_value(pos + 1)?;
                    ctx.commit(Value::string(value), &self.input[start..pos])?;
                    return Ok(next);
                }
                Step::Valueless => {
                    let path = &self.input[start..pos];
                    return match self.valueless {
                        ValuelessBrackets::Reject => Err(Error::unterminated(path, pos)),
                        ValuelessBrackets::Empty => {
                            ctx.commit(Value::string(String::new()), path)?;
                            Ok(pos + 1)
                        }
                    };
                }
                Step::Unterminated => {
                    return Err(Error::unterminated(&self.input[start..], pos));
                }
                Step::Stray => {
                    return Err(Error::malformed_key(&self.input[start..pos], pos));
                }
            }
        }
    }

    /// Decode the value starting at `from`, returning it with the position
    /// after its terminating `&`.
    fn capture_value(&self, from: usize) -> Result<(String, usize)> {
        let end = scan::value_end(self.input, from);
        let span = self.input.get(from..end).unwrap_or_default();
        let value = decode_value(span, from)?;
        Ok((value, end + 1))
    }

    fn text(&self, start: usize, end: usize) -> Result<SmolStr> {
        std::str::from_utf8(&self.input[start..end])
            .map(SmolStr::new)
            .map_err(|_| Error::InvalidUtf8 { offset: start })
    }
}
