use memchr::{memchr, memchr3};

/// What stopped the scan of a key head.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum HeadEnd {
    Assign,
    Bracket,
    Separator,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Segment<'a> {
    Array,
    Label(&'a [u8]),
}

/// One move of the bracket-path state machine, starting at a cursor that sits
/// just after the key head or a closed segment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Step<'a> {
    /// A complete segment; `next` is the position after its `]`.
    Segment { segment: Segment<'a>, next: usize },
    Assign,
    /// `&` or end of input before any `=`.
    Valueless,
    Unterminated,
    Stray,
}

/// Find the end of the key head of the pair starting at `start`.
///
/// The first byte always belongs to the head unless it is `=`, so a pair such
/// as `[ross][]=1` binds the literal key `[ross]`. `start` must point at a
/// byte other than `&`.
pub(crate) fn key_head(input: &[u8], start: usize) -> (usize, HeadEnd) {
    if input[start] == b'=' {
        return (start, HeadEnd::Assign);
    }
    let from = start + 1;
    match memchr3(b'=', b'&', b'[', &input[from..]) {
        Some(rel) => {
            let idx = from + rel;
            let end = match input[idx] {
                b'=' => HeadEnd::Assign,
                b'[' => HeadEnd::Bracket,
                _ => HeadEnd::Separator,
            };
            (idx, end)
        }
        None => (input.len(), HeadEnd::Separator),
    }
}

/// Position of the `&` ending a value that starts at `from`, or the input length.
pub(crate) fn value_end(input: &[u8], from: usize) -> usize {
    if from >= input.len() {
        return input.len();
    }
    memchr(b'&', &input[from..]).map_or(input.len(), |rel| from + rel)
}

pub(crate) fn next_step(input: &[u8], pos: usize) -> Step<'_> {
    match input.get(pos) {
        None | Some(b'&') => Step::Valueless,
        Some(b'=') => Step::Assign,
        Some(b'[') => match input.get(pos + 1) {
            Some(b']') => Step::Segment {
                segment: Segment::Array,
                next: pos + 2,
            },
            Some(_) => match memchr(b']', &input[pos + 2..]) {
                Some(rel) => {
                    let close = pos + 2 + rel;
                    Step::Segment {
                        segment: Segment::Label(&input[pos + 1..close]),
                        next: close + 1,
                    }
                }
                None => Step::Unterminated,
            },
            None => Step::Unterminated,
        },
        Some(_) => Step::Stray,
    }
}

/// The run of `[label]` segments at the start of `rest`, stopping at the first
/// `[]`, `=`, `&`, stray byte or end of input.
pub(crate) fn following_labels(rest: &[u8]) -> impl Iterator<Item = &[u8]> + '_ {
    let mut pos = 0;
    std::iter::from_fn(move || match next_step(rest, pos) {
        Step::Segment {
            segment: Segment::Label(label),
            next,
        } => {
            pos = next;
            Some(label)
        }
        _ => None,
    })
}
