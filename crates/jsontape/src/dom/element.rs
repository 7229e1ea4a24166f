//! Typed views over tape slots.

use alloc::{borrow::Cow, string::String};

use crate::{
    Error, Kind, Result,
    tape::{next_sibling, payload, tag_byte},
};

/// One value on the tape. Copyable; navigation never allocates.
#[derive(Clone, Copy)]
pub struct Element<'a> {
    tape: &'a [u64],
    strings: &'a [u8],
    index: usize,
}

impl<'a> Element<'a> {
    pub(crate) fn new(tape: &'a [u64], strings: &'a [u8], index: usize) -> Self {
        Element {
            tape,
            strings,
            index,
        }
    }

    /// The JSON kind of this value.
    #[must_use]
    pub fn kind(&self) -> Kind {
        match tag_byte(self.tape[self.index]) {
            b'{' => Kind::Object,
            b'[' => Kind::Array,
            b'"' => Kind::String,
            b'l' => Kind::I64,
            b'u' => Kind::U64,
            b'd' => Kind::F64,
            b't' | b'f' => Kind::Bool,
            _ => Kind::Null,
        }
    }

    /// `true`/`false`, or `IncorrectType`.
    pub fn get_bool(&self) -> Result<bool> {
        match tag_byte(self.tape[self.index]) {
            b't' => Ok(true),
            b'f' => Ok(false),
            _ => Err(Error::IncorrectType),
        }
    }

    /// Whether the value is `null`.
    #[must_use]
    pub fn is_null(&self) -> bool {
        tag_byte(self.tape[self.index]) == b'n'
    }

    /// A signed integer; unsigned values are converted when they fit.
    pub fn get_i64(&self) -> Result<i64> {
        let raw = self.tape[self.index + 1..].first().copied().unwrap_or(0);
        match tag_byte(self.tape[self.index]) {
            #[expect(clippy::cast_possible_wrap)]
            b'l' => Ok(raw as i64),
            #[expect(clippy::cast_possible_wrap)]
            b'u' if raw <= i64::MAX as u64 => Ok(raw as i64),
            _ => Err(Error::IncorrectType),
        }
    }

    /// An unsigned integer; signed values are converted when non-negative.
    pub fn get_u64(&self) -> Result<u64> {
        let raw = self.tape[self.index + 1..].first().copied().unwrap_or(0);
        match tag_byte(self.tape[self.index]) {
            b'u' => Ok(raw),
            #[expect(clippy::cast_possible_wrap)]
            b'l' if (raw as i64) >= 0 => Ok(raw),
            _ => Err(Error::IncorrectType),
        }
    }

    /// Any number, widened to f64.
    #[expect(clippy::cast_precision_loss, clippy::cast_possible_wrap)]
    pub fn get_f64(&self) -> Result<f64> {
        let raw = self.tape[self.index + 1..].first().copied().unwrap_or(0);
        match tag_byte(self.tape[self.index]) {
            b'd' => Ok(f64::from_bits(raw)),
            b'l' => Ok((raw as i64) as f64),
            b'u' => Ok(raw as f64),
            _ => Err(Error::IncorrectType),
        }
    }

    /// The decoded string value.
    pub fn get_str(&self) -> Result<&'a str> {
        if tag_byte(self.tape[self.index]) != b'"' {
            return Err(Error::IncorrectType);
        }
        Ok(read_heap_str(
            self.strings,
            payload(self.tape[self.index]) as usize,
        ))
    }

    /// An array view.
    pub fn get_array(&self) -> Result<Array<'a>> {
        if tag_byte(self.tape[self.index]) != b'[' {
            return Err(Error::IncorrectType);
        }
        Ok(Array { element: *self })
    }

    /// An object view.
    pub fn get_object(&self) -> Result<Object<'a>> {
        if tag_byte(self.tape[self.index]) != b'{' {
            return Err(Error::IncorrectType);
        }
        Ok(Object { element: *self })
    }

    /// Resolves an RFC 6901 JSON Pointer relative to this value.
    ///
    /// The empty pointer is this value. `~1` and `~0` unescape to `/` and
    /// `~`. Array tokens must be plain decimal indices without leading
    /// zeros. Tokens that resolve to nothing report `NoSuchField`;
    /// descending into a scalar reports `IncorrectType`.
    pub fn at_pointer(&self, pointer: &str) -> Result<Element<'a>> {
        if pointer.is_empty() {
            return Ok(*self);
        }
        if !pointer.starts_with('/') {
            return Err(Error::NoSuchField);
        }
        let mut current = *self;
        for token in pointer[1..].split('/') {
            current = current.descend(token)?;
        }
        Ok(current)
    }

    fn descend(&self, token: &str) -> Result<Element<'a>> {
        match tag_byte(self.tape[self.index]) {
            b'{' => {
                let key = unescape_pointer_token(token)?;
                Object { element: *self }.get(&key)
            }
            b'[' => {
                let index = parse_array_index(token)?;
                Array { element: *self }.at(index).ok_or(Error::NoSuchField)
            }
            _ => Err(Error::IncorrectType),
        }
    }

    #[inline]
    fn close_index(&self) -> usize {
        payload(self.tape[self.index]) as usize
    }
}

/// Applies the `~1` → `/`, `~0` → `~` pointer unescapes.
fn unescape_pointer_token(token: &str) -> Result<Cow<'_, str>> {
    if !token.contains('~') {
        return Ok(Cow::Borrowed(token));
    }
    let mut out = String::with_capacity(token.len());
    let mut chars = token.chars();
    while let Some(c) = chars.next() {
        if c != '~' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('0') => out.push('~'),
            Some('1') => out.push('/'),
            _ => return Err(Error::NoSuchField),
        }
    }
    Ok(Cow::Owned(out))
}

/// Parses an array token: decimal, no sign, no leading zero except `0`.
fn parse_array_index(token: &str) -> Result<usize> {
    if token.is_empty()
        || !token.bytes().all(|b| b.is_ascii_digit())
        || (token.len() > 1 && token.starts_with('0'))
    {
        return Err(Error::NoSuchField);
    }
    token.parse().map_err(|_| Error::NoSuchField)
}

impl core::fmt::Debug for Element<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "Element({:?} @ {})", self.kind(), self.index)
    }
}

/// Reads a length-prefixed heap string.
fn read_heap_str(strings: &[u8], offset: usize) -> &str {
    let len =
        u32::from_le_bytes(strings[offset..offset + 4].try_into().expect("length prefix")) as usize;
    let bytes = &strings[offset + 4..offset + 4 + len];
    // SAFETY: heap strings are produced by the string decoder from input
    // the scanner already validated; the output is UTF-8 by construction.
    unsafe { core::str::from_utf8_unchecked(bytes) }
}

/// An array on the tape.
#[derive(Clone, Copy)]
pub struct Array<'a> {
    element: Element<'a>,
}

impl<'a> Array<'a> {
    /// In-order iteration over the elements.
    #[must_use]
    pub fn iter(&self) -> ArrayIter<'a> {
        ArrayIter {
            tape: self.element.tape,
            strings: self.element.strings,
            pos: self.element.index + 1,
            end: self.element.close_index(),
        }
    }

    /// Number of elements; walks the tape, O(n).
    #[must_use]
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.element.index + 1 == self.element.close_index()
    }

    /// The `i`-th element, if present; walks the tape, O(n).
    #[must_use]
    pub fn at(&self, i: usize) -> Option<Element<'a>> {
        self.iter().nth(i)
    }
}

impl<'a, 'r> IntoIterator for &'r Array<'a> {
    type Item = Element<'a>;
    type IntoIter = ArrayIter<'a>;

    fn into_iter(self) -> ArrayIter<'a> {
        self.iter()
    }
}

/// Iterator over array elements.
pub struct ArrayIter<'a> {
    tape: &'a [u64],
    strings: &'a [u8],
    pos: usize,
    end: usize,
}

impl<'a> Iterator for ArrayIter<'a> {
    type Item = Element<'a>;

    fn next(&mut self) -> Option<Element<'a>> {
        if self.pos >= self.end {
            return None;
        }
        let element = Element::new(self.tape, self.strings, self.pos);
        self.pos = next_sibling(self.tape, self.pos);
        Some(element)
    }
}

/// An object on the tape.
#[derive(Clone, Copy)]
pub struct Object<'a> {
    element: Element<'a>,
}

impl<'a> Object<'a> {
    /// In-order iteration over `(key, value)` pairs. Keys are unescaped.
    #[must_use]
    pub fn iter(&self) -> ObjectIter<'a> {
        ObjectIter {
            tape: self.element.tape,
            strings: self.element.strings,
            pos: self.element.index + 1,
            end: self.element.close_index(),
        }
    }

    /// Number of fields; walks the tape, O(n).
    #[must_use]
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.element.index + 1 == self.element.close_index()
    }

    /// Looks up a field by decoded key. Comparison is against the unescaped
    /// key bytes; the first match wins when keys repeat.
    pub fn get(&self, key: &str) -> Result<Element<'a>> {
        self.iter()
            .find_map(|(k, v)| (k == key).then_some(v))
            .ok_or(Error::NoSuchField)
    }
}

impl<'a, 'r> IntoIterator for &'r Object<'a> {
    type Item = (&'a str, Element<'a>);
    type IntoIter = ObjectIter<'a>;

    fn into_iter(self) -> ObjectIter<'a> {
        self.iter()
    }
}

/// Iterator over object fields.
pub struct ObjectIter<'a> {
    tape: &'a [u64],
    strings: &'a [u8],
    pos: usize,
    end: usize,
}

impl<'a> Iterator for ObjectIter<'a> {
    type Item = (&'a str, Element<'a>);

    fn next(&mut self) -> Option<(&'a str, Element<'a>)> {
        if self.pos >= self.end {
            return None;
        }
        let key = read_heap_str(self.strings, payload(self.tape[self.pos]) as usize);
        let value = Element::new(self.tape, self.strings, self.pos + 1);
        self.pos = next_sibling(self.tape, self.pos + 1);
        Some((key, value))
    }
}
