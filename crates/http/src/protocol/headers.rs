//! Case-insensitive header collection and the incremental header line parser.
//!
//! Field names are stored lower-cased, so lookups with any casing hit the same
//! entry. Setting a name that is already present joins the values with a comma,
//! which is how HTTP/1.1 folds repeated fields into one; [`Headers::replace`]
//! overwrites instead.

use std::fmt;

use http::header::CONTENT_LENGTH;

use crate::ensure;
use crate::protocol::ParseError;
use crate::utils::{CRLF, find_crlf};

/// A case-insensitive header map holding one (possibly comma-joined) value per name.
///
/// Entries keep their insertion order, which is also the order they are written
/// back out by the response writer.
///
/// # Examples
///
/// ```
/// use raw_http::protocol::Headers;
///
/// let mut headers = Headers::new();
/// headers.set("Accept", "text/html");
/// headers.set("ACCEPT", "application/json");
///
/// assert_eq!(headers.get("accept"), Some("text/html,application/json"));
///
/// headers.replace("Accept", "*/*");
/// assert_eq!(headers.get("Accept"), Some("*/*"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    inner: Vec<(String, String)>,
}

impl Headers {
    /// Creates an empty header collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the value stored for `name` (case-insensitive), or `None`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.position(name).map(|index| self.inner[index].1.as_str())
    }

    /// Inserts `value` for `name`, appending it as `existing,value` if the name
    /// is already present.
    pub fn set(&mut self, name: &str, value: &str) {
        match self.position(name) {
            Some(index) => {
                let existing = &mut self.inner[index].1;
                existing.push(',');
                existing.push_str(value);
            }
            None => self.inner.push((name.to_ascii_lowercase(), value.to_owned())),
        }
    }

    /// Stores `value` for `name`, discarding any previous value.
    pub fn replace(&mut self, name: &str, value: &str) {
        match self.position(name) {
            Some(index) => value.clone_into(&mut self.inner[index].1),
            None => self.inner.push((name.to_ascii_lowercase(), value.to_owned())),
        }
    }

    /// Removes `name` (case-insensitive). Returns `true` if an entry was removed.
    pub fn remove(&mut self, name: &str) -> bool {
        match self.position(name) {
            Some(index) => {
                self.inner.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Iterates `(name, value)` pairs in insertion order. Names are lower-case.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.inner.iter().map(|(name, value)| (name.as_str(), value.as_str()))
    }

    /// Reads the `Content-Length` header.
    ///
    /// # Returns
    ///
    /// - `Ok(None)` if the header is absent or its value is empty
    /// - `Ok(Some(length))` if the value is a base-10 integer
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::InvalidContentLength`] for any other value.
    pub fn content_length(&self) -> Result<Option<usize>, ParseError> {
        match self.get(CONTENT_LENGTH.as_str()) {
            None | Some("") => Ok(None),
            Some(value) => value
                .parse::<usize>()
                .map(Some)
                .map_err(|e| ParseError::invalid_content_length(format!("value {value} is not a length: {e}"))),
        }
    }

    /// Parses one header line from the start of `src`.
    ///
    /// # Returns
    ///
    /// - `Ok((0, false))` if `src` holds no complete line yet
    /// - `Ok((2, true))` if `src` starts with the blank line ending the header section
    /// - `Ok((n, false))` after storing one header field, `n` being the line length plus CRLF
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::InvalidHeader`] if the line has no colon, has
    /// whitespace between the field name and the colon, has an empty field
    /// name, has a field name with non-token characters, or has a value that
    /// is not UTF-8. Nothing is consumed or stored in that case.
    pub fn parse_line(&mut self, src: &[u8]) -> Result<(usize, bool), ParseError> {
        let Some(line_end) = find_crlf(src) else {
            return Ok((0, false));
        };

        if line_end == 0 {
            return Ok((CRLF.len(), true));
        }

        let line = &src[..line_end];
        let colon = line.iter().position(|b| *b == b':').ok_or_else(|| ParseError::invalid_header("no colon found"))?;

        let raw_name = &line[..colon];
        ensure!(!raw_name.last().is_some_and(u8::is_ascii_whitespace), ParseError::invalid_header("space before colon"));

        let name = raw_name.trim_ascii_start();
        ensure!(!name.is_empty(), ParseError::invalid_header("empty field name"));
        ensure!(name.iter().copied().all(is_token_char), ParseError::invalid_header("invalid character in field name"));

        let value = std::str::from_utf8(&line[colon + 1..])
            .map_err(|e| ParseError::invalid_header(format!("field value is not utf-8: {e}")))?
            .trim();

        // token characters are all ASCII
        let name = std::str::from_utf8(name).map_err(ParseError::invalid_header)?;
        self.set(name, value);

        Ok((line_end + CRLF.len(), false))
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.inner.iter().position(|(key, _)| key.eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for Headers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, value) in &self.inner {
            write!(f, "{name}: {value}\r\n")?;
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a Headers {
    type Item = (&'a str, &'a str);
    type IntoIter = Box<dyn Iterator<Item = Self::Item> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.iter())
    }
}

/// Returns true for the characters RFC 9110 allows in a field name (`tchar`).
#[inline]
fn is_token_char(b: u8) -> bool {
    b.is_ascii_alphanumeric()
        || matches!(b, b'!' | b'#' | b'$' | b'%' | b'&' | b'\'' | b'*' | b'+' | b'-' | b'.' | b'^' | b'_' | b'`' | b'|' | b'~')
}
