use std::collections::HashMap;

use crate::http::parser::{find_crlf, is_token, ParseError, CRLF};

/// Case-insensitive collection of HTTP header fields.
///
/// Names are stored lower-cased. Setting a name that already exists folds
/// the new value into the old one with a comma, so there is never more than
/// one entry per name. Iteration order is unspecified.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    fields: HashMap<String, String>,
}

impl Headers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up a header value, ignoring the case of `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .get(&name.to_ascii_lowercase())
            .map(|v| v.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(&name.to_ascii_lowercase())
    }

    /// Inserts a header, appending `,value` if the name is already present.
    ///
    /// # Example
    ///
    /// ```
    /// # use httpfromtcp::http::headers::Headers;
    /// let mut headers = Headers::new();
    /// headers.set("Accept", "text/html");
    /// headers.set("accept", "application/json");
    /// assert_eq!(headers.get("ACCEPT"), Some("text/html,application/json"));
    /// ```
    pub fn set(&mut self, name: &str, value: &str) {
        self.fields
            .entry(name.to_ascii_lowercase())
            .and_modify(|existing| {
                existing.push(',');
                existing.push_str(value);
            })
            .or_insert_with(|| value.to_string());
    }

    /// Overwrites a header regardless of any previous value.
    pub fn replace(&mut self, name: &str, value: &str) {
        self.fields.insert(name.to_ascii_lowercase(), value.to_string());
    }

    /// Removes a header, returning its value if it was present.
    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.fields.remove(&name.to_ascii_lowercase())
    }

    pub fn for_each<F>(&self, mut visit: F)
    where
        F: FnMut(&str, &str),
    {
        for (name, value) in &self.fields {
            visit(name, value);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Parses as many complete field lines as `data` holds.
    ///
    /// Returns the number of bytes consumed and whether the empty line that
    /// ends the header block was seen. A trailing partial line is left
    /// unconsumed for the next call. On error nothing from this call is
    /// stored; headers from earlier calls are kept.
    pub fn parse(&mut self, data: &[u8]) -> Result<(usize, bool), ParseError> {
        let mut read = 0;
        let mut done = false;
        let mut parsed = Vec::new();

        while let Some(idx) = find_crlf(&data[read..]) {
            if idx == 0 {
                done = true;
                read += CRLF.len();
                break;
            }

            parsed.push(parse_field_line(&data[read..read + idx])?);
            read += idx + CRLF.len();
        }

        for (name, value) in parsed {
            self.set(name, &value);
        }

        Ok((read, done))
    }
}

fn parse_field_line(line: &[u8]) -> Result<(&str, String), ParseError> {
    let colon = line
        .iter()
        .position(|&b| b == b':')
        .ok_or(ParseError::MalformedFieldLine)?;

    let (name, value) = (&line[..colon], &line[colon + 1..]);

    if name.is_empty() || !is_token(name) {
        return Err(ParseError::MalformedHeaderName(
            String::from_utf8_lossy(name).into_owned(),
        ));
    }

    // token bytes are ASCII
    let name = std::str::from_utf8(name)
        .map_err(|_| ParseError::MalformedHeaderName(String::from_utf8_lossy(name).into_owned()))?;
    let value = std::str::from_utf8(value).map_err(|_| ParseError::MalformedFieldLine)?;

    Ok((name, value.trim().to_string()))
}
