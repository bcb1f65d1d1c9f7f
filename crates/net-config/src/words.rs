//! Value splitting into colon separated parameter words

use std::ops::Deref;

/// Strip one layer of matching `"` or `'` quotes
///
/// Returns the unquoted text and whether the quoting was well formed. A
/// leading quote without a matching trailing one is stripped and reported
/// as invalid. Quotes inside the value are left alone.
pub fn unquote(value: &str) -> (String, bool) {
    let quote = match value.chars().next() {
        Some(q @ ('"' | '\'')) => q,
        _ => return (value.to_string(), true),
    };

    let inner = &value[quote.len_utf8()..];
    match inner.strip_suffix(quote) {
        Some(inner) => (inner.to_string(), true),
        None => (inner.to_string(), false),
    }
}

/// Colon separated parts of a variable value, in order
///
/// Empty fields are kept, as positions carry meaning. Brackets protect IPv6
/// literals from being split.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParameterWords(Vec<String>);

impl ParameterWords {
    /// Split an already unquoted value
    pub fn split(value: &str) -> Self {
        let mut words = Vec::new();
        let mut current = String::new();
        let mut depth = 0usize;

        for c in value.chars() {
            match c {
                '[' => {
                    depth += 1;
                    current.push(c);
                }
                ']' => {
                    depth = depth.saturating_sub(1);
                    current.push(c);
                }
                ':' if depth == 0 => words.push(std::mem::take(&mut current)),
                _ => current.push(c),
            }
        }
        words.push(current);

        Self(words)
    }

    /// Unquote and split a raw value
    ///
    /// The flag is false when the value had an unterminated quote.
    pub fn from_value(value: &str) -> (Self, bool) {
        let (unquoted, valid) = unquote(value);
        (Self::split(&unquoted), valid)
    }

    /// Non-empty word at `index`
    pub fn field(&self, index: usize) -> Option<&str> {
        self.0
            .get(index)
            .map(String::as_str)
            .filter(|word| !word.is_empty())
    }

    /// Words from `index` on, re-joined with `:`
    ///
    /// Used for trailing fields that contain colons themselves, such as MAC
    /// addresses.
    pub fn rest(&self, index: usize) -> Option<String> {
        if index >= self.0.len() {
            return None;
        }
        let rest = self.0[index..].join(":");
        if rest.is_empty() {
            None
        } else {
            Some(rest)
        }
    }
}

impl Deref for ParameterWords {
    type Target = [String];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<Vec<String>> for ParameterWords {
    fn from(words: Vec<String>) -> Self {
        Self(words)
    }
}

impl std::fmt::Display for ParameterWords {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.join(":"))
    }
}

/// Split a comma separated list, dropping empty entries
pub fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}
