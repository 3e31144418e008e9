//! Record tokenizer and dispatch
//!
//! A save file is a sequence of tab-separated lines. Each line with at
//! least two fields is a record whose first field is its tag.

use super::types::{SaveError, TAG_GO_PAYOUT, TAG_PLAYER, TAG_TIME};
use std::str::FromStr;

/// Splits a line on runs of tab characters
///
/// A leading tab produces an empty first field and trailing tabs produce
/// nothing, so `"\tx"` is `["", "x"]` and `"x\t\t"` is `["x"]`.
pub fn tokenize(line: &str) -> Vec<&str> {
    let line = line.strip_suffix('\r').unwrap_or(line);
    line.split('\t')
        .enumerate()
        .filter(|(i, field)| *i == 0 || !field.is_empty())
        .map(|(_, field)| field)
        .collect()
}

/// Which loader a record is routed to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Time,
    GoPayout,
    Player,
    /// Anything else; the square loader looks at the tag again
    Square,
}

/// One tokenized line of a save file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record<'a> {
    line: usize,
    fields: Vec<&'a str>,
}

impl<'a> Record<'a> {
    /// Tokenizes `text`, the physical line `line` (1-based)
    ///
    /// Returns None for blank and separator lines.
    pub fn parse(line: usize, text: &'a str) -> Option<Self> {
        let fields = tokenize(text);
        if fields.len() > 1 {
            Some(Record { line, fields })
        } else {
            None
        }
    }

    pub fn line(&self) -> usize {
        self.line
    }

    pub fn tag(&self) -> &'a str {
        self.fields[0]
    }

    pub fn kind(&self) -> RecordKind {
        match self.tag() {
            TAG_TIME => RecordKind::Time,
            TAG_GO_PAYOUT => RecordKind::GoPayout,
            TAG_PLAYER => RecordKind::Player,
            _ => RecordKind::Square,
        }
    }

    /// Fails unless the record has at least `expected` fields, tag included
    pub fn require(&self, expected: usize) -> Result<(), SaveError> {
        if self.fields.len() < expected {
            return Err(SaveError::MalformedRecord {
                line: self.line,
                tag: self.tag().to_string(),
                expected,
                found: self.fields.len(),
            });
        }
        Ok(())
    }

    pub fn field(&self, index: usize) -> Result<&'a str, SaveError> {
        self.require(index + 1)?;
        Ok(self.fields[index])
    }

    /// Optional trailing field
    pub fn get(&self, index: usize) -> Option<&'a str> {
        self.fields.get(index).copied()
    }

    /// Parses a plain decimal field
    pub fn number<T: FromStr>(&self, index: usize, name: &'static str) -> Result<T, SaveError> {
        let raw = self.field(index)?;
        raw.parse().map_err(|_| self.numeric_error(name, raw))
    }

    /// Parses a color written as an integer literal (`0xff0000`, `#ff0000`, `16711680`)
    pub fn color(&self, index: usize, name: &'static str) -> Result<u32, SaveError> {
        let raw = self.field(index)?;
        decode_int(raw)
            .and_then(|value| u32::try_from(value).ok())
            .ok_or_else(|| self.numeric_error(name, raw))
    }

    pub fn numeric_error(&self, field: &'static str, value: &str) -> SaveError {
        SaveError::NumericParseFailure {
            line: self.line,
            field,
            value: value.to_string(),
        }
    }
}

/// Decodes an integer literal with an auto-detected radix
///
/// `0x`, `0X` and `#` select hexadecimal, a leading `0` followed by more
/// digits selects octal, anything else is decimal. An optional sign may
/// come first.
pub fn decode_int(raw: &str) -> Option<i64> {
    let (negative, digits) = match raw.as_bytes().first()? {
        b'-' => (true, &raw[1..]),
        b'+' => (false, &raw[1..]),
        _ => (false, raw),
    };

    let (radix, body) = if let Some(hex) = digits
        .strip_prefix("0x")
        .or_else(|| digits.strip_prefix("0X"))
        .or_else(|| digits.strip_prefix('#'))
    {
        (16, hex)
    } else if digits.len() > 1 && digits.starts_with('0') {
        (8, &digits[1..])
    } else {
        (10, digits)
    };

    // from_str_radix would accept a second sign
    if body.is_empty() || body.starts_with(['-', '+']) {
        return None;
    }

    let value = i64::from_str_radix(body, radix).ok()?;
    Some(if negative { -value } else { value })
}
