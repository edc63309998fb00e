// Logging-command protocol: `##vso[area.event key=value;key=value]data`
//
// External scripts emit one command per stdout line; everything else on
// stdout is plain output and is ignored by the parser's callers.

use std::collections::BTreeMap;

use super::error::{DomainError, Result};

pub const COMMAND_PREFIX: &str = "##vso[";

/// (escaped, unescaped) pairs, applied to property values and data
const ESCAPE_MAPPINGS: [(&str, &str); 4] = [("%3B", ";"), ("%0D", "\r"), ("%0A", "\n"), ("%5D", "]")];

/// A parsed logging command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingCommand {
    pub area: String,
    pub event: String,
    pub properties: BTreeMap<String, String>,
    pub data: String,
}

impl LoggingCommand {
    /// Parse a single output line
    ///
    /// The prefix may appear anywhere in the line (timestamps or other
    /// decorations in front of it are skipped).
    ///
    /// # Errors
    /// `DomainError::MalformedCommand` when the line carries no command or the
    /// command header is incomplete
    pub fn parse(line: &str) -> Result<Self> {
        let start = line
            .find(COMMAND_PREFIX)
            .ok_or_else(|| DomainError::MalformedCommand("missing command prefix".to_string()))?;
        let rest = &line[start + COMMAND_PREFIX.len()..];

        let end = rest
            .find(']')
            .ok_or_else(|| DomainError::MalformedCommand("missing closing ']'".to_string()))?;
        let header = &rest[..end];
        let data = &rest[end + 1..];

        let (name, props) = match header.split_once(' ') {
            Some((name, props)) => (name, props),
            None => (header, ""),
        };

        let (area, event) = name
            .split_once('.')
            .filter(|(area, event)| !area.is_empty() && !event.is_empty())
            .ok_or_else(|| {
                DomainError::MalformedCommand(format!("expected 'area.event', got '{}'", name))
            })?;

        let properties = props
            .split(';')
            .filter(|p| !p.trim().is_empty())
            .filter_map(|p| p.split_once('='))
            .map(|(k, v)| (k.trim().to_string(), unescape(v)))
            .collect();

        Ok(Self {
            area: area.to_string(),
            event: event.to_string(),
            properties,
            data: unescape(data),
        })
    }

    /// Case-insensitive area/event match
    pub fn is(&self, area: &str, event: &str) -> bool {
        self.area.eq_ignore_ascii_case(area) && self.event.eq_ignore_ascii_case(event)
    }

    /// Case-insensitive property lookup
    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }
}

fn unescape(value: &str) -> String {
    ESCAPE_MAPPINGS
        .iter()
        .fold(value.to_string(), |acc, (escaped, raw)| acc.replace(escaped, raw))
}
