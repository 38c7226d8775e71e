//! Route and stop identifier types.

use std::fmt;

/// A validated route identifier.
///
/// Route codes start with one or more ASCII letters followed by one or more
/// digits ("BX1", "M15", "Q44"). Anything may follow the digits, which covers
/// select-bus and express variants such as "M15+" and "SIM1C".
///
/// # Examples
///
/// ```
/// use transit_mapper::RouteId;
///
/// assert_eq!(RouteId::parse("BX1").unwrap().as_str(), "BX1");
/// assert!(RouteId::parse("M15+").is_some());
/// assert!(RouteId::parse("ignored").is_none());
/// assert!(RouteId::parse("308323").is_none());
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RouteId(String);

impl RouteId {
    /// Parse a route identifier, returning `None` when the letter-then-digit
    /// prefix is missing.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        let letters = s.bytes().take_while(|b| b.is_ascii_alphabetic()).count();
        if letters == 0 {
            return None;
        }

        let digits = s.as_bytes()[letters..]
            .iter()
            .take_while(|b| b.is_ascii_digit())
            .count();
        if digits == 0 {
            return None;
        }

        Some(RouteId(s.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RouteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for RouteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RouteId({})", self.0)
    }
}

/// A validated stop identifier: a non-empty run of ASCII digits.
///
/// Stored as text so leading zeros survive the round trip to the output
/// tables.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct StopId(String);

impl StopId {
    /// Parse a stop identifier, returning `None` unless `s` is all digits.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        Some(StopId(s.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// Numeric ordering, so "99" sorts before "100" in exported tables.
impl Ord for StopId {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        let a = self.0.trim_start_matches('0');
        let b = other.0.trim_start_matches('0');
        a.len()
            .cmp(&b.len())
            .then_with(|| a.cmp(b))
            .then_with(|| self.0.cmp(&other.0))
    }
}

impl PartialOrd for StopId {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for StopId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for StopId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StopId({})", self.0)
    }
}
