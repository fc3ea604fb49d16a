//! Sequential business identifiers
//!
//! Every collection carries a human-facing id made of a two letter prefix and
//! a zero-padded decimal counter (`CU000042`, `LS00007`, `MA00001`,
//! `ST000120`). The next id is derived from the highest id currently stored
//! in the collection; the read of that id and the write of the new record are
//! the caller's business.

use crate::core::{DeskError, Result};

/// Prefix and digit width of one id sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SequenceSpec {
    pub prefix: &'static str,
    pub width: usize,
}

impl SequenceSpec {
    pub const CUSTOMER: SequenceSpec = SequenceSpec::new("CU", 6);
    pub const PROJECT: SequenceSpec = SequenceSpec::new("LS", 5);
    pub const AGREEMENT: SequenceSpec = SequenceSpec::new("MA", 5);
    pub const TICKET: SequenceSpec = SequenceSpec::new("ST", 6);

    pub const fn new(prefix: &'static str, width: usize) -> Self {
        Self { prefix, width }
    }

    /// Id following `last`, or the first id of the sequence when `last` is `None`
    pub fn next(&self, last: Option<&str>) -> Result<String> {
        next_id(self.prefix, self.width, last)
    }

    /// Numeric part of an id of this sequence
    pub fn parse(&self, id: &str) -> Result<u64> {
        parse_suffix(self.prefix, id)
    }

    /// Renders `n` as an id of this sequence
    pub fn format(&self, n: u64) -> String {
        format_id(self.prefix, self.width, n)
    }
}

/// Computes the id that follows `last` in the `prefix`/`width` sequence.
///
/// `last` is the business id of the record with the highest id in the
/// collection, `None` when the collection is empty. A counter that outgrows
/// `width` is rendered in full rather than truncated.
///
/// # Examples
///
/// ```
/// use maintdesk::sequence::next_id;
///
/// assert_eq!(next_id("CU", 6, Some("CU000042")).unwrap(), "CU000043");
/// assert_eq!(next_id("MA", 5, None).unwrap(), "MA00001");
/// assert!(next_id("ST", 6, Some("ST00A001")).is_err());
/// ```
pub fn next_id(prefix: &str, width: usize, last: Option<&str>) -> Result<String> {
    let next = match last {
        None => 1,
        Some(last) => parse_suffix(prefix, last)?
            .checked_add(1)
            .ok_or_else(|| malformed(prefix, last))?,
    };

    Ok(format_id(prefix, width, next))
}

fn parse_suffix(prefix: &str, id: &str) -> Result<u64> {
    let digits = id.strip_prefix(prefix).ok_or_else(|| malformed(prefix, id))?;

    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(malformed(prefix, id));
    }

    digits.parse::<u64>().map_err(|_| malformed(prefix, id))
}

fn format_id(prefix: &str, width: usize, n: u64) -> String {
    format!("{prefix}{n:0width$}")
}

fn malformed(prefix: &str, value: &str) -> DeskError {
    DeskError::MalformedSequence {
        prefix: prefix.to_string(),
        value: value.to_string(),
    }
}
