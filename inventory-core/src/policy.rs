use regex::Regex;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::sync::LazyLock;

/// Default first number for the sequential scheme.
pub const DEFAULT_START: u64 = 1_000_001;

static YEAR_IN_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"20\d{2}").expect("valid year regex"));
static YEAR_CODED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^INV-(\d{4})-(\d+)$").expect("valid identifier regex"));

/// How new inventory numbers are minted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "schema", rename_all = "snake_case")]
pub enum NumberingPolicy {
    /// Plain decimal numbers, never below `start`.
    Sequential { start: u64 },
    /// `INV-<year>-<NNN>` with an independent counter per year.
    YearCoded,
}

impl Default for NumberingPolicy {
    fn default() -> Self {
        NumberingPolicy::Sequential {
            start: DEFAULT_START,
        }
    }
}

/// Non-negative decimal number of any width, held as its digits without
/// leading zeros. Identifiers are compared and incremented in this form so
/// no stored value is too large to take part.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Decimal(String);

impl Decimal {
    pub fn zero() -> Self {
        Decimal("0".to_string())
    }

    /// Parses a non-empty run of ASCII digits.
    pub fn parse(digits: &str) -> Option<Self> {
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        match digits.trim_start_matches('0') {
            "" => Some(Self::zero()),
            canonical => Some(Decimal(canonical.to_string())),
        }
    }

    /// The next number, growing by one digit on carry out of the top.
    pub fn succ(&self) -> Self {
        let mut digits = self.0.clone().into_bytes();
        let mut pos = digits.len();
        loop {
            if pos == 0 {
                digits.insert(0, b'1');
                break;
            }
            pos -= 1;
            if digits[pos] == b'9' {
                digits[pos] = b'0';
            } else {
                digits[pos] += 1;
                break;
            }
        }
        Decimal(digits.into_iter().map(char::from).collect())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<u64> for Decimal {
    fn from(n: u64) -> Self {
        Decimal(n.to_string())
    }
}

impl Ord for Decimal {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0
            .len()
            .cmp(&other.0.len())
            .then_with(|| self.0.cmp(&other.0))
    }
}

impl PartialOrd for Decimal {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

/// Numeric value of a purely decimal identifier.
pub fn sequential_value(id: &str) -> Option<Decimal> {
    Decimal::parse(id)
}

/// `(year, counter)` of an `INV-<year>-<n>` identifier.
pub fn year_coded_parts(id: &str) -> Option<(&str, Decimal)> {
    let caps = YEAR_CODED.captures(id)?;
    let year = caps.get(1)?.as_str();
    let n = Decimal::parse(caps.get(2)?.as_str())?;
    Some((year, n))
}

/// First `20xx` token in an invoice date, if any.
pub fn year_from_date(date: &str) -> Option<&str> {
    YEAR_IN_DATE.find(date).map(|m| m.as_str())
}

pub fn format_year_coded(year: &str, n: &Decimal) -> String {
    format!("INV-{year}-{n:0>3}")
}
