//! Archive identifiers and the work items derived from them
//!
//! Upstream names every published archive and localization bundle with a
//! fixed-width `YYYYMMDDHHMMSS` stamp, e.g. `gameDb/gamedata-20240101120000.zip`
//! or `l10n/l10n-Korean-20240101120000.txt`. Because the stamp is zero-padded,
//! sorting identifiers as strings sorts them chronologically.

use std::fmt;
use std::sync::LazyLock;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeDelta};
use regex::Regex;

use crate::{Error, Result};

static GAME_DATA_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"gamedata-(\d{14})").unwrap());

static LOCALIZATION_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"l10n-.*-(\d{14})").unwrap());

/// Decode `YYYYMMDDHHMMSS`. `None` if the digits are not a real date and time.
fn timestamp_from_digits(digits: &str) -> Option<NaiveDateTime> {
    let field = |range: std::ops::Range<usize>| digits.get(range)?.parse::<u32>().ok();
    let year = i32::try_from(field(0..4)?).ok()?;
    NaiveDate::from_ymd_opt(year, field(4..6)?, field(6..8)?)?.and_hms_opt(
        field(8..10)?,
        field(10..12)?,
        field(12..14)?,
    )
}

/// Kind of upstream resource an identifier names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ResourceKind {
    GameData,
    Localization,
}

impl ResourceKind {
    fn pattern(self) -> &'static Regex {
        match self {
            Self::GameData => &GAME_DATA_PATTERN,
            Self::Localization => &LOCALIZATION_PATTERN,
        }
    }
}

/// A published resource name with its embedded timestamp.
///
/// Ordering follows the raw string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ArchiveIdentifier {
    raw: String,
    kind: ResourceKind,
    timestamp: NaiveDateTime,
}

impl ArchiveIdentifier {
    /// Parse a game-data archive name (`...gamedata-YYYYMMDDHHMMSS...`).
    pub fn game_data(raw: impl Into<String>) -> Result<Self> {
        Self::parse(raw.into(), ResourceKind::GameData)
    }

    /// Parse a localization bundle path (`...l10n-<lang>-YYYYMMDDHHMMSS...`).
    pub fn localization(raw: impl Into<String>) -> Result<Self> {
        Self::parse(raw.into(), ResourceKind::Localization)
    }

    fn parse(raw: String, kind: ResourceKind) -> Result<Self> {
        let digits = kind
            .pattern()
            .captures(&raw)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string());

        let Some(digits) = digits else {
            return Err(Error::InvalidIdentifier { value: raw });
        };

        let Some(timestamp) = timestamp_from_digits(&digits) else {
            return Err(Error::InvalidIdentifier { value: raw });
        };

        Ok(Self {
            raw,
            kind,
            timestamp,
        })
    }

    /// The identifier exactly as published; used as the commit message.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    /// The embedded timestamp, without any zone.
    pub fn timestamp(&self) -> NaiveDateTime {
        self.timestamp
    }

    /// The embedded timestamp read as wall-clock time at `offset`.
    pub fn authored_at(&self, offset: FixedOffset) -> DateTime<FixedOffset> {
        let utc = self.timestamp - TimeDelta::seconds(i64::from(offset.local_minus_utc()));
        DateTime::from_naive_utc_and_offset(utc, offset)
    }
}

impl fmt::Display for ArchiveIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// One pending download-and-commit step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkItem {
    pub identifier: ArchiveIdentifier,

    /// Author date for the resulting commit
    pub authored_at: DateTime<FixedOffset>,

    /// Where the resource is downloaded from
    pub url: String,
}

impl WorkItem {
    pub fn new(identifier: ArchiveIdentifier, offset: FixedOffset, url: impl Into<String>) -> Self {
        let authored_at = identifier.authored_at(offset);
        Self {
            identifier,
            authored_at,
            url: url.into(),
        }
    }
}
