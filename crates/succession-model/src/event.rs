//! Ordination and consecration events.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::{ClergyId, ModelError};

// ============================================================================
// Identifiers
// ============================================================================

/// Record id of an ordination or consecration row.
///
/// Ids are assigned in creation order, so they double as the stable tie-break
/// when two events are otherwise indistinguishable.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct EventId(pub i64);

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for EventId {
    fn from(raw: i64) -> Self {
        Self(raw)
    }
}

// ============================================================================
// Dates
// ============================================================================

/// When an event happened, as far as the record knows.
///
/// Exactly one of: a full date, a bare year, or nothing at all ("the event is
/// asserted to have happened, date unknown"). When a full date is known the
/// year is derived from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EventDate {
    Exact(NaiveDate),
    Year(i32),
    #[default]
    Unknown,
}

impl EventDate {
    /// Combine a stored date column and a stored year column. The date wins.
    pub fn from_parts(date: Option<NaiveDate>, year: Option<i32>) -> Self {
        match (date, year) {
            (Some(d), _) => Self::Exact(d),
            (None, Some(y)) => Self::Year(y),
            (None, None) => Self::Unknown,
        }
    }

    pub fn exact(&self) -> Option<NaiveDate> {
        match self {
            Self::Exact(d) => Some(*d),
            _ => None,
        }
    }

    pub fn year(&self) -> Option<i32> {
        match self {
            Self::Exact(d) => Some(d.year()),
            Self::Year(y) => Some(*y),
            Self::Unknown => None,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Unknown)
    }

    /// Whether the recorded date does not rule out the event having happened
    /// on or before `date`.
    ///
    /// Bare years compare at year granularity; unknown dates never rule anything out.
    pub fn permits_on_or_before(&self, date: NaiveDate) -> bool {
        match self {
            Self::Exact(d) => *d <= date,
            Self::Year(y) => *y <= date.year(),
            Self::Unknown => true,
        }
    }
}

impl fmt::Display for EventDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            Self::Year(y) => write!(f, "{y}"),
            Self::Unknown => f.write_str("unknown"),
        }
    }
}

impl FromStr for EventDate {
    type Err = ModelError;

    /// Strict parse of the canonical rendering (`YYYY-MM-DD`, `YYYY`, `unknown`).
    ///
    /// Form input goes through [`crate::parse_event_date`] instead, which never fails.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case("unknown") {
            return Ok(Self::Unknown);
        }
        if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
            return Ok(Self::Exact(d));
        }
        let digits = s.strip_prefix('-').unwrap_or(s);
        if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
            if let Ok(y) = s.parse::<i32>() {
                return Ok(Self::Year(y));
            }
        }
        Err(ModelError::InvalidEventDate(s.to_string()))
    }
}

impl Serialize for EventDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for EventDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Year(i32),
        }

        match Option::<Raw>::deserialize(deserializer)? {
            None => Ok(Self::Unknown),
            Some(Raw::Year(y)) => Ok(Self::Year(y)),
            Some(Raw::Text(s)) => s.parse().map_err(serde::de::Error::custom),
        }
    }
}

// ============================================================================
// Validity
// ============================================================================

/// Canonical validity of an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Validity {
    #[default]
    Valid,
    DoubtfullyValid,
    Invalid,
}

impl Validity {
    /// Build from the two stored booleans; `None` if both are set.
    pub fn from_flags(is_invalid: bool, is_doubtfully_valid: bool) -> Option<Self> {
        match (is_invalid, is_doubtfully_valid) {
            (false, false) => Some(Self::Valid),
            (false, true) => Some(Self::DoubtfullyValid),
            (true, false) => Some(Self::Invalid),
            (true, true) => None,
        }
    }

    pub fn is_invalid(self) -> bool {
        self == Self::Invalid
    }

    pub fn is_doubtfully_valid(self) -> bool {
        self == Self::DoubtfullyValid
    }
}

/// The independent qualifiers every event carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EventFlags {
    /// Conditionally repeated because a prior event's validity was doubted.
    pub is_sub_conditione: bool,
    /// The occurrence itself is uncertain.
    pub is_doubtful_event: bool,
    pub validity: Validity,
}

// ============================================================================
// Events
// ============================================================================

/// Common view over ordinations and consecrations.
pub trait Event {
    /// Lowercase label used in messages and edge types.
    const KIND: &'static str;

    fn id(&self) -> EventId;
    /// The clergy member receiving orders.
    fn subject(&self) -> ClergyId;
    /// The ordaining bishop or principal consecrator, when known.
    fn actor(&self) -> Option<ClergyId>;
    fn date(&self) -> EventDate;
    fn flags(&self) -> &EventFlags;

    fn validity(&self) -> Validity {
        self.flags().validity
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ordination {
    pub id: EventId,
    /// The clergy member being ordained.
    pub clergy_id: ClergyId,
    pub ordaining_bishop_id: Option<ClergyId>,
    #[serde(default)]
    pub date: EventDate,
    #[serde(flatten)]
    pub flags: EventFlags,
}

impl Ordination {
    pub fn new(
        id: EventId,
        clergy_id: ClergyId,
        ordaining_bishop_id: Option<ClergyId>,
        date: EventDate,
    ) -> Self {
        Self {
            id,
            clergy_id,
            ordaining_bishop_id,
            date,
            flags: EventFlags::default(),
        }
    }

    pub fn with_flags(mut self, flags: EventFlags) -> Self {
        self.flags = flags;
        self
    }
}

impl Event for Ordination {
    const KIND: &'static str = "ordination";

    fn id(&self) -> EventId {
        self.id
    }

    fn subject(&self) -> ClergyId {
        self.clergy_id
    }

    fn actor(&self) -> Option<ClergyId> {
        self.ordaining_bishop_id
    }

    fn date(&self) -> EventDate {
        self.date
    }

    fn flags(&self) -> &EventFlags {
        &self.flags
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Consecration {
    pub id: EventId,
    /// The clergy member being consecrated.
    pub clergy_id: ClergyId,
    pub consecrator_id: Option<ClergyId>,
    #[serde(default)]
    pub date: EventDate,
    /// Bishops who consecrated jointly with the principal consecrator.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub co_consecrators: Vec<ClergyId>,
    #[serde(flatten)]
    pub flags: EventFlags,
}

impl Consecration {
    pub fn new(
        id: EventId,
        clergy_id: ClergyId,
        consecrator_id: Option<ClergyId>,
        date: EventDate,
    ) -> Self {
        Self {
            id,
            clergy_id,
            consecrator_id,
            date,
            co_consecrators: Vec::new(),
            flags: EventFlags::default(),
        }
    }

    pub fn with_co_consecrators(mut self, co: impl IntoIterator<Item = ClergyId>) -> Self {
        self.co_consecrators = co.into_iter().collect();
        self
    }

    pub fn with_flags(mut self, flags: EventFlags) -> Self {
        self.flags = flags;
        self
    }
}

impl Event for Consecration {
    const KIND: &'static str = "consecration";

    fn id(&self) -> EventId {
        self.id
    }

    fn subject(&self) -> ClergyId {
        self.clergy_id
    }

    fn actor(&self) -> Option<ClergyId> {
        self.consecrator_id
    }

    fn date(&self) -> EventDate {
        self.date
    }

    fn flags(&self) -> &EventFlags {
        &self.flags
    }
}
