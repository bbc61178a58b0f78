use std::fmt;
use std::str::FromStr;

use chrono::{Local, NaiveDate, TimeDelta};
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Root aggregate persisted as one JSON document.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tree {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(rename = "nextId", default = "default_next_id")]
    pub next_id: u64,
    #[serde(default)]
    pub roles: Vec<Role>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub id: NodeId,
    #[serde(default, deserialize_with = "loose_text")]
    pub title: String,
    #[serde(default, deserialize_with = "required_importance")]
    pub importance: Importance,
    #[serde(default)]
    pub lt_goals: Vec<LongTermGoal>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LongTermGoal {
    pub id: NodeId,
    #[serde(default, deserialize_with = "loose_text")]
    pub title: String,
    #[serde(default, deserialize_with = "loose_text")]
    pub description: String,
    #[serde(default, deserialize_with = "required_importance")]
    pub importance: Importance,
    #[serde(default = "DueDate::today", deserialize_with = "required_due")]
    pub due: DueDate,
    #[serde(default)]
    pub st_goals: Vec<ShortTermGoal>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShortTermGoal {
    pub id: NodeId,
    #[serde(default, deserialize_with = "loose_text")]
    pub title: String,
    #[serde(default, deserialize_with = "loose_text")]
    pub description: String,
    /// `None` inherits the owning LT's importance.
    #[serde(default, deserialize_with = "optional_importance")]
    pub importance: Option<Importance>,
    /// `None` inherits the owning LT's due date.
    #[serde(default, deserialize_with = "optional_due")]
    pub due: Option<DueDate>,
    #[serde(default)]
    pub tasks: Vec<Task>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: NodeId,
    #[serde(default, deserialize_with = "loose_text")]
    pub title: String,
    #[serde(default, deserialize_with = "loose_text")]
    pub description: String,
    #[serde(default, deserialize_with = "optional_importance")]
    pub importance: Option<Importance>,
    #[serde(default, deserialize_with = "optional_due")]
    pub due: Option<DueDate>,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum NodeKind {
    Role,
    LongTerm,
    ShortTerm,
    Task,
}

impl NodeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Role => "role",
            Self::LongTerm => "lt",
            Self::ShortTerm => "st",
            Self::Task => "task",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Role => "role",
            Self::LongTerm => "long-term goal",
            Self::ShortTerm => "short-term goal",
            Self::Task => "task",
        }
    }
}

/// Node identifier; the allocator issues stringified small integers.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn numeric(&self) -> Option<u64> {
        self.0.trim().parse().ok()
    }
}

impl From<u64> for NodeId {
    fn from(value: u64) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl PartialEq<str> for NodeId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for NodeId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl<'de> Deserialize<'de> for NodeId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Number(u64),
        }

        match RawId::deserialize(deserializer)? {
            RawId::Text(text) => Ok(Self(text)),
            RawId::Number(number) => Ok(Self(number.to_string())),
        }
    }
}

/// Importance on the 1 (lowest) to 5 (highest) scale.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Importance(u8);

impl Importance {
    pub const MIN: Importance = Importance(1);
    pub const MAX: Importance = Importance(5);

    pub fn new(value: u8) -> Option<Self> {
        (Self::MIN.0..=Self::MAX.0)
            .contains(&value)
            .then_some(Self(value))
    }

    /// Forces any integer into range.
    pub fn clamped(value: i64) -> Self {
        Self(value.clamp(Self::MIN.0 as i64, Self::MAX.0 as i64) as u8)
    }

    pub fn get(self) -> u8 {
        self.0
    }

    fn from_loose(raw: LooseNumber) -> Option<Self> {
        match raw {
            LooseNumber::Int(value) => Some(Self::clamped(value)),
            LooseNumber::Float(value) if value.is_finite() => {
                Some(Self::clamped(value.trunc() as i64))
            }
            LooseNumber::Float(_) => Some(Self::MIN),
            LooseNumber::Text(text) => {
                let trimmed = text.trim();
                if trimmed.is_empty() {
                    None
                } else {
                    Some(trimmed.parse().unwrap_or(Self::MIN))
                }
            }
        }
    }
}

impl Default for Importance {
    fn default() -> Self {
        Self::MIN
    }
}

impl fmt::Display for Importance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for Importance {
    type Err = std::num::ParseIntError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        value.trim().parse::<i64>().map(Self::clamped)
    }
}

impl Serialize for Importance {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.0)
    }
}

impl<'de> Deserialize<'de> for Importance {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = LooseNumber::deserialize(deserializer)?;
        Ok(Importance::from_loose(raw).unwrap_or_default())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LooseNumber {
    Int(i64),
    Float(f64),
    Text(String),
}

/// Calendar due date, exchanged as `YYYY-MM-DD`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DueDate(NaiveDate);

impl DueDate {
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    pub fn date(self) -> NaiveDate {
        self.0
    }

    pub fn today() -> Self {
        Self(Local::now().date_naive())
    }

    /// `base` shifted by `days`, clamped to the calendar's range.
    pub fn days_after(base: NaiveDate, days: i64) -> Self {
        let shifted = TimeDelta::try_days(days).and_then(|delta| base.checked_add_signed(delta));
        Self(shifted.unwrap_or(if days < 0 { NaiveDate::MIN } else { NaiveDate::MAX }))
    }
}

impl fmt::Display for DueDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0.format(DATE_FORMAT).to_string())
    }
}

impl FromStr for DueDate {
    type Err = chrono::ParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        // Full ISO timestamps are accepted; only the date part is kept.
        let date_part = trimmed.get(..10).unwrap_or(trimmed);
        NaiveDate::parse_from_str(date_part, DATE_FORMAT).map(Self)
    }
}

impl Serialize for DueDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DueDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(de::Error::custom)
    }
}

#[derive(Clone, Debug)]
pub struct LongTermInput {
    pub title: String,
    pub description: String,
    pub importance: Importance,
    pub due: Option<DueDate>,
}

#[derive(Clone, Debug, Default)]
pub struct GoalInput {
    pub title: String,
    pub description: String,
    pub importance: Option<Importance>,
    pub due: Option<DueDate>,
}

/// Destination of a reparenting edit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MoveTarget {
    Role(NodeId),
    LongTerm(NodeId),
    ShortTerm(NodeId),
}

fn default_version() -> u32 {
    crate::schema::CURRENT_SCHEMA_VERSION
}

fn default_next_id() -> u64 {
    1
}

fn loose_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn required_importance<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Importance, D::Error> {
    Ok(optional_importance(deserializer)?.unwrap_or_default())
}

fn optional_importance<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<Importance>, D::Error> {
    Ok(Option::<LooseNumber>::deserialize(deserializer)?.and_then(Importance::from_loose))
}

fn required_due<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DueDate, D::Error> {
    Ok(optional_due(deserializer)?.unwrap_or_else(DueDate::today))
}

fn optional_due<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<DueDate>, D::Error> {
    match Option::<String>::deserialize(deserializer)? {
        Some(text) if !text.trim().is_empty() => text.parse().map(Some).map_err(de::Error::custom),
        _ => Ok(None),
    }
}
