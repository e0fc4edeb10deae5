//! Hook methods, timings, and event names.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use rulehook_core::AppError;

/// The category of operation a hook attaches to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionHookMethod {
    /// A new record is created.
    Create,
    /// A record is read.
    Read,
    /// An existing record is modified.
    Update,
    /// A record is removed.
    Delete,
    /// A record is written regardless of whether it existed.
    Write,
}

impl ActionHookMethod {
    /// Returns every method.
    pub fn all() -> &'static [ActionHookMethod] {
        &[
            Self::Create,
            Self::Read,
            Self::Update,
            Self::Delete,
            Self::Write,
        ]
    }

    /// Returns the method name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Read => "read",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::Write => "write",
        }
    }
}

impl fmt::Display for ActionHookMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ActionHookMethod {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "create" => Ok(Self::Create),
            "read" => Ok(Self::Read),
            "update" => Ok(Self::Update),
            "delete" => Ok(Self::Delete),
            "write" => Ok(Self::Write),
            _ => Err(AppError::invalid_event_name(format!(
                "Invalid hook method '{s}'. Valid values: create, read, update, delete, write"
            ))),
        }
    }
}

/// When a rule runs relative to the method's own execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionHookTime {
    /// Before the method runs.
    Before,
    /// After the method completed successfully.
    After,
    /// After the method failed.
    OnError,
}

impl ActionHookTime {
    /// Returns every timing.
    pub fn all() -> &'static [ActionHookTime] {
        &[Self::Before, Self::After, Self::OnError]
    }

    /// Returns the timing name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Before => "before",
            Self::After => "after",
            Self::OnError => "on_error",
        }
    }
}

impl fmt::Display for ActionHookTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ActionHookTime {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "before" => Ok(Self::Before),
            "after" => Ok(Self::After),
            "on_error" | "onerror" => Ok(Self::OnError),
            _ => Err(AppError::invalid_event_name(format!(
                "Invalid hook timing '{s}'. Valid values: before, after, on_error"
            ))),
        }
    }
}

/// Composite `(method, timing)` key under which rules are stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct HookKey {
    /// The hooked method.
    pub method: ActionHookMethod,
    /// The timing relative to the method.
    pub timing: ActionHookTime,
}

impl HookKey {
    /// Creates a new hook key.
    pub fn new(method: ActionHookMethod, timing: ActionHookTime) -> Self {
        Self { method, timing }
    }
}

impl fmt::Display for HookKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.method, self.timing)
    }
}

/// Fully qualified event name, written `"<method>.<timing>"`.
///
/// Always holds a valid pair: the textual form is only accepted through
/// [`FromStr`], which rejects unknown components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FullEventName {
    method: ActionHookMethod,
    timing: ActionHookTime,
}

impl FullEventName {
    /// Creates an event name from its parts.
    pub fn new(method: ActionHookMethod, timing: ActionHookTime) -> Self {
        Self { method, timing }
    }

    /// The method part.
    pub fn method(&self) -> ActionHookMethod {
        self.method
    }

    /// The timing part.
    pub fn timing(&self) -> ActionHookTime {
        self.timing
    }

    /// The hook this event resolves to.
    pub fn key(&self) -> HookKey {
        HookKey::new(self.method, self.timing)
    }
}

impl fmt::Display for FullEventName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.method, self.timing)
    }
}

impl FromStr for FullEventName {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split('.');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(method), Some(timing), None) => Ok(Self {
                method: method.parse()?,
                timing: timing.parse()?,
            }),
            _ => Err(AppError::invalid_event_name(format!(
                "Invalid event name '{s}', expected '<method>.<timing>'"
            ))),
        }
    }
}

impl TryFrom<String> for FullEventName {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<FullEventName> for String {
    fn from(name: FullEventName) -> Self {
        name.to_string()
    }
}

impl From<HookKey> for FullEventName {
    fn from(key: HookKey) -> Self {
        Self::new(key.method, key.timing)
    }
}
