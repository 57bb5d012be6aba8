use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionKind {
    Status,
    Urgency,
}

impl OptionKind {
    /// Convert enum → DB string
    pub fn to_db_str(&self) -> &'static str {
        match self {
            OptionKind::Status => "status",
            OptionKind::Urgency => "urgency",
        }
    }

    /// Convert DB string → enum
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "status" => Some(OptionKind::Status),
            "urgency" => Some(OptionKind::Urgency),
            _ => None,
        }
    }
}

impl fmt::Display for OptionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_db_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskOption {
    pub kind: OptionKind,
    pub value: String,
    pub label: String,
    pub color: String, // ANSI colour name: red, yellow, green, blue, cyan, magenta, white
    pub position: i32,
}

impl TaskOption {
    pub fn new(kind: OptionKind, value: &str, label: &str, color: &str, position: i32) -> Self {
        Self {
            kind,
            value: value.to_string(),
            label: label.to_string(),
            color: color.to_string(),
            position,
        }
    }
}
