//! Load-test script definitions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

/// The load-generation tool family a script is written for.
///
/// Serialized as `"locust"` / `"jmeter"`, matching the `script_type` field
/// of the runner protocol.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default, TS)]
#[serde(rename_all = "lowercase")]
pub enum ScriptKind {
    /// Python locustfile driven by the `locust` CLI.
    #[default]
    Locust,

    /// JMeter `.jmx` test plan driven by `jmeter -n`.
    #[serde(rename = "jmeter")]
    JMeter,
}

impl ScriptKind {
    /// Normalize a wire/script-type string.
    ///
    /// Blank input maps to [`ScriptKind::Locust`]. Matching ignores case and
    /// surrounding whitespace. Returns `None` for unknown engines.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "" | "locust" => Some(Self::Locust),
            "jmeter" => Some(Self::JMeter),
            _ => None,
        }
    }

    /// Wire name of this engine.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Locust => "locust",
            Self::JMeter => "jmeter",
        }
    }
}

impl fmt::Display for ScriptKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stored load-test script.
///
/// The content is an opaque blob; it is written verbatim into the working
/// directory of each execution and never interpreted.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, TS)]
pub struct Script {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "type", default)]
    pub kind: ScriptKind,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
