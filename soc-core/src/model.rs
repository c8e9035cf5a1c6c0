use chrono::{DateTime, NaiveDateTime, Utc};
use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Incidents seen this many times or more are flagged as escalations.
pub const ESCALATION_THRESHOLD: u32 = 3;

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
    Other(String),
}

impl Severity {
    /// Known levels, most severe first.
    pub const KNOWN: [Severity; 4] = [
        Severity::Critical,
        Severity::High,
        Severity::Medium,
        Severity::Low,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            Severity::Low => "LOW",
            Severity::Medium => "MEDIUM",
            Severity::High => "HIGH",
            Severity::Critical => "CRITICAL",
            Severity::Other(raw) => raw,
        }
    }
}

impl Default for Severity {
    fn default() -> Self {
        Severity::Other(String::new())
    }
}

impl From<String> for Severity {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "LOW" => Severity::Low,
            "MEDIUM" => Severity::Medium,
            "HIGH" => Severity::High,
            "CRITICAL" => Severity::Critical,
            _ => Severity::Other(raw),
        }
    }
}

impl From<Severity> for String {
    fn from(severity: Severity) -> Self {
        match severity {
            Severity::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Workflow stage. Only OPEN -> INVESTIGATING -> RESOLVED is ever offered;
/// stages outside that path are kept verbatim and expose no transitions.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Stage {
    #[default]
    Open,
    Investigating,
    Resolved,
    Other(String),
}

impl Stage {
    pub const KNOWN: [Stage; 3] = [Stage::Open, Stage::Investigating, Stage::Resolved];

    pub fn as_str(&self) -> &str {
        match self {
            Stage::Open => "OPEN",
            Stage::Investigating => "INVESTIGATING",
            Stage::Resolved => "RESOLVED",
            Stage::Other(raw) => raw,
        }
    }

    pub fn can_investigate(&self) -> bool {
        matches!(self, Stage::Open)
    }

    pub fn can_resolve(&self) -> bool {
        matches!(self, Stage::Open | Stage::Investigating)
    }
}

impl From<String> for Stage {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "OPEN" => Stage::Open,
            "INVESTIGATING" => Stage::Investigating,
            "RESOLVED" => Stage::Resolved,
            _ => Stage::Other(raw),
        }
    }
}

impl From<Stage> for String {
    fn from(stage: Stage) -> Self {
        match stage {
            Stage::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Mitre {
    #[serde(default)]
    pub tactic: Option<String>,
    #[serde(default)]
    pub technique: Option<String>,
    #[serde(default)]
    pub confidence: Option<f64>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AiAnalysis {
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub impact: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub remediation: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DeepInvestigation {
    #[serde(default)]
    pub attack_path_analysis: Option<String>,
    #[serde(default)]
    pub containment_strategy: Option<String>,
    #[serde(default)]
    pub risk_if_ignored: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ClosureReport {
    #[serde(default)]
    pub executive_summary: Option<String>,
    #[serde(default)]
    pub response_actions_taken: Option<String>,
    #[serde(default)]
    pub residual_risk: Option<String>,
    #[serde(default)]
    pub lessons_learned: Option<String>,
    #[serde(default)]
    pub generated_at: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub stage: Stage,
    pub timestamp: String,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Incident {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "@timestamp", default, deserialize_with = "null_as_default")]
    pub timestamp: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub threat_type: String,
    #[serde(default)]
    pub severity: Severity,
    #[serde(default)]
    pub risk_score: u32,
    #[serde(default)]
    pub source_ip: Option<String>,
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default = "default_occurrence_count")]
    pub occurrence_count: u32,
    #[serde(default)]
    pub repeat_offender: bool,
    #[serde(rename = "incident_stage", default)]
    pub stage: Stage,
    #[serde(default, deserialize_with = "lenient")]
    pub mitre: Option<Mitre>,
    #[serde(default, deserialize_with = "lenient")]
    pub ai_analysis: Option<AiAnalysis>,
    #[serde(default, deserialize_with = "lenient")]
    pub deep_investigation: Option<DeepInvestigation>,
    #[serde(default, deserialize_with = "lenient")]
    pub closure_report: Option<ClosureReport>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub history: Vec<HistoryEntry>,
}

fn default_occurrence_count() -> u32 {
    1
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Lenient<T> {
    Parsed(T),
    Ignored(IgnoredAny),
}

/// Enrichment blocks come from upstream tooling that sometimes stores them as
/// raw text; anything that is not the expected object decodes as `None`
/// instead of failing the whole incident list.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    match Lenient::<T>::deserialize(deserializer)? {
        Lenient::Parsed(value) => Ok(Some(value)),
        Lenient::Ignored(_) => Ok(None),
    }
}

impl Incident {
    pub fn is_escalation(&self) -> bool {
        self.occurrence_count >= ESCALATION_THRESHOLD
    }

    pub fn parsed_timestamp(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.timestamp)
    }
}

/// Accepts RFC 3339 and the naive `YYYY-MM-DDTHH:MM:SS[.f]` form, read as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metrics {
    #[serde(default)]
    pub total_incidents: u64,
    #[serde(default)]
    pub high_severity: u64,
    #[serde(default)]
    pub critical_severity: u64,
}

/// Body of `PUT /incidents/{id}/update-stage`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StageUpdate {
    pub new_stage: Stage,
    pub notes: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TriggerStatus {
    NoIncident,
    NoThreat,
    DuplicateSkipped,
    Other(String),
}

impl Default for TriggerStatus {
    fn default() -> Self {
        TriggerStatus::Other(String::new())
    }
}

impl TriggerStatus {
    /// Statuses that mean the run finished without opening anything new.
    pub fn is_informational(&self) -> bool {
        matches!(
            self,
            TriggerStatus::NoIncident | TriggerStatus::NoThreat | TriggerStatus::DuplicateSkipped
        )
    }
}

impl From<String> for TriggerStatus {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "NO_INCIDENT" => TriggerStatus::NoIncident,
            "NO_THREAT" => TriggerStatus::NoThreat,
            "DUPLICATE_SKIPPED" => TriggerStatus::DuplicateSkipped,
            _ => TriggerStatus::Other(raw),
        }
    }
}

impl From<TriggerStatus> for String {
    fn from(status: TriggerStatus) -> Self {
        match status {
            TriggerStatus::NoIncident => "NO_INCIDENT".into(),
            TriggerStatus::NoThreat => "NO_THREAT".into(),
            TriggerStatus::DuplicateSkipped => "DUPLICATE_SKIPPED".into(),
            TriggerStatus::Other(raw) => raw,
        }
    }
}

/// Response of `POST /run-detection`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TriggerResult {
    #[serde(default)]
    pub status: TriggerStatus,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub threat_type: Option<String>,
}
