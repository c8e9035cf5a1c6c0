//! Render decisions shared by the incident table, the detail drawer and the
//! analytics tab. Components call these instead of branching on raw fields.

use crate::model::{parse_timestamp, ClosureReport, Incident, Metrics, Mitre, Severity, Stage};
use chrono::{DateTime, TimeZone, Utc};

pub const INVESTIGATION_NOTE_PREFIX: &str = "Analyst Notes: ";
pub const RESOLVE_NOTES: &str = "Incident manually resolved by analyst.";
pub const NOT_AVAILABLE: &str = "N/A";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RowActions {
    pub investigate: bool,
    pub resolve: bool,
}

impl RowActions {
    pub fn for_stage(stage: &Stage) -> Self {
        Self {
            investigate: stage.can_investigate(),
            resolve: stage.can_resolve(),
        }
    }

    pub fn count(self) -> usize {
        usize::from(self.investigate) + usize::from(self.resolve)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ContextTag {
    Technique(String),
    Repeat,
    Escalation(u32),
}

impl ContextTag {
    pub fn label(&self) -> String {
        match self {
            ContextTag::Technique(t) => t.clone(),
            ContextTag::Repeat => "Repeat".into(),
            ContextTag::Escalation(n) => format!("Escalation x{n}"),
        }
    }

    pub fn class(&self) -> &'static str {
        match self {
            ContextTag::Technique(_) => "tag technique",
            ContextTag::Repeat => "tag repeat",
            ContextTag::Escalation(_) => "tag escalation",
        }
    }
}

/// Tags for the "MITRE & Context" column.
pub fn context_tags(incident: &Incident) -> Vec<ContextTag> {
    let mut tags = Vec::new();
    if let Some(technique) = incident.mitre.as_ref().and_then(|m| m.technique.clone()) {
        tags.push(ContextTag::Technique(technique));
    }
    if incident.repeat_offender {
        tags.push(ContextTag::Repeat);
    }
    if incident.is_escalation() {
        tags.push(ContextTag::Escalation(incident.occurrence_count));
    }
    tags
}

/// Key for a table row: the incident id plus the fields the backend changes
/// in place, so a record that moved stage or escalated gets a fresh row.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct RowKey {
    id: String,
    stage: Stage,
    severity: Severity,
    occurrence_count: u32,
    repeat_offender: bool,
}

pub fn row_key(incident: &Incident) -> RowKey {
    RowKey {
        id: incident.id.clone(),
        stage: incident.stage.clone(),
        severity: incident.severity.clone(),
        occurrence_count: incident.occurrence_count,
        repeat_offender: incident.repeat_offender,
    }
}

/// The closure report is only shown once the incident is resolved.
pub fn closure_report(incident: &Incident) -> Option<&ClosureReport> {
    match incident.stage {
        Stage::Resolved => incident.closure_report.as_ref(),
        _ => None,
    }
}

pub fn investigation_notes(note: &str) -> String {
    let note = note.trim();
    if note.is_empty() {
        crate::controller::DEFAULT_STAGE_NOTES.to_string()
    } else {
        format!("{INVESTIGATION_NOTE_PREFIX}{note}")
    }
}

pub fn critical_banner(metrics: &Metrics) -> Option<String> {
    (metrics.critical_severity > 0).then(|| {
        format!(
            "There are {} critical incidents demanding immediate response.",
            metrics.critical_severity
        )
    })
}

pub fn severity_class(severity: &Severity) -> &'static str {
    match severity {
        Severity::Critical => "sev critical",
        Severity::High => "sev high",
        Severity::Medium => "sev medium",
        Severity::Low => "sev low",
        Severity::Other(_) => "sev unknown",
    }
}

pub fn stage_class(stage: &Stage) -> &'static str {
    match stage {
        Stage::Open => "stage open",
        Stage::Investigating => "stage investigating",
        Stage::Resolved => "stage resolved",
        Stage::Other(_) => "stage unknown",
    }
}

pub fn format_last_refresh<Tz: TimeZone>(at: Option<DateTime<Utc>>, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    match at {
        Some(at) => at.with_timezone(tz).format("%H:%M:%S").to_string(),
        None => "--:--:--".into(),
    }
}

/// Falls back to the raw string when the backend sent something unparsable.
pub fn format_timestamp<Tz: TimeZone>(raw: &str, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    match parse_timestamp(raw) {
        Some(ts) => ts.with_timezone(tz).format("%Y-%m-%d %H:%M:%S").to_string(),
        None => raw.to_string(),
    }
}

pub fn confidence_label(mitre: &Mitre) -> String {
    match mitre.confidence {
        Some(c) if c > 0.0 => format!("{:.0}%", c * 100.0),
        _ => NOT_AVAILABLE.into(),
    }
}

pub fn or_na(value: Option<&str>) -> &str {
    value.filter(|v| !v.is_empty()).unwrap_or(NOT_AVAILABLE)
}

/// Distribution counts for the metrics tab, computed from the cached list.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Analytics {
    pub total: usize,
    pub by_severity: Vec<(Severity, usize)>,
    pub by_stage: Vec<(Stage, usize)>,
    pub escalations: usize,
}

impl Analytics {
    pub fn from_incidents(incidents: &[Incident]) -> Self {
        let count_severity =
            |s: &Severity| incidents.iter().filter(|i| &i.severity == s).count();
        let count_stage = |s: &Stage| incidents.iter().filter(|i| &i.stage == s).count();
        Self {
            total: incidents.len(),
            by_severity: Severity::KNOWN
                .iter()
                .map(|s| (s.clone(), count_severity(s)))
                .collect(),
            by_stage: Stage::KNOWN
                .iter()
                .map(|s| (s.clone(), count_stage(s)))
                .collect(),
            escalations: incidents.iter().filter(|i| i.is_escalation()).count(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    pub fn percent(&self, count: usize) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            count as f64 * 100.0 / self.total as f64
        }
    }
}
