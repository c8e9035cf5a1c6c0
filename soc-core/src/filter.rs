use crate::model::{Incident, Severity, Stage};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum SeverityFilter {
    #[default]
    All,
    Only(Severity),
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum StageFilter {
    #[default]
    All,
    Only(Stage),
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RepeatFilter {
    #[default]
    All,
    Yes,
    No,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    Desc,
    Asc,
}

impl SortOrder {
    pub fn toggle(self) -> Self {
        match self {
            SortOrder::Desc => SortOrder::Asc,
            SortOrder::Asc => SortOrder::Desc,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SortOrder::Desc => "Newest First",
            SortOrder::Asc => "Oldest First",
        }
    }
}

// Select boxes carry plain strings; "ALL" is the pass-everything option.

impl SeverityFilter {
    pub fn from_option(value: &str) -> Self {
        match value {
            "ALL" | "" => SeverityFilter::All,
            other => SeverityFilter::Only(Severity::from(other.to_string())),
        }
    }

    pub fn option_value(&self) -> String {
        match self {
            SeverityFilter::All => "ALL".into(),
            SeverityFilter::Only(severity) => severity.to_string(),
        }
    }
}

impl StageFilter {
    pub fn from_option(value: &str) -> Self {
        match value {
            "ALL" | "" => StageFilter::All,
            other => StageFilter::Only(Stage::from(other.to_string())),
        }
    }

    pub fn option_value(&self) -> String {
        match self {
            StageFilter::All => "ALL".into(),
            StageFilter::Only(stage) => stage.to_string(),
        }
    }
}

impl RepeatFilter {
    pub fn from_option(value: &str) -> Self {
        match value {
            "YES" => RepeatFilter::Yes,
            "NO" => RepeatFilter::No,
            _ => RepeatFilter::All,
        }
    }

    pub fn option_value(self) -> &'static str {
        match self {
            RepeatFilter::All => "ALL",
            RepeatFilter::Yes => "YES",
            RepeatFilter::No => "NO",
        }
    }
}

/// Criteria applied by the incident table.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct IncidentFilter {
    pub search: String,
    pub severity: SeverityFilter,
    pub stage: StageFilter,
    pub repeat: RepeatFilter,
    pub sort: SortOrder,
}

impl IncidentFilter {
    pub fn matches(&self, incident: &Incident) -> bool {
        self.matches_search(incident)
            && match &self.severity {
                SeverityFilter::All => true,
                SeverityFilter::Only(severity) => &incident.severity == severity,
            }
            && match &self.stage {
                StageFilter::All => true,
                StageFilter::Only(stage) => &incident.stage == stage,
            }
            && match self.repeat {
                RepeatFilter::All => true,
                RepeatFilter::Yes => incident.repeat_offender,
                RepeatFilter::No => !incident.repeat_offender,
            }
    }

    // Threat type is matched case-insensitively, the source IP verbatim.
    fn matches_search(&self, incident: &Incident) -> bool {
        if self.search.is_empty() {
            return true;
        }
        let ip_hit = incident
            .source_ip
            .as_deref()
            .is_some_and(|ip| ip.contains(&self.search));
        ip_hit
            || incident
                .threat_type
                .to_lowercase()
                .contains(&self.search.to_lowercase())
    }
}

/// Filters and orders `incidents` for display. Equal timestamps keep their
/// input order; timestamps that fail to parse sort as oldest.
pub fn apply(incidents: &[Incident], filter: &IncidentFilter) -> Vec<Incident> {
    let mut keyed: Vec<_> = incidents
        .iter()
        .filter(|incident| filter.matches(incident))
        .map(|incident| (incident.parsed_timestamp(), incident))
        .collect();

    keyed.sort_by(|(a, _), (b, _)| {
        let ord = a.cmp(b);
        match filter.sort {
            SortOrder::Asc => ord,
            SortOrder::Desc => ord.reverse(),
        }
    });

    keyed.into_iter().map(|(_, incident)| incident.clone()).collect()
}
