//! Dashboard state and the operations that refresh or mutate it.
//!
//! All backend data flows through [`Controller`]; views only ever read
//! snapshots of [`DashboardState`]. Writes are last-write-wins: whichever
//! fetch completes last replaces the cached list or metrics wholesale.

use crate::client::{ApiError, IncidentApi};
use crate::model::{Incident, Metrics, Stage, StageUpdate, TriggerResult};
use chrono::{DateTime, Utc};
use std::cell::RefCell;
use std::rc::Rc;

pub const DEFAULT_STAGE_NOTES: &str = "Stage updated via UI action";
pub const NO_NEW_INCIDENTS: &str = "No new incidents detected at this time.";
pub const API_ERROR_TOAST: &str = "Failed to run detection pipeline. API returned an error.";
pub const NETWORK_ERROR_TOAST: &str = "Network error. Engine could not be reached.";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Tab {
    #[default]
    Dashboard,
    Incidents,
    Metrics,
    Trigger,
}

impl Tab {
    pub const ALL: [Tab; 4] = [Tab::Dashboard, Tab::Incidents, Tab::Metrics, Tab::Trigger];

    pub fn label(self) -> &'static str {
        match self {
            Tab::Dashboard => "Dashboard",
            Tab::Incidents => "Incidents",
            Tab::Metrics => "Metrics",
            Tab::Trigger => "Manual Trigger",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Toast {
    pub id: u64,
    pub kind: ToastKind,
    pub message: String,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct DashboardState {
    pub incidents: Vec<Incident>,
    pub metrics: Metrics,
    pub last_refresh: Option<DateTime<Utc>>,
    pub selected: Option<Incident>,
    pub active_tab: Tab,
    pub is_triggering: bool,
    pub toast: Option<Toast>,
    next_toast_id: u64,
}

impl DashboardState {
    fn replace_incidents(&mut self, incidents: Vec<Incident>, at: DateTime<Utc>) {
        if let Some(selected) = &mut self.selected {
            if let Some(fresh) = incidents.iter().find(|i| i.id == selected.id) {
                *selected = fresh.clone();
            }
        }
        self.incidents = incidents;
        self.last_refresh = Some(at);
    }

    fn push_toast(&mut self, kind: ToastKind, message: String) -> u64 {
        self.next_toast_id += 1;
        let id = self.next_toast_id;
        self.toast = Some(Toast { id, kind, message });
        id
    }
}

/// A single shared cell holding the dashboard state.
///
/// `update` returns `None` once the cell has been torn down; fetches still in
/// flight at teardown land there and are dropped.
pub trait StateStore {
    fn update<R>(&self, f: impl FnOnce(&mut DashboardState) -> R) -> Option<R>;
    fn snapshot(&self) -> DashboardState;
}

impl StateStore for Rc<RefCell<DashboardState>> {
    fn update<R>(&self, f: impl FnOnce(&mut DashboardState) -> R) -> Option<R> {
        Some(f(&mut self.borrow_mut()))
    }

    fn snapshot(&self) -> DashboardState {
        self.borrow().clone()
    }
}

/// Message shown after a manual detection run that reached the backend.
pub fn trigger_message(result: &TriggerResult) -> String {
    if result.status.is_informational() {
        format!(
            "Engine executed: {}",
            result.message.as_deref().unwrap_or(NO_NEW_INCIDENTS)
        )
    } else {
        format!(
            "Engine executed: Threat escalated! ({})",
            result.threat_type.as_deref().unwrap_or("New")
        )
    }
}

#[derive(Clone)]
pub struct Controller<A, S> {
    api: A,
    store: S,
}

impl<A: IncidentApi, S: StateStore> Controller<A, S> {
    pub fn new(api: A, store: S) -> Self {
        Self { api, store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub async fn refresh_incidents(&self) {
        match self.api.list_incidents().await {
            Ok(incidents) => {
                tracing::debug!(count = incidents.len(), "incidents refreshed");
                let now = Utc::now();
                self.store.update(|state| state.replace_incidents(incidents, now));
            }
            Err(err) => tracing::warn!(error = %err, "failed to fetch incidents"),
        }
    }

    pub async fn refresh_metrics(&self) {
        match self.api.fetch_metrics().await {
            Ok(metrics) => {
                self.store.update(|state| state.metrics = metrics);
            }
            Err(err) => tracing::warn!(error = %err, "failed to fetch metrics"),
        }
    }

    /// Both fetches run concurrently; one failing does not hold back the other.
    pub async fn refresh_all(&self) {
        futures::join!(self.refresh_incidents(), self.refresh_metrics());
    }

    /// Sends the transition, then re-fetches whatever the outcome. The cached
    /// incident is never edited locally.
    pub async fn update_stage(&self, id: &str, stage: Stage, notes: Option<String>) {
        let update = StageUpdate {
            new_stage: stage,
            notes: notes.unwrap_or_else(|| DEFAULT_STAGE_NOTES.to_string()),
        };
        match self.api.update_stage(id, &update).await {
            Ok(()) => tracing::info!(incident = id, stage = %update.new_stage, "stage update sent"),
            Err(err) => {
                tracing::warn!(incident = id, stage = %update.new_stage, error = %err, "failed to update incident stage")
            }
        }
        self.refresh_all().await;
    }

    /// Runs the detection pipeline once. Returns the id of the toast it
    /// raised, or `None` when a run was already in flight.
    pub async fn trigger_detection(&self) -> Option<u64> {
        let started = self
            .store
            .update(|state| {
                if state.is_triggering {
                    return false;
                }
                state.is_triggering = true;
                state.toast = None;
                true
            })
            .unwrap_or(false);
        if !started {
            return None;
        }

        let (kind, message) = match self.api.trigger_detection().await {
            Ok(result) => {
                tracing::info!(status = ?result.status, "detection run finished");
                (ToastKind::Success, trigger_message(&result))
            }
            Err(err @ ApiError::Status(_)) => {
                tracing::warn!(error = %err, "detection run rejected");
                (ToastKind::Error, API_ERROR_TOAST.to_string())
            }
            Err(err) => {
                tracing::error!(error = %err, "detection run failed");
                (ToastKind::Error, NETWORK_ERROR_TOAST.to_string())
            }
        };
        let toast_id = self.store.update(|state| state.push_toast(kind, message));

        self.refresh_all().await;
        self.store.update(|state| state.is_triggering = false);
        toast_id
    }

    /// Clears the toast only if it is still the one raised with `id`.
    pub fn dismiss_toast(&self, id: u64) {
        self.store.update(|state| {
            if state.toast.as_ref().is_some_and(|t| t.id == id) {
                state.toast = None;
            }
        });
    }

    pub fn select(&self, incident: Incident) {
        self.store.update(|state| state.selected = Some(incident));
    }

    pub fn close_detail(&self) {
        self.store.update(|state| state.selected = None);
    }

    pub fn set_tab(&self, tab: Tab) {
        self.store.update(|state| state.active_tab = tab);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Severity, TriggerStatus};

    #[derive(Clone, Copy)]
    enum Outcome {
        Ok,
        Status(u16),
        Offline,
    }

    #[derive(Default)]
    struct Calls {
        list: usize,
        metrics: usize,
        updates: Vec<(String, StageUpdate)>,
        triggers: usize,
    }

    #[derive(Clone)]
    struct MockApi {
        incidents: Rc<RefCell<Vec<Incident>>>,
        metrics: Rc<RefCell<Metrics>>,
        trigger: TriggerResult,
        incidents_outcome: Rc<RefCell<Outcome>>,
        metrics_outcome: Rc<RefCell<Outcome>>,
        mutate_outcome: Outcome,
        calls: Rc<RefCell<Calls>>,
    }

    impl MockApi {
        fn new(incidents: Vec<Incident>) -> Self {
            Self {
                incidents: Rc::new(RefCell::new(incidents)),
                metrics: Rc::new(RefCell::new(Metrics {
                    total_incidents: 1,
                    high_severity: 0,
                    critical_severity: 1,
                })),
                trigger: TriggerResult::default(),
                incidents_outcome: Rc::new(RefCell::new(Outcome::Ok)),
                metrics_outcome: Rc::new(RefCell::new(Outcome::Ok)),
                mutate_outcome: Outcome::Ok,
                calls: Rc::new(RefCell::new(Calls::default())),
            }
        }
    }

    fn offline() -> ApiError {
        let err = reqwest::Client::new()
            .get("not a url")
            .build()
            .expect_err("invalid url");
        ApiError::Transport(err)
    }

    fn check(outcome: Outcome) -> Result<(), ApiError> {
        match outcome {
            Outcome::Ok => Ok(()),
            Outcome::Status(code) => Err(ApiError::Status(code)),
            Outcome::Offline => Err(offline()),
        }
    }

    impl IncidentApi for MockApi {
        async fn list_incidents(&self) -> Result<Vec<Incident>, ApiError> {
            self.calls.borrow_mut().list += 1;
            check(*self.incidents_outcome.borrow())?;
            Ok(self.incidents.borrow().clone())
        }

        async fn fetch_metrics(&self) -> Result<Metrics, ApiError> {
            self.calls.borrow_mut().metrics += 1;
            check(*self.metrics_outcome.borrow())?;
            Ok(self.metrics.borrow().clone())
        }

        async fn update_stage(&self, id: &str, update: &StageUpdate) -> Result<(), ApiError> {
            self.calls
                .borrow_mut()
                .updates
                .push((id.to_string(), update.clone()));
            check(self.mutate_outcome)
        }

        async fn trigger_detection(&self) -> Result<TriggerResult, ApiError> {
            self.calls.borrow_mut().triggers += 1;
            check(self.mutate_outcome)?;
            Ok(self.trigger.clone())
        }
    }

    fn incident(id: &str, stage: Stage) -> Incident {
        serde_json::from_value(serde_json::json!({
            "_id": id,
            "@timestamp": "2024-01-01T00:00:00Z",
            "threat_type": "Credential Stuffing",
            "severity": "CRITICAL",
            "incident_stage": stage.as_str(),
            "occurrence_count": 4,
            "source_ip": "10.0.0.5"
        }))
        .expect("incident json")
    }

    fn controller(api: MockApi) -> Controller<MockApi, Rc<RefCell<DashboardState>>> {
        Controller::new(api, Rc::new(RefCell::new(DashboardState::default())))
    }

    #[tokio::test]
    async fn refresh_all_fills_state() {
        let api = MockApi::new(vec![incident("1", Stage::Open)]);
        let ctl = controller(api.clone());

        ctl.refresh_all().await;

        let state = ctl.store().snapshot();
        assert_eq!(state.incidents.len(), 1);
        assert_eq!(state.metrics.critical_severity, 1);
        assert!(state.last_refresh.is_some());
        assert_eq!(api.calls.borrow().list, 1);
        assert_eq!(api.calls.borrow().metrics, 1);
    }

    #[tokio::test]
    async fn failed_fetch_keeps_previous_state() {
        let api = MockApi::new(vec![incident("1", Stage::Open)]);
        let ctl = controller(api.clone());
        ctl.refresh_all().await;
        let before = ctl.store().snapshot();

        api.incidents.borrow_mut().clear();
        *api.incidents_outcome.borrow_mut() = Outcome::Status(500);
        *api.metrics_outcome.borrow_mut() = Outcome::Status(500);
        ctl.refresh_all().await;
        assert_eq!(ctl.store().snapshot(), before);

        *api.incidents_outcome.borrow_mut() = Outcome::Offline;
        *api.metrics_outcome.borrow_mut() = Outcome::Offline;
        ctl.refresh_all().await;
        assert_eq!(ctl.store().snapshot(), before);
    }

    #[tokio::test]
    async fn failed_incident_fetch_does_not_block_metrics() {
        let api = MockApi::new(vec![incident("1", Stage::Open)]);
        let ctl = controller(api.clone());
        ctl.refresh_all().await;
        let before = ctl.store().snapshot();

        api.incidents.borrow_mut().clear();
        api.metrics.borrow_mut().total_incidents = 7;
        *api.incidents_outcome.borrow_mut() = Outcome::Status(500);
        ctl.refresh_all().await;

        let state = ctl.store().snapshot();
        assert_eq!(state.metrics.total_incidents, 7);
        assert_eq!(state.incidents, before.incidents);
        assert_eq!(state.last_refresh, before.last_refresh);
    }

    #[tokio::test]
    async fn failed_metrics_fetch_does_not_block_incidents() {
        let api = MockApi::new(vec![incident("1", Stage::Open)]);
        let ctl = controller(api.clone());
        ctl.refresh_all().await;
        let before = ctl.store().snapshot();

        api.incidents.borrow_mut().push(incident("2", Stage::Investigating));
        api.metrics.borrow_mut().total_incidents = 9;
        *api.metrics_outcome.borrow_mut() = Outcome::Offline;
        ctl.refresh_all().await;

        let state = ctl.store().snapshot();
        assert_eq!(state.incidents.len(), 2);
        assert!(state.last_refresh >= before.last_refresh);
        assert_eq!(state.metrics, before.metrics);
    }

    #[tokio::test]
    async fn update_stage_sends_default_notes_then_refetches_once() {
        let api = MockApi::new(vec![incident("1", Stage::Open)]);
        let ctl = controller(api.clone());

        ctl.update_stage("1", Stage::Investigating, None).await;

        let calls = api.calls.borrow();
        assert_eq!(calls.updates.len(), 1);
        assert_eq!(calls.updates[0].0, "1");
        assert_eq!(calls.updates[0].1.new_stage, Stage::Investigating);
        assert_eq!(calls.updates[0].1.notes, DEFAULT_STAGE_NOTES);
        assert_eq!(calls.list, 1);
        assert_eq!(calls.metrics, 1);
    }

    #[tokio::test]
    async fn failed_update_still_refetches_and_leaves_stage() {
        let mut api = MockApi::new(vec![incident("1", Stage::Open)]);
        api.mutate_outcome = Outcome::Status(400);
        let ctl = controller(api.clone());

        ctl.update_stage("1", Stage::Resolved, Some("closing".into()))
            .await;

        assert_eq!(api.calls.borrow().list, 1);
        assert_eq!(api.calls.borrow().metrics, 1);
        let state = ctl.store().snapshot();
        assert_eq!(state.incidents[0].stage, Stage::Open);
        assert!(state.toast.is_none());
    }

    #[tokio::test]
    async fn trigger_with_no_threat_uses_default_message() {
        let mut api = MockApi::new(Vec::new());
        api.trigger = TriggerResult {
            status: TriggerStatus::NoThreat,
            message: None,
            threat_type: None,
        };
        let ctl = controller(api.clone());

        let toast_id = ctl.trigger_detection().await.expect("trigger ran");

        let state = ctl.store().snapshot();
        let toast = state.toast.expect("toast");
        assert_eq!(toast.id, toast_id);
        assert_eq!(toast.kind, ToastKind::Success);
        assert!(toast.message.contains("No new incidents detected at this time."));
        assert!(!state.is_triggering);
        assert_eq!(api.calls.borrow().list, 1);
        assert_eq!(api.calls.borrow().metrics, 1);
    }

    #[tokio::test]
    async fn trigger_escalation_names_threat_type() {
        let mut api = MockApi::new(Vec::new());
        api.trigger = TriggerResult {
            status: TriggerStatus::Other("INCIDENT_FOUND".into()),
            message: Some("ignored".into()),
            threat_type: Some("BRUTE_FORCE".into()),
        };
        let ctl = controller(api);

        ctl.trigger_detection().await;

        let toast = ctl.store().snapshot().toast.expect("toast");
        assert_eq!(toast.message, "Engine executed: Threat escalated! (BRUTE_FORCE)");
    }

    #[tokio::test]
    async fn trigger_errors_raise_distinct_toasts_and_still_refetch() {
        let mut api = MockApi::new(Vec::new());
        api.mutate_outcome = Outcome::Status(503);
        let ctl = controller(api.clone());
        ctl.trigger_detection().await;
        let toast = ctl.store().snapshot().toast.expect("toast");
        assert_eq!(toast.kind, ToastKind::Error);
        assert_eq!(toast.message, API_ERROR_TOAST);
        assert_eq!(api.calls.borrow().list, 1);

        let mut api = MockApi::new(Vec::new());
        api.mutate_outcome = Outcome::Offline;
        let ctl = controller(api.clone());
        ctl.trigger_detection().await;
        let state = ctl.store().snapshot();
        assert_eq!(state.toast.expect("toast").message, NETWORK_ERROR_TOAST);
        assert!(!state.is_triggering);
        assert_eq!(api.calls.borrow().metrics, 1);
    }

    #[tokio::test]
    async fn trigger_is_ignored_while_one_is_in_flight() {
        let api = MockApi::new(Vec::new());
        let ctl = controller(api.clone());
        ctl.store().update(|state| state.is_triggering = true);

        assert!(ctl.trigger_detection().await.is_none());
        assert_eq!(api.calls.borrow().triggers, 0);
    }

    #[tokio::test]
    async fn stale_dismiss_does_not_clear_newer_toast() {
        let api = MockApi::new(Vec::new());
        let ctl = controller(api);

        let first = ctl.trigger_detection().await.expect("first");
        let second = ctl.trigger_detection().await.expect("second");
        assert_ne!(first, second);

        ctl.dismiss_toast(first);
        assert!(ctl.store().snapshot().toast.is_some());
        ctl.dismiss_toast(second);
        assert!(ctl.store().snapshot().toast.is_none());
    }

    #[tokio::test]
    async fn poll_refreshes_open_detail() {
        let api = MockApi::new(vec![incident("1", Stage::Open)]);
        let ctl = controller(api.clone());
        ctl.select(incident("1", Stage::Open));

        api.incidents.borrow_mut()[0].stage = Stage::Investigating;
        ctl.refresh_incidents().await;

        let selected = ctl.store().snapshot().selected.expect("selected");
        assert_eq!(selected.stage, Stage::Investigating);
        assert_eq!(selected.severity, Severity::Critical);

        ctl.close_detail();
        assert!(ctl.store().snapshot().selected.is_none());
    }

    #[test]
    fn tab_switching() {
        let ctl = controller(MockApi::new(Vec::new()));
        assert_eq!(ctl.store().snapshot().active_tab, Tab::Dashboard);
        ctl.set_tab(Tab::Trigger);
        assert_eq!(ctl.store().snapshot().active_tab, Tab::Trigger);
        assert_eq!(Tab::Trigger.label(), "Manual Trigger");
    }

    #[test]
    fn informational_message_prefers_backend_text() {
        let result = TriggerResult {
            status: TriggerStatus::DuplicateSkipped,
            message: Some("Duplicate incident suppressed.".into()),
            threat_type: None,
        };
        assert_eq!(
            trigger_message(&result),
            "Engine executed: Duplicate incident suppressed."
        );
    }
}
