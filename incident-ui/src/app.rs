use crate::bridge::{self, SignalStore};
use crate::components::analytics::AnalyticsPanel;
use crate::components::incident_drawer::IncidentDrawer;
use crate::components::incident_table::IncidentTable;
use crate::components::metrics_panel::{CriticalBanner, MetricsCards};
use crate::components::nav::{Sidebar, TopNav};
use crate::components::trigger_panel::TriggerPanel;
use leptos::*;
use soc_core::{ApiClient, Controller, DashboardConfig, DashboardState, Incident, Stage, Tab};
use wasm_bindgen_futures::spawn_local;

#[component]
pub fn App() -> impl IntoView {
    let config = DashboardConfig::from_build_env();
    tracing::info!(api = %config.api_base_url, "dashboard starting");

    let state = create_rw_signal(DashboardState::default());
    let ctl = bridge::provide_controller(Controller::new(
        ApiClient::from_config(&config),
        SignalStore(state),
    ));

    let incidents = create_memo(move |_| state.with(|s| s.incidents.clone()));
    let metrics = create_memo(move |_| state.with(|s| s.metrics.clone()));
    let last_refresh = create_memo(move |_| state.with(|s| s.last_refresh));
    let selected = create_memo(move |_| state.with(|s| s.selected.clone()));
    let active_tab = create_memo(move |_| state.with(|s| s.active_tab));
    let is_triggering = create_memo(move |_| state.with(|s| s.is_triggering));
    let toast = create_memo(move |_| state.with(|s| s.toast.clone()));

    // Incidents and metrics are fetched as two separate tasks so either one
    // can land first.
    let poll = move || {
        let incidents_ctl = ctl.get_value();
        spawn_local(async move { incidents_ctl.refresh_incidents().await });
        let metrics_ctl = ctl.get_value();
        spawn_local(async move { metrics_ctl.refresh_metrics().await });
    };
    poll();
    match set_interval_with_handle(poll, config.poll_interval) {
        Ok(handle) => on_cleanup(move || handle.clear()),
        Err(err) => tracing::error!(?err, "failed to start polling timer"),
    }

    let on_tab = Callback::new(move |tab: Tab| ctl.with_value(|c| c.set_tab(tab)));
    let on_select = Callback::new(move |incident: Incident| ctl.with_value(|c| c.select(incident)));
    let on_close = Callback::new(move |_: ()| ctl.with_value(|c| c.close_detail()));
    let on_update_stage = Callback::new(move |(id, stage): (String, Stage)| {
        let ctl = ctl.get_value();
        spawn_local(async move { ctl.update_stage(&id, stage, None).await });
    });
    let toast_ttl = config.toast_ttl;

    view! {
      <div class="shell">
        <Sidebar active=active_tab on_select=on_tab/>

        <div class="main">
          <TopNav last_refresh=last_refresh/>

          <div class="content">
            {move || match active_tab.get() {
                Tab::Dashboard => view! {
                  <CriticalBanner metrics=metrics/>
                  <MetricsCards metrics=metrics/>
                  <IncidentTable
                    incidents=incidents
                    on_select=on_select
                    on_update_stage=on_update_stage
                  />
                }
                .into_view(),
                Tab::Incidents => view! {
                  <IncidentTable
                    incidents=incidents
                    on_select=on_select
                    on_update_stage=on_update_stage
                  />
                }
                .into_view(),
                Tab::Metrics => view! {
                  <h2>"Security Posture Analytics"</h2>
                  <AnalyticsPanel incidents=incidents/>
                }
                .into_view(),
                Tab::Trigger => view! {
                  <TriggerPanel is_triggering=is_triggering toast=toast toast_ttl=toast_ttl/>
                }
                .into_view(),
            }}
          </div>
        </div>

        <IncidentDrawer incident=selected on_close=on_close/>
      </div>
    }
}
