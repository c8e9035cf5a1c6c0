use chrono::Local;
use leptos::*;
use soc_core::filter::{self, IncidentFilter, RepeatFilter, SeverityFilter, StageFilter};
use soc_core::view::{
    context_tags, format_timestamp, row_key, severity_class, stage_class, RowActions,
};
use soc_core::{Incident, Stage};

#[component]
pub fn IncidentTable(
    #[prop(into)] incidents: Signal<Vec<Incident>>,
    on_select: Callback<Incident>,
    on_update_stage: Callback<(String, Stage)>,
) -> impl IntoView {
    let criteria = create_rw_signal(IncidentFilter::default());
    let rows = create_memo(move |_| {
        incidents.with(|list| criteria.with(|c| filter::apply(list, c)))
    });

    view! {
      <section class="panel table">
        <div class="toolbar">
          <input
            type="text"
            placeholder="Search IP or Threat Type..."
            prop:value=move || criteria.with(|c| c.search.clone())
            on:input=move |ev| criteria.update(|c| c.search = event_target_value(&ev))
          />
          <label>
            "Severity: "
            <select
              prop:value=move || criteria.with(|c| c.severity.option_value())
              on:change=move |ev| {
                  criteria.update(|c| c.severity = SeverityFilter::from_option(&event_target_value(&ev)))
              }
            >
              <option value="ALL">"All Levels"</option>
              <option value="CRITICAL">"Critical"</option>
              <option value="HIGH">"High"</option>
              <option value="MEDIUM">"Medium"</option>
              <option value="LOW">"Low"</option>
            </select>
          </label>
          <label>
            "Stage: "
            <select
              prop:value=move || criteria.with(|c| c.stage.option_value())
              on:change=move |ev| {
                  criteria.update(|c| c.stage = StageFilter::from_option(&event_target_value(&ev)))
              }
            >
              <option value="ALL">"All"</option>
              <option value="OPEN">"Open"</option>
              <option value="INVESTIGATING">"Investigating"</option>
              <option value="RESOLVED">"Resolved"</option>
            </select>
          </label>
          <label>
            "Type: "
            <select
              prop:value=move || criteria.with(|c| c.repeat.option_value())
              on:change=move |ev| {
                  criteria.update(|c| c.repeat = RepeatFilter::from_option(&event_target_value(&ev)))
              }
            >
              <option value="ALL">"All"</option>
              <option value="YES">"Repeats"</option>
              <option value="NO">"First-Time"</option>
            </select>
          </label>
          <button on:click=move |_| criteria.update(|c| c.sort = c.sort.toggle())>
            {move || criteria.with(|c| c.sort.label())}
          </button>
        </div>

        <table>
          <thead>
            <tr>
              <th>"Threat Info"</th>
              <th>"Source IP"</th>
              <th>"Severity"</th>
              <th>"Stage"</th>
              <th>"MITRE & Context"</th>
              <th>"Actions"</th>
            </tr>
          </thead>
          <tbody>
            <Show
              when=move || rows.with(|r| !r.is_empty())
              fallback=|| view! {
                <tr>
                  <td colspan="6" class="empty">"No incidents match the given criteria."</td>
                </tr>
              }
            >
              <For
                each=move || rows.get()
                key=row_key
                children=move |incident| view! {
                  <IncidentRow
                    incident=incident
                    on_select=on_select
                    on_update_stage=on_update_stage
                  />
                }
              />
            </Show>
          </tbody>
        </table>
      </section>
    }
}

#[component]
fn IncidentRow(
    incident: Incident,
    on_select: Callback<Incident>,
    on_update_stage: Callback<(String, Stage)>,
) -> impl IntoView {
    let actions = RowActions::for_stage(&incident.stage);
    let investigate_id = incident.id.clone();
    let resolve_id = incident.id.clone();
    let tags = context_tags(&incident);
    let opened = incident.clone();

    view! {
      <tr class="row" on:click=move |_| on_select.call(opened.clone())>
        <td>
          <div class="threat">{incident.threat_type.clone()}</div>
          <div class="meta">{format_timestamp(&incident.timestamp, &Local)}</div>
        </td>
        <td class="mono">{incident.source_ip.clone().unwrap_or_default()}</td>
        <td>
          <span class=severity_class(&incident.severity)>{incident.severity.to_string()}</span>
        </td>
        <td>
          <span class=stage_class(&incident.stage)>{incident.stage.to_string()}</span>
        </td>
        <td>
          {tags
              .into_iter()
              .map(|tag| view! { <span class=tag.class()>{tag.label()}</span> })
              .collect_view()}
        </td>
        // Action clicks must not reach the row handler.
        <td class="actions" on:click=|ev| ev.stop_propagation()>
          {actions.investigate.then(|| view! {
            <button
              class="btn investigate"
              on:click=move |ev| {
                  ev.stop_propagation();
                  on_update_stage.call((investigate_id.clone(), Stage::Investigating));
              }
            >
              "Investigate"
            </button>
          })}
          {actions.resolve.then(|| view! {
            <button
              class="btn resolve"
              on:click=move |ev| {
                  ev.stop_propagation();
                  on_update_stage.call((resolve_id.clone(), Stage::Resolved));
              }
            >
              "Resolve"
            </button>
          })}
        </td>
      </tr>
    }
}
