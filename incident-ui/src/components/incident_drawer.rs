use crate::bridge::use_controller;
use chrono::Local;
use leptos::*;
use soc_core::model::{AiAnalysis, ClosureReport, DeepInvestigation, HistoryEntry, Mitre};
use soc_core::view::{
    closure_report, confidence_label, format_timestamp, investigation_notes, or_na, severity_class,
    stage_class, RESOLVE_NOTES,
};
use soc_core::{Incident, Stage};
use wasm_bindgen_futures::spawn_local;

#[component]
pub fn IncidentDrawer(
    #[prop(into)] incident: Signal<Option<Incident>>,
    on_close: Callback<()>,
) -> impl IntoView {
    let ctl = use_controller();
    let note = create_rw_signal(String::new());
    let updating = create_rw_signal(false);
    let selected_id = create_memo(move |_| incident.with(|i| i.as_ref().map(|i| i.id.clone())));

    // A different incident starts with a clean note and enabled buttons.
    create_effect(move |_| {
        selected_id.with(|_| ());
        note.set(String::new());
        updating.set(false);
    });

    let transition = move |stage: Stage, notes: String| {
        let Some(id) = selected_id.get_untracked() else {
            return;
        };
        updating.set(true);
        let ctl = ctl.get_value();
        spawn_local(async move {
            ctl.update_stage(&id, stage, Some(notes)).await;
            if selected_id.try_get_untracked().flatten().as_deref() == Some(id.as_str()) {
                on_close.call(());
            }
        });
    };

    view! {
      <div
        class="backdrop"
        class:visible=move || incident.with(Option::is_some)
        on:click=move |_| on_close.call(())
      ></div>
      <aside class="drawer" class:open=move || incident.with(Option::is_some)>
        {move || incident.get().map(|inc| {
            let can_investigate = inc.stage.can_investigate();
            let can_resolve = inc.stage.can_resolve();
            view! {
              <DrawerHeader incident=inc.clone() on_close=on_close/>
              <div class="drawer-body">
                <MetadataGrid incident=inc.clone()/>
                {inc.mitre.clone().map(|mitre| view! { <MitreSection mitre=mitre/> })}
                {inc.ai_analysis.clone().map(|analysis| view! { <AiSection analysis=analysis/> })}
                {inc.deep_investigation.clone().map(|deep| view! { <DeepSection deep=deep/> })}
                {closure_report(&inc).cloned().map(|report| view! { <ClosureSection report=report/> })}
                {(!inc.history.is_empty()).then(|| view! { <AuditTrail history=inc.history.clone()/> })}
              </div>
              <footer class="drawer-footer">
                {can_investigate.then(|| view! {
                  <label class="meta">"Analyst Notes Before Investigation"</label>
                  <textarea
                    placeholder="Document initial findings, suspicious behavior, or rationale for investigating..."
                    prop:value=move || note.get()
                    on:input=move |ev| note.set(event_target_value(&ev))
                  ></textarea>
                })}
                <div class="row">
                  {can_investigate.then(|| view! {
                    <button
                      class="btn investigate"
                      disabled=move || updating.get()
                      on:click=move |_| {
                          transition(Stage::Investigating, investigation_notes(&note.get_untracked()))
                      }
                    >
                      {move || if updating.get() { "Initiating Deep Scan..." } else { "Start Deep Investigation" }}
                    </button>
                  })}
                  {can_resolve.then(|| view! {
                    <button
                      class="btn resolve"
                      disabled=move || updating.get()
                      on:click=move |_| transition(Stage::Resolved, RESOLVE_NOTES.to_string())
                    >
                      "Mark as Resolved"
                    </button>
                  })}
                  {(inc.stage == Stage::Resolved).then(|| view! {
                    <span class="stage resolved">"✓ Incident Resolved"</span>
                  })}
                </div>
              </footer>
            }
        })}
      </aside>
    }
}

#[component]
fn DrawerHeader(incident: Incident, on_close: Callback<()>) -> impl IntoView {
    view! {
      <header class="drawer-header">
        <div>
          <h2 title=incident.threat_type.clone()>{incident.threat_type.clone()}</h2>
          <div class="row">
            <span class=severity_class(&incident.severity)>{incident.severity.to_string()}</span>
            <span class=stage_class(&incident.stage)>{incident.stage.to_string()}</span>
          </div>
          <div class="meta">
            <span>{format!("ID: {}", incident.id)}</span>
            " | "
            <span>{format_timestamp(&incident.timestamp, &Local)}</span>
          </div>
        </div>
        <button class="close" on:click=move |_| on_close.call(())>"×"</button>
      </header>
    }
}

#[component]
fn MetadataGrid(incident: Incident) -> impl IntoView {
    let is_escalation = incident.is_escalation();
    view! {
      <div class="grid" class:escalation=is_escalation>
        <div class="cell">
          <span class="meta">"Source IP"</span>
          <div class="mono">{incident.source_ip.clone().unwrap_or_else(|| "N/A".into())}</div>
        </div>
        <div class="cell">
          <span class="meta">"User"</span>
          <div>{incident.user.clone().unwrap_or_else(|| "Unknown".into())}</div>
        </div>
        <div class="cell">
          <span class="meta">"Risk Score"</span>
          <div>{format!("{}/100", incident.risk_score)}</div>
        </div>
        <div class="cell">
          <span class="meta">"Occurrences"</span>
          <div>
            {incident.occurrence_count}
            {incident.repeat_offender.then(|| view! { <span class="tag repeat">"Repeat"</span> })}
            {is_escalation.then(|| view! { <span class="tag escalation">"Escalation"</span> })}
          </div>
        </div>
      </div>
    }
}

#[component]
fn MitreSection(mitre: Mitre) -> impl IntoView {
    view! {
      <section class="section mitre">
        <h3>"MITRE ATT&CK Context"</h3>
        <dl>
          <dt>"Tactic"</dt>
          <dd>{or_na(mitre.tactic.as_deref()).to_string()}</dd>
          <dt>"Technique"</dt>
          <dd>{or_na(mitre.technique.as_deref()).to_string()}</dd>
          <dt>"Confidence Level"</dt>
          <dd>{confidence_label(&mitre)}</dd>
        </dl>
      </section>
    }
}

#[component]
fn AiSection(analysis: AiAnalysis) -> impl IntoView {
    let summary = analysis
        .summary
        .clone()
        .unwrap_or_else(|| "Analysis summary currently unavailable.".into());
    let impact = analysis
        .impact
        .clone()
        .unwrap_or_else(|| "Impact analysis currently unavailable.".into());
    view! {
      <section class="section ai">
        <h3>"AI Analyst Insights"</h3>
        <h4>"Executive Summary"</h4>
        <p>{summary}</p>
        <h4>"Potential Impact"</h4>
        <p>{impact}</p>
        {(!analysis.remediation.is_empty()).then(|| view! {
          <h4>"Remediation Guide"</h4>
          <ol>
            {analysis.remediation.iter().map(|step| view! { <li>{step.clone()}</li> }).collect_view()}
          </ol>
        })}
      </section>
    }
}

#[component]
fn DeepSection(deep: DeepInvestigation) -> impl IntoView {
    view! {
      <section class="section deep">
        <h3>"Deep Investigation Findings"</h3>
        <h4>"Attack Path Analysis"</h4>
        <p>{or_na(deep.attack_path_analysis.as_deref()).to_string()}</p>
        <h4>"Containment Strategy"</h4>
        <p>{or_na(deep.containment_strategy.as_deref()).to_string()}</p>
        <h4>"Risk If Ignored"</h4>
        <p>{or_na(deep.risk_if_ignored.as_deref()).to_string()}</p>
      </section>
    }
}

#[component]
fn ClosureSection(report: ClosureReport) -> impl IntoView {
    let generated = report
        .generated_at
        .as_deref()
        .map(|raw| format_timestamp(raw, &Local))
        .unwrap_or_else(|| "N/A".into());
    view! {
      <section class="section closure">
        <h3>"Incident Closure Report"</h3>
        <h4>"Executive Summary"</h4>
        <p>{or_na(report.executive_summary.as_deref()).to_string()}</p>
        <h4>"Response Actions Taken"</h4>
        <p>{or_na(report.response_actions_taken.as_deref()).to_string()}</p>
        <h4>"Residual Risk"</h4>
        <p>{or_na(report.residual_risk.as_deref()).to_string()}</p>
        <h4>"Lessons Learned"</h4>
        <p>{or_na(report.lessons_learned.as_deref()).to_string()}</p>
        <p class="meta">{format!("Generated at: {generated}")}</p>
      </section>
    }
}

#[component]
fn AuditTrail(history: Vec<HistoryEntry>) -> impl IntoView {
    view! {
      <section class="section history">
        <h3>"Lifecycle Audit Trail"</h3>
        <ul class="timeline">
          {history
              .into_iter()
              .map(|entry| view! {
                <li>
                  <span class=stage_class(&entry.stage)>{entry.stage.to_string()}</span>
                  <span class="meta">{format_timestamp(&entry.timestamp, &Local)}</span>
                  {entry.notes.filter(|n| !n.is_empty()).map(|n| view! { <p>{n}</p> })}
                </li>
              })
              .collect_view()}
        </ul>
      </section>
    }
}
