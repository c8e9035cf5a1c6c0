use crate::bridge::use_controller;
use leptos::*;
use soc_core::{Toast, ToastKind};
use std::time::Duration;
use wasm_bindgen_futures::spawn_local;

#[component]
pub fn TriggerPanel(
    #[prop(into)] is_triggering: Signal<bool>,
    #[prop(into)] toast: Signal<Option<Toast>>,
    toast_ttl: Duration,
) -> impl IntoView {
    let ctl = use_controller();

    let run = move |_: ev::MouseEvent| {
        let ctl = ctl.get_value();
        spawn_local(async move {
            if let Some(id) = ctl.trigger_detection().await {
                set_timeout(move || ctl.dismiss_toast(id), toast_ttl);
            }
        });
    };

    view! {
      <section class="panel trigger">
        <h2>"Manual Detection Orchestrator"</h2>
        <p class="meta">
          "Manually execute the SOC analytic pipeline. This will force ingestion of recent logs, \
           perform AI heuristic evaluations, and orchestrate new incidents."
        </p>
        <button class="btn primary" disabled=move || is_triggering.get() on:click=run>
          {move || if is_triggering.get() { "Executing Pipeline..." } else { "Run SOAR Engine Now" }}
        </button>
        {move || toast.get().map(|t| {
            let class = match t.kind {
                ToastKind::Success => "toast success",
                ToastKind::Error => "toast error",
            };
            view! { <div class=class>{t.message}</div> }
        })}
      </section>
    }
}
