use leptos::*;
use soc_core::view::critical_banner;
use soc_core::Metrics;

#[component]
pub fn CriticalBanner(#[prop(into)] metrics: Signal<Metrics>) -> impl IntoView {
    move || {
        metrics.with(critical_banner).map(|text| {
            view! {
              <div class="banner critical">
                <h3>"CRITICAL ALERTS ACTIVE"</h3>
                <p>{text}</p>
              </div>
            }
        })
    }
}

#[component]
pub fn MetricsCards(#[prop(into)] metrics: Signal<Metrics>) -> impl IntoView {
    view! {
      <div class="cards">
        <div class="card">
          <p class="meta">"Total Incidents"</p>
          <p class="value">{move || metrics.with(|m| m.total_incidents)}</p>
        </div>
        <div class="card high">
          <p class="meta">"High Severity"</p>
          <p class="value">{move || metrics.with(|m| m.high_severity)}</p>
        </div>
        <div class="card critical">
          <p class="meta">"Critical Severity"</p>
          <p class="value">{move || metrics.with(|m| m.critical_severity)}</p>
        </div>
      </div>
    }
}
