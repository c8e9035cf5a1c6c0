use leptos::*;
use soc_core::view::{severity_class, stage_class, Analytics};
use soc_core::Incident;

#[component]
pub fn AnalyticsPanel(#[prop(into)] incidents: Signal<Vec<Incident>>) -> impl IntoView {
    let analytics = create_memo(move |_| incidents.with(|list| Analytics::from_incidents(list)));

    move || {
        let analytics = analytics.get();
        if analytics.is_empty() {
            return view! {
              <div class="panel empty">
                <p>"Not enough data to generate analytics yet."</p>
              </div>
            }
            .into_view();
        }

        view! {
          <div class="analytics">
            <section class="panel">
              <h3>"Severity Distribution"</h3>
              {analytics
                  .by_severity
                  .iter()
                  .map(|(severity, count)| view! {
                    <div class="bar-row">
                      <span>{severity.to_string()}</span>
                      <span>{*count}</span>
                      <div class="bar">
                        <div
                          class=severity_class(severity)
                          style=format!("width: {:.0}%", analytics.percent(*count))
                        ></div>
                      </div>
                    </div>
                  })
                  .collect_view()}
            </section>

            <section class="panel">
              <h3>"Workflow Stages"</h3>
              <div class="columns">
                {analytics
                    .by_stage
                    .iter()
                    .map(|(stage, count)| view! {
                      <div class="column">
                        <div>{*count}</div>
                        <div class="column-track">
                          <div
                            class=stage_class(stage)
                            style=format!("height: {:.0}%", analytics.percent(*count))
                          ></div>
                        </div>
                        <div class="meta" title=stage.to_string()>{stage.to_string()}</div>
                      </div>
                    })
                    .collect_view()}
              </div>
            </section>

            <section class="panel">
              <h3>"Escalation Heat"</h3>
              <span class="value">{analytics.escalations}</span>
              <p class="meta">"Incidents tracking 3 or more recursive occurrences."</p>
            </section>
          </div>
        }
        .into_view()
    }
}
