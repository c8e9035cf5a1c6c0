use chrono::{DateTime, Local, Utc};
use leptos::*;
use soc_core::view::format_last_refresh;
use soc_core::Tab;

#[component]
pub fn Sidebar(#[prop(into)] active: Signal<Tab>, on_select: Callback<Tab>) -> impl IntoView {
    view! {
      <aside class="sidebar">
        <h2>"SOC Engine"</h2>
        <nav>
          {Tab::ALL
              .into_iter()
              .map(|tab| {
                  view! {
                    <button
                      class="tab"
                      class:active=move || active.get() == tab
                      on:click=move |_| on_select.call(tab)
                    >
                      {tab.label()}
                    </button>
                  }
              })
              .collect_view()}
        </nav>
      </aside>
    }
}

#[component]
pub fn TopNav(#[prop(into)] last_refresh: Signal<Option<DateTime<Utc>>>) -> impl IntoView {
    view! {
      <header class="topnav">
        <h1>"SOC Automation Command Center"</h1>
        <div class="row">
          <span class="live">"SYSTEM LIVE"</span>
          <span class="meta">
            "Last Refresh: "
            <b>{move || format_last_refresh(last_refresh.get(), &Local)}</b>
          </span>
        </div>
      </header>
    }
}
