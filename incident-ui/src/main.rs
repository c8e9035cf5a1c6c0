mod app;
mod bridge;
mod logging;

pub mod components {
    pub mod analytics;
    pub mod incident_drawer;
    pub mod incident_table;
    pub mod metrics_panel;
    pub mod nav;
    pub mod trigger_panel;
}

use app::App;
use leptos::*;

fn main() {
    logging::init();
    mount_to_body(|| view! { <App/> });
}
