//! Glue between the core controller and Leptos reactivity.

use leptos::*;
use soc_core::{ApiClient, Controller, DashboardState, StateStore};

/// Dashboard state held in a reactive signal so every view re-renders from
/// the same snapshot.
#[derive(Clone, Copy)]
pub struct SignalStore(pub RwSignal<DashboardState>);

impl StateStore for SignalStore {
    fn update<R>(&self, f: impl FnOnce(&mut DashboardState) -> R) -> Option<R> {
        self.0.try_update(f)
    }

    fn snapshot(&self) -> DashboardState {
        self.0.get_untracked()
    }
}

pub type DashboardController = Controller<ApiClient, SignalStore>;

pub fn provide_controller(controller: DashboardController) -> StoredValue<DashboardController> {
    let stored = store_value(controller);
    provide_context(stored);
    stored
}

pub fn use_controller() -> StoredValue<DashboardController> {
    expect_context::<StoredValue<DashboardController>>()
}
