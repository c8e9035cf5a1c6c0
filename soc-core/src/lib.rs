//! Core of the SOC incident dashboard: the backend record model, the HTTP
//! client, the filter/sort engine and the polling controller. Nothing here
//! touches the DOM, so it builds and tests on the host as well as wasm32.

pub mod client;
pub mod config;
pub mod controller;
pub mod filter;
pub mod model;
pub mod view;

pub use client::{ApiClient, ApiError, IncidentApi};
pub use config::DashboardConfig;
pub use controller::{Controller, DashboardState, StateStore, Tab, Toast, ToastKind};
pub use model::{Incident, Metrics, Severity, Stage};
