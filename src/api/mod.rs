mod client;
mod service;

pub use client::ApiClient;
pub use service::{CommissionSource, HttpCommissionService};
