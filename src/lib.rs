pub mod api;
pub mod commission;
pub mod config;
pub mod error;
pub mod page;
pub mod report;

pub use api::{ApiClient, CommissionSource, HttpCommissionService};
pub use commission::{Commission, FilterChange, Filters, ViewMode};
pub use config::Config;
pub use error::{CommissionsError, Result};
pub use page::{CommissionsPage, LoadState, PageData};
pub use report::ReportView;
