mod filter;
mod grouping;
mod model;
mod series;

pub use filter::{filter_by_paid_date, FilterChange, Filters};
pub use grouping::{
    group_by_account, AccountGroup, AccountGroups, InvoiceEntry, NOT_PAID, UNKNOWN_ACCOUNT,
};
pub use model::{parse_paid_date, Account, Commission, CommissionSummary, Invoice, ViewMode};
pub use series::{
    month_name, normalize_monthly, normalize_weekly, select_series, weeks_in_month, SeriesPoint,
    YearlySeries, MAX_WEEKS, MONTHS_IN_YEAR,
};
