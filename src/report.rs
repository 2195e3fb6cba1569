use serde::Serialize;

use crate::commission::{AccountGroup, CommissionSummary, Filters, SeriesPoint};
use crate::page::{CommissionsPage, LoadState};

/// Snapshot of the page for rendering or JSON output
#[derive(Debug, Serialize)]
pub struct ReportView<'a> {
    pub user_id: i64,
    pub state: LoadState,
    pub filters: &'a Filters,
    pub year_range: &'a [i32],
    pub summary: &'a CommissionSummary,
    pub breakdown: Vec<SeriesPoint>,
    pub accounts: Vec<&'a AccountGroup>,
}

impl<'a> ReportView<'a> {
    pub fn from_page(page: &'a CommissionsPage) -> Self {
        let data = page.data();
        Self {
            user_id: page.user_id(),
            state: page.state(),
            filters: page.filters(),
            year_range: &data.year_range,
            summary: &data.summary,
            breakdown: page.chart(),
            accounts: data.accounts.values().collect(),
        }
    }
}

/// Format an amount with thousands separators and two decimals, e.g. `$1,234.50`
pub fn format_money(value: f64, currency_symbol: &str) -> String {
    let cents = (value * 100.0).round() as i64;
    let sign = if cents < 0 { "-" } else { "" };
    let cents = cents.unsigned_abs();
    format!(
        "{}{}{}.{:02}",
        sign,
        currency_symbol,
        format_grouped_int(cents / 100),
        cents % 100
    )
}

fn format_grouped_int(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, ch) in digits.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }

    out.chars().rev().collect()
}
