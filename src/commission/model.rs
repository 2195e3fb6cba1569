use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Aggregation granularity of the dashboard
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Yearly,
    Monthly,
    Weekly,
}

impl ViewMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ViewMode::Yearly => "yearly",
            ViewMode::Monthly => "monthly",
            ViewMode::Weekly => "weekly",
        }
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Account {
    #[serde(default)]
    pub account_id: Option<i64>,
    #[serde(default)]
    pub business_name: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Invoice {
    #[serde(default)]
    pub invoice_id: Option<i64>,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub final_total: Option<f64>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub paid: Option<bool>,
    #[serde(default)]
    pub date_paid: Option<String>,
    #[serde(default)]
    pub account: Option<Account>,
}

impl Invoice {
    /// Only an explicit `true` counts; `null` and missing are unpaid
    pub fn is_paid(&self) -> bool {
        self.paid == Some(true)
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Commission {
    pub commission_id: i64,
    #[serde(default)]
    pub sales_rep_id: Option<i64>,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub commission_amount: Option<f64>,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub commission_rate: Option<f64>,
    /// Raw wire value: a date, a datetime, `null`, or a placeholder like "N/A"
    #[serde(default)]
    pub date_paid: Option<String>,
    #[serde(default)]
    pub invoice: Option<Invoice>,
}

impl Commission {
    pub fn paid_date(&self) -> Option<NaiveDate> {
        self.date_paid.as_deref().and_then(parse_paid_date)
    }

    /// The invoice's account, when both are present and the account has an id
    pub fn account(&self) -> Option<(i64, &Account)> {
        let account = self.invoice.as_ref()?.account.as_ref()?;
        account.account_id.map(|id| (id, account))
    }
}

/// Parse the date part of a `date_paid` value. Anything that isn't a date is absent.
pub fn parse_paid_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    let date_part = raw.get(..10).unwrap_or(raw);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}

/// Accept amounts as JSON numbers or as decimal strings like "25.50".
/// A string that doesn't parse reads as absent.
fn lenient_amount<'de, D>(deserializer: D) -> std::result::Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Amount {
        Number(f64),
        Text(String),
    }

    Ok(match Option::<Amount>::deserialize(deserializer)? {
        Some(Amount::Number(n)) => Some(n),
        Some(Amount::Text(s)) => s.trim().parse().ok(),
        None => None,
    })
}

/// Headline totals shown above the chart
#[derive(Debug, Deserialize, Serialize, Clone, Copy, Default, PartialEq)]
pub struct CommissionSummary {
    pub current_month: f64,
    pub current_year: f64,
    pub last_year: f64,
    pub projected: f64,
}
