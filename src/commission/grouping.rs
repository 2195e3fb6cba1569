use indexmap::IndexMap;
use serde::Serialize;

use super::Commission;

pub const UNKNOWN_ACCOUNT: &str = "Unknown Account";
pub const NOT_PAID: &str = "Not Paid";

/// A paid invoice as displayed under its account
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceEntry {
    pub invoice_id: String,
    pub final_total: String,
    pub commission_amount: String,
    pub date_paid: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountGroup {
    pub account_name: String,
    pub account_id: i64,
    pub invoices: Vec<InvoiceEntry>,
}

/// Groups keyed by account id, in first-seen order
pub type AccountGroups = IndexMap<i64, AccountGroup>;

/// Group commissions by their invoice's account.
///
/// Every account seen gets a group; only paid invoices are listed in it.
/// Commissions without an invoice or account are skipped.
pub fn group_by_account<'a, I>(commissions: I) -> AccountGroups
where
    I: IntoIterator<Item = &'a Commission>,
{
    let mut groups = AccountGroups::new();

    for com in commissions {
        let (Some(invoice), Some((account_id, account))) = (com.invoice.as_ref(), com.account())
        else {
            log::debug!("Skipping commission {} without account", com.commission_id);
            continue;
        };

        let group = groups.entry(account_id).or_insert_with(|| AccountGroup {
            account_name: account
                .business_name
                .clone()
                .unwrap_or_else(|| UNKNOWN_ACCOUNT.to_string()),
            account_id,
            invoices: Vec::new(),
        });

        if !invoice.is_paid() {
            continue;
        }

        group.invoices.push(InvoiceEntry {
            invoice_id: invoice
                .invoice_id
                .map(|id| id.to_string())
                .unwrap_or_else(|| "N/A".to_string()),
            final_total: format_amount(invoice.final_total),
            commission_amount: format_amount(com.commission_amount),
            date_paid: com
                .paid_date()
                .map(|d| d.format("%B %-d, %Y").to_string())
                .unwrap_or_else(|| NOT_PAID.to_string()),
        });
    }

    groups
}

fn format_amount(value: Option<f64>) -> String {
    format!("{:.2}", value.unwrap_or(0.0))
}
