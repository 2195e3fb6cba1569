use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use super::{Commission, ViewMode};
use crate::error::{CommissionsError, Result};

/// Dashboard filter selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Filters {
    pub view_mode: ViewMode,
    pub selected_year: i32,
    /// 1-based
    pub selected_month: u32,
    pub from_year: i32,
    pub to_year: i32,
}

/// A single edit to the filter selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterChange {
    ViewMode(ViewMode),
    Year(i32),
    Month(u32),
    FromYear(i32),
    ToYear(i32),
}

impl Filters {
    /// Current year and month, with a five-year window ending this year
    pub fn for_date(today: NaiveDate, view_mode: ViewMode) -> Self {
        Self {
            view_mode,
            selected_year: today.year(),
            selected_month: today.month(),
            from_year: today.year() - 4,
            to_year: today.year(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !(1..=12).contains(&self.selected_month) {
            return Err(CommissionsError::InvalidMonth(self.selected_month));
        }
        if self.from_year > self.to_year {
            return Err(CommissionsError::InvalidYearRange {
                from: self.from_year,
                to: self.to_year,
            });
        }
        Ok(())
    }

    pub fn apply(self, change: FilterChange) -> Self {
        match change {
            FilterChange::ViewMode(view_mode) => Self { view_mode, ..self },
            FilterChange::Year(selected_year) => Self {
                selected_year,
                ..self
            },
            FilterChange::Month(selected_month) => Self {
                selected_month,
                ..self
            },
            FilterChange::FromYear(from_year) => Self { from_year, ..self },
            FilterChange::ToYear(to_year) => Self { to_year, ..self },
        }
    }

    /// Whether a paid date falls inside the active window
    pub fn matches(&self, paid: NaiveDate) -> bool {
        match self.view_mode {
            ViewMode::Yearly => (self.from_year..=self.to_year).contains(&paid.year()),
            ViewMode::Monthly => paid.year() == self.selected_year,
            ViewMode::Weekly => {
                paid.year() == self.selected_year && paid.month() == self.selected_month
            }
        }
    }
}

/// Commissions paid inside the active window, in input order.
/// Records without a usable paid date never match.
pub fn filter_by_paid_date<'a>(
    commissions: &'a [Commission],
    filters: &Filters,
) -> impl Iterator<Item = &'a Commission> + 'a {
    let filters = *filters;
    commissions
        .iter()
        .filter(move |com| com.paid_date().is_some_and(|paid| filters.matches(paid)))
}
