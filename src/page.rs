use serde::Serialize;

use crate::api::CommissionSource;
use crate::commission::{
    filter_by_paid_date, group_by_account, select_series, AccountGroups, Commission,
    CommissionSummary, FilterChange, Filters, SeriesPoint, YearlySeries,
};
use crate::error::{CommissionsError, Result};

/// Most recent years shown on the yearly chart
pub const CHART_YEARS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadState {
    Idle,
    Loading,
    Loaded,
    Errored,
}

/// Everything one successful load produces
#[derive(Debug, Clone, Default, Serialize)]
pub struct PageData {
    pub year_range: Vec<i32>,
    pub summary: CommissionSummary,
    pub yearly: YearlySeries,
    pub monthly: Vec<f64>,
    pub weekly: Vec<f64>,
    /// Fetched commissions narrowed to the active window
    pub commissions: Vec<Commission>,
    pub accounts: AccountGroups,
}

/// The commissions dashboard for one sales rep
#[derive(Debug)]
pub struct CommissionsPage {
    user_id: i64,
    filters: Filters,
    state: LoadState,
    data: PageData,
}

impl CommissionsPage {
    pub fn new(user_id: i64, filters: Filters) -> Self {
        Self {
            user_id,
            filters,
            state: LoadState::Idle,
            data: PageData::default(),
        }
    }

    pub fn user_id(&self) -> i64 {
        self.user_id
    }

    pub fn filters(&self) -> &Filters {
        &self.filters
    }

    pub fn state(&self) -> LoadState {
        self.state
    }

    pub fn data(&self) -> &PageData {
        &self.data
    }

    /// Switch sales rep. Returns whether a reload is needed.
    pub fn set_user(&mut self, user_id: i64) -> bool {
        if user_id == self.user_id {
            return false;
        }
        self.user_id = user_id;
        true
    }

    /// Switch sales rep and reload when it changed
    pub fn switch_user<S: CommissionSource + ?Sized>(
        &mut self,
        user_id: i64,
        source: &S,
    ) -> Result<()> {
        if self.set_user(user_id) {
            self.load(source)?;
        }
        Ok(())
    }

    /// Apply a filter edit. Returns whether a reload is needed.
    pub fn apply(&mut self, change: FilterChange) -> bool {
        let next = self.filters.apply(change);
        if next == self.filters {
            return false;
        }
        self.filters = next;
        true
    }

    /// Apply a filter edit and reload when it changed anything
    pub fn update<S: CommissionSource + ?Sized>(
        &mut self,
        change: FilterChange,
        source: &S,
    ) -> Result<()> {
        if self.apply(change) {
            self.load(source)?;
        }
        Ok(())
    }

    /// Fetch everything, one request at a time.
    ///
    /// On failure the previous data is kept and the state becomes `Errored`.
    pub fn load<S: CommissionSource + ?Sized>(&mut self, source: &S) -> Result<()> {
        self.state = LoadState::Loading;
        log::info!("Fetching commissions for sales rep {}", self.user_id);

        match fetch_page(source, self.user_id, &self.filters) {
            Ok(data) => {
                log::info!(
                    "Loaded {} commissions across {} accounts",
                    data.commissions.len(),
                    data.accounts.len()
                );
                self.data = data;
                self.state = LoadState::Loaded;
                Ok(())
            }
            Err(e) => {
                log::error!("Error fetching commissions data: {e}");
                self.state = LoadState::Errored;
                Err(CommissionsError::LoadAborted(Box::new(e)))
            }
        }
    }

    /// Years labelling the yearly chart: the latest five known years inside the
    /// from/to window, or the window itself when none are known.
    pub fn chart_years(&self) -> Vec<i32> {
        let f = &self.filters;
        let mut years: Vec<i32> = self
            .data
            .year_range
            .iter()
            .copied()
            .filter(|y| (f.from_year..=f.to_year).contains(y))
            .collect();
        if years.is_empty() {
            years = (f.from_year..=f.to_year).collect();
        }
        let skip = years.len().saturating_sub(CHART_YEARS);
        years.split_off(skip)
    }

    /// The series for the active view mode
    pub fn chart(&self) -> Vec<SeriesPoint> {
        select_series(
            self.filters.view_mode,
            &self.chart_years(),
            &self.data.yearly,
            &self.data.monthly,
            &self.data.weekly,
        )
    }
}

fn fetch_page<S: CommissionSource + ?Sized>(
    source: &S,
    user_id: i64,
    filters: &Filters,
) -> Result<PageData> {
    let mut year_range = source.all_years(user_id)?;
    year_range.sort_unstable();
    year_range.dedup();
    if year_range.is_empty() {
        year_range.push(filters.selected_year);
    }

    let fetched = source.commissions(user_id)?;
    let summary = CommissionSummary {
        current_month: source.current_month_total(user_id)?,
        current_year: source.current_year_total(user_id)?,
        last_year: source.last_year_total(user_id)?,
        projected: source.projected_total(user_id)?,
    };
    let yearly = source.yearly(user_id, filters.from_year, filters.to_year)?;
    let monthly = source.monthly(user_id, filters.selected_year)?;
    let weekly = source.weekly(user_id, filters.selected_year, filters.selected_month)?;

    let commissions: Vec<Commission> = filter_by_paid_date(&fetched, filters).cloned().collect();
    log::debug!(
        "Kept {} of {} commissions for {:?}",
        commissions.len(),
        fetched.len(),
        filters
    );
    let accounts = group_by_account(&commissions);

    Ok(PageData {
        year_range,
        summary,
        yearly,
        monthly,
        weekly,
        commissions,
        accounts,
    })
}
