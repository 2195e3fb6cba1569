mod common;

use std::cell::{Cell, RefCell};

use commissions::commission::{weeks_in_month, Commission, FilterChange, Filters, YearlySeries};
use commissions::{CommissionSource, CommissionsError, CommissionsPage, LoadState, Result, ViewMode};

use common::sample_commissions;

/// In-memory source that records the order of calls and can fail on one of them
struct FakeSource {
    commissions: Vec<Commission>,
    years: Vec<i32>,
    fail_on: Cell<Option<&'static str>>,
    calls: RefCell<Vec<&'static str>>,
}

impl FakeSource {
    fn new() -> Self {
        Self {
            commissions: sample_commissions(),
            years: vec![2024, 2021, 2023, 2022, 2020, 2019, 2024],
            fail_on: Cell::new(None),
            calls: RefCell::new(Vec::new()),
        }
    }

    fn call(&self, name: &'static str) -> Result<()> {
        self.calls.borrow_mut().push(name);
        if self.fail_on.get() == Some(name) {
            return Err(CommissionsError::Io(std::io::Error::new(
                std::io::ErrorKind::ConnectionReset,
                "tunnel dropped",
            )));
        }
        Ok(())
    }
}

impl CommissionSource for FakeSource {
    fn all_years(&self, _user_id: i64) -> Result<Vec<i32>> {
        self.call("all_years")?;
        Ok(self.years.clone())
    }

    fn commissions(&self, _user_id: i64) -> Result<Vec<Commission>> {
        self.call("commissions")?;
        Ok(self.commissions.clone())
    }

    fn current_month_total(&self, _user_id: i64) -> Result<f64> {
        self.call("current_month")?;
        Ok(120.5)
    }

    fn current_year_total(&self, _user_id: i64) -> Result<f64> {
        self.call("current_year")?;
        Ok(1500.0)
    }

    fn last_year_total(&self, _user_id: i64) -> Result<f64> {
        self.call("last_year")?;
        Ok(900.0)
    }

    fn projected_total(&self, _user_id: i64) -> Result<f64> {
        self.call("projected")?;
        Ok(4200.25)
    }

    fn yearly(&self, _user_id: i64, _from_year: i32, _to_year: i32) -> Result<YearlySeries> {
        self.call("yearly")?;
        Ok([(2023, 5.0), (2024, 45.5)].into_iter().collect())
    }

    fn monthly(&self, _user_id: i64, _year: i32) -> Result<Vec<f64>> {
        self.call("monthly")?;
        Ok(vec![1.0; 12])
    }

    fn weekly(&self, _user_id: i64, year: i32, month: u32) -> Result<Vec<f64>> {
        self.call("weekly")?;
        Ok(vec![2.0; weeks_in_month(year, month)])
    }
}

fn filters() -> Filters {
    Filters {
        view_mode: ViewMode::Yearly,
        selected_year: 2024,
        selected_month: 3,
        from_year: 2020,
        to_year: 2024,
    }
}

#[test]
fn test_new_page_is_idle() {
    let page = CommissionsPage::new(7, filters());
    assert_eq!(page.state(), LoadState::Idle);
    assert!(page.data().commissions.is_empty());
}

#[test]
fn test_load_fetches_sequentially_in_order() {
    let source = FakeSource::new();
    let mut page = CommissionsPage::new(7, filters());

    page.load(&source).unwrap();

    assert_eq!(page.state(), LoadState::Loaded);
    assert_eq!(
        *source.calls.borrow(),
        vec![
            "all_years",
            "commissions",
            "current_month",
            "current_year",
            "last_year",
            "projected",
            "yearly",
            "monthly",
            "weekly",
        ]
    );
}

#[test]
fn test_load_populates_page_data() {
    let source = FakeSource::new();
    let mut page = CommissionsPage::new(7, filters());
    page.load(&source).unwrap();

    let data = page.data();
    assert_eq!(data.year_range, vec![2019, 2020, 2021, 2022, 2023, 2024]);
    assert_eq!(data.summary.current_month, 120.5);
    assert_eq!(data.summary.projected, 4200.25);
    assert_eq!(data.monthly.len(), 12);
    assert_eq!(data.weekly.len(), 5);

    let kept: Vec<i64> = data.commissions.iter().map(|c| c.commission_id).collect();
    assert_eq!(kept, vec![1, 2, 3, 5, 6]);
    let accounts: Vec<i64> = data.accounts.keys().copied().collect();
    assert_eq!(accounts, vec![1, 2, 4]);
}

#[test]
fn test_empty_year_range_falls_back_to_selected_year() {
    let mut source = FakeSource::new();
    source.years.clear();
    let mut page = CommissionsPage::new(7, filters());
    page.load(&source).unwrap();

    assert_eq!(page.data().year_range, vec![2024]);
}

#[test]
fn test_chart_years_are_latest_five_in_window() {
    let source = FakeSource::new();
    let mut page = CommissionsPage::new(7, filters());
    page.load(&source).unwrap();

    assert_eq!(page.chart_years(), vec![2020, 2021, 2022, 2023, 2024]);

    let chart = page.chart();
    assert_eq!(chart.len(), 5);
    assert_eq!(chart[3].label, "2023");
    assert_eq!(chart[3].amount, 5.0);
    assert_eq!(chart[0].amount, 0.0);
}

#[test]
fn test_chart_follows_view_mode() {
    let source = FakeSource::new();
    let mut page = CommissionsPage::new(7, filters());
    page.load(&source).unwrap();

    page.update(FilterChange::ViewMode(ViewMode::Weekly), &source)
        .unwrap();
    let chart = page.chart();
    assert_eq!(chart.len(), 5);
    assert_eq!(chart[0].label, "Week 1");

    page.update(FilterChange::ViewMode(ViewMode::Monthly), &source)
        .unwrap();
    assert_eq!(page.chart().len(), 12);
}

#[test]
fn test_failed_fetch_keeps_previous_data() {
    let source = FakeSource::new();
    let mut page = CommissionsPage::new(7, filters());
    page.load(&source).unwrap();
    let before: Vec<i64> = page
        .data()
        .commissions
        .iter()
        .map(|c| c.commission_id)
        .collect();

    source.fail_on.set(Some("monthly"));
    source.calls.borrow_mut().clear();
    let err = page
        .update(FilterChange::ViewMode(ViewMode::Weekly), &source)
        .unwrap_err();

    assert!(matches!(err, CommissionsError::LoadAborted(_)));
    assert!(err.to_string().contains("tunnel dropped"));
    assert_eq!(page.state(), LoadState::Errored);
    // Later fetches in the chain never ran
    assert_eq!(source.calls.borrow().last(), Some(&"monthly"));

    let after: Vec<i64> = page
        .data()
        .commissions
        .iter()
        .map(|c| c.commission_id)
        .collect();
    assert_eq!(before, after);
    assert_eq!(page.filters().view_mode, ViewMode::Weekly);
}

#[test]
fn test_first_load_failure_leaves_empty_page() {
    let source = FakeSource::new();
    source.fail_on.set(Some("all_years"));
    let mut page = CommissionsPage::new(7, filters());

    assert!(page.load(&source).is_err());
    assert_eq!(page.state(), LoadState::Errored);
    assert!(page.data().accounts.is_empty());
    assert_eq!(*source.calls.borrow(), vec!["all_years"]);
}

#[test]
fn test_unchanged_filter_does_not_reload() {
    let source = FakeSource::new();
    let mut page = CommissionsPage::new(7, filters());
    page.load(&source).unwrap();
    source.calls.borrow_mut().clear();

    page.update(FilterChange::Year(2024), &source).unwrap();
    assert!(source.calls.borrow().is_empty());

    page.update(FilterChange::Year(2023), &source).unwrap();
    assert_eq!(source.calls.borrow().len(), 9);
    assert_eq!(page.filters().selected_year, 2023);
}

#[test]
fn test_set_user_requests_reload_only_on_change() {
    let mut page = CommissionsPage::new(7, filters());
    assert!(!page.set_user(7));
    assert!(page.set_user(8));
    assert_eq!(page.user_id(), 8);
}

#[test]
fn test_switch_user_reloads_only_on_change() {
    let source = FakeSource::new();
    let mut page = CommissionsPage::new(7, filters());
    page.load(&source).unwrap();
    source.calls.borrow_mut().clear();

    page.switch_user(7, &source).unwrap();
    assert!(source.calls.borrow().is_empty());

    page.switch_user(8, &source).unwrap();
    assert_eq!(page.user_id(), 8);
    assert_eq!(page.state(), LoadState::Loaded);
    assert_eq!(source.calls.borrow().len(), 9);
    assert_eq!(source.calls.borrow()[0], "all_years");
}

#[test]
fn test_switch_user_failure_keeps_new_user_and_old_data() {
    let source = FakeSource::new();
    let mut page = CommissionsPage::new(7, filters());
    page.load(&source).unwrap();
    let before = page.data().commissions.len();

    source.fail_on.set(Some("projected"));
    let err = page.switch_user(9, &source).unwrap_err();
    assert!(matches!(err, CommissionsError::LoadAborted(_)));
    assert_eq!(page.user_id(), 9);
    assert_eq!(page.state(), LoadState::Errored);
    assert_eq!(page.data().commissions.len(), before);
}

#[test]
fn test_narrowing_window_regroups_accounts() {
    let source = FakeSource::new();
    let mut page = CommissionsPage::new(7, filters());
    page.load(&source).unwrap();

    page.update(FilterChange::FromYear(2024), &source).unwrap();
    let accounts: Vec<i64> = page.data().accounts.keys().copied().collect();
    assert_eq!(accounts, vec![1, 4]);
    assert!(page
        .data()
        .accounts
        .values()
        .flat_map(|g| &g.invoices)
        .all(|i| i.invoice_id != "8"));
}
