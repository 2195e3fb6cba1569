use serde::Deserialize;
use std::collections::BTreeMap;

use super::ApiClient;
use crate::commission::{
    normalize_monthly, normalize_weekly, Commission, YearlySeries, MONTHS_IN_YEAR,
};
use crate::config::ApiSettings;
use crate::error::Result;

/// Where the dashboard gets its data from. One method per endpoint.
pub trait CommissionSource {
    fn all_years(&self, user_id: i64) -> Result<Vec<i32>>;
    fn commissions(&self, user_id: i64) -> Result<Vec<Commission>>;
    fn current_month_total(&self, user_id: i64) -> Result<f64>;
    fn current_year_total(&self, user_id: i64) -> Result<f64>;
    fn last_year_total(&self, user_id: i64) -> Result<f64>;
    fn projected_total(&self, user_id: i64) -> Result<f64>;
    fn yearly(&self, user_id: i64, from_year: i32, to_year: i32) -> Result<YearlySeries>;
    /// Always twelve entries
    fn monthly(&self, user_id: i64, year: i32) -> Result<Vec<f64>>;
    /// One entry per week the month spans
    fn weekly(&self, user_id: i64, year: i32, month: u32) -> Result<Vec<f64>>;
}

#[derive(Debug, Deserialize)]
struct TotalResponse {
    #[serde(default)]
    total_commissions: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct ProjectedResponse {
    #[serde(default)]
    projected_commissions: Option<f64>,
}

/// REST-backed source.
///
/// Unless `strict`, a failed request is logged and replaced with its zero-valued default.
pub struct HttpCommissionService {
    client: ApiClient,
    strict: bool,
}

impl HttpCommissionService {
    pub fn new(client: ApiClient, strict: bool) -> Self {
        Self { client, strict }
    }

    pub fn from_settings(settings: &ApiSettings) -> Self {
        Self::new(ApiClient::from_settings(settings), settings.strict)
    }

    fn or_fallback<T>(
        &self,
        what: &str,
        result: Result<T>,
        fallback: impl FnOnce() -> T,
    ) -> Result<T> {
        match result {
            Ok(value) => Ok(value),
            Err(e) if !self.strict => {
                log::warn!("Error fetching {what}: {e}");
                Ok(fallback())
            }
            Err(e) => Err(e),
        }
    }

    fn rep_query(user_id: i64) -> Vec<(&'static str, String)> {
        vec![("sales_rep_id", user_id.to_string())]
    }

    fn total(&self, what: &str, path: &str, user_id: i64) -> Result<f64> {
        let result = self
            .client
            .get_json::<TotalResponse>(path, &Self::rep_query(user_id))
            .map(|r| r.total_commissions.unwrap_or(0.0));
        self.or_fallback(what, result, || 0.0)
    }
}

impl CommissionSource for HttpCommissionService {
    fn all_years(&self, user_id: i64) -> Result<Vec<i32>> {
        let result = self
            .client
            .get_json::<Vec<i32>>("/commissions/all_years", &Self::rep_query(user_id));
        self.or_fallback("commission years", result, Vec::new)
    }

    fn commissions(&self, user_id: i64) -> Result<Vec<Commission>> {
        // Decode per record so one malformed entry doesn't drop the rest
        let result = self
            .client
            .get_json::<Vec<serde_json::Value>>("/commissions", &Self::rep_query(user_id))
            .map(|records| {
                records
                    .into_iter()
                    .filter_map(|record| match serde_json::from_value::<Commission>(record) {
                        Ok(com) => Some(com),
                        Err(e) => {
                            log::debug!("Skipping malformed commission: {e}");
                            None
                        }
                    })
                    .collect::<Vec<_>>()
            });
        self.or_fallback("commissions", result, Vec::new)
    }

    fn current_month_total(&self, user_id: i64) -> Result<f64> {
        self.total(
            "current month commissions",
            "/commissions/current_month",
            user_id,
        )
    }

    fn current_year_total(&self, user_id: i64) -> Result<f64> {
        self.total(
            "current year commissions",
            "/commissions/current_year",
            user_id,
        )
    }

    fn last_year_total(&self, user_id: i64) -> Result<f64> {
        self.total("last year commissions", "/commissions/last_year", user_id)
    }

    fn projected_total(&self, user_id: i64) -> Result<f64> {
        let result = self
            .client
            .get_json::<ProjectedResponse>("/commissions/projected", &Self::rep_query(user_id))
            .map(|r| r.projected_commissions.unwrap_or(0.0));
        self.or_fallback("projected commissions", result, || 0.0)
    }

    fn yearly(&self, user_id: i64, from_year: i32, to_year: i32) -> Result<YearlySeries> {
        let mut query = Self::rep_query(user_id);
        query.push(("from_year", from_year.to_string()));
        query.push(("to_year", to_year.to_string()));

        let result = self
            .client
            .get_json::<BTreeMap<i32, Option<f64>>>("/commissions/yearly", &query)
            .map(|totals| {
                totals
                    .into_iter()
                    .map(|(year, total)| (year, total.unwrap_or(0.0)))
                    .collect::<YearlySeries>()
            });
        self.or_fallback("yearly commissions", result, YearlySeries::new)
    }

    fn monthly(&self, user_id: i64, year: i32) -> Result<Vec<f64>> {
        let path = format!("/commissions/monthly/{year}");
        let result = self
            .client
            .get_json::<Vec<Option<f64>>>(&path, &Self::rep_query(user_id))
            .map(|values| normalize_monthly(&values));
        self.or_fallback("monthly commissions", result, || vec![0.0; MONTHS_IN_YEAR])
    }

    fn weekly(&self, user_id: i64, year: i32, month: u32) -> Result<Vec<f64>> {
        let path = format!("/commissions/weekly/{year}/{month}");
        let result = self
            .client
            .get_json::<Vec<Option<f64>>>(&path, &Self::rep_query(user_id))
            .map(|values| normalize_weekly(&values, year, month));
        self.or_fallback("weekly commissions", result, || {
            normalize_weekly(&[], year, month)
        })
    }
}
