use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::metrics::RawMetrics;

/// A single yearly ESG submission for one user, as persisted by the backend.
///
/// One non-deleted record exists per `(user_id, financial_year)` pair. The four
/// derived ratios are recomputed by the backend on every write from the raw
/// metric fields stored in the same record; clients never supply them. The
/// percentage-style ratios (`renewable_ratio`, `diversity_ratio`,
/// `community_spend_ratio`) are fractions in `[0, 1]` — presentation layers
/// multiply by 100 for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EsgResponse {
    /// Unique identifier for this record (UUID).
    pub id: String,
    /// The owning user. Records are never shared between users.
    pub user_id: String,
    /// Starting calendar year of the fiscal period (2023 means "2023-24").
    pub financial_year: i32,

    // Environmental metrics
    pub total_electricity: f64,
    pub renewable_electricity: f64,
    pub total_fuel: f64,
    pub carbon_emissions: f64,

    // Social metrics
    pub total_employees: f64,
    pub female_employees: f64,
    pub training_hours: f64,
    pub community_investment: f64,

    // Governance metrics
    /// Percentage of independent board members, 0-100.
    pub independent_board: f64,
    /// Whether a data privacy policy exists. `None` means "not answered".
    pub data_privacy_policy: Option<bool>,
    pub total_revenue: f64,

    // Derived metrics, recomputed on every write
    pub carbon_intensity: f64,
    pub renewable_ratio: f64,
    pub diversity_ratio: f64,
    pub community_spend_ratio: f64,

    // Lifecycle metadata
    pub is_deleted: bool,
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl EsgResponse {
    /// The raw metric fields of this record, detached from identity and
    /// lifecycle metadata. Partial updates merge over this.
    pub fn raw_metrics(&self) -> RawMetrics {
        RawMetrics {
            total_electricity: self.total_electricity,
            renewable_electricity: self.renewable_electricity,
            total_fuel: self.total_fuel,
            carbon_emissions: self.carbon_emissions,
            total_employees: self.total_employees,
            female_employees: self.female_employees,
            training_hours: self.training_hours,
            community_investment: self.community_investment,
            independent_board: self.independent_board,
            data_privacy_policy: self.data_privacy_policy,
            total_revenue: self.total_revenue,
        }
    }

    /// Display label for the fiscal period, e.g. 2023 -> "2023-24".
    ///
    /// Presentation only; the stored value is always the bare starting year.
    pub fn financial_year_label(&self) -> String {
        format!(
            "{}-{:02}",
            self.financial_year,
            (self.financial_year + 1) % 100
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response_for_year(financial_year: i32) -> EsgResponse {
        EsgResponse {
            id: "r1".to_string(),
            user_id: "u1".to_string(),
            financial_year,
            total_electricity: 0.0,
            renewable_electricity: 0.0,
            total_fuel: 0.0,
            carbon_emissions: 0.0,
            total_employees: 0.0,
            female_employees: 0.0,
            training_hours: 0.0,
            community_investment: 0.0,
            independent_board: 0.0,
            data_privacy_policy: None,
            total_revenue: 0.0,
            carbon_intensity: 0.0,
            renewable_ratio: 0.0,
            diversity_ratio: 0.0,
            community_spend_ratio: 0.0,
            is_deleted: false,
            deleted_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn financial_year_label_formats_following_year() {
        assert_eq!(response_for_year(2023).financial_year_label(), "2023-24");
        assert_eq!(response_for_year(1999).financial_year_label(), "1999-00");
        assert_eq!(response_for_year(2099).financial_year_label(), "2099-00");
    }

    #[test]
    fn serializes_with_camel_case_field_names() {
        let json = serde_json::to_value(response_for_year(2023)).unwrap();
        assert!(json.get("financialYear").is_some());
        assert!(json.get("carbonIntensity").is_some());
        assert!(json.get("dataPrivacyPolicy").is_some());
        assert!(json.get("isDeleted").is_some());
    }
}
