//! Raw ESG metric values and the partial-input payload used to submit them.
//!
//! Two structs cover the write path:
//! - `RawMetrics` is the complete set of raw fields a record stores, with
//!   every numeric defaulting to 0 and the privacy flag to "not answered".
//! - `MetricInputs` is what a caller actually sends: every field optional,
//!   so a submission can touch a single metric and leave the rest of a
//!   previously saved year untouched.

use serde::{Deserialize, Deserializer, Serialize};

/// The full raw metric set stored on a response record.
///
/// This is the input to ratio derivation; derived fields are not part of it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawMetrics {
    pub total_electricity: f64,
    pub renewable_electricity: f64,
    pub total_fuel: f64,
    pub carbon_emissions: f64,
    pub total_employees: f64,
    pub female_employees: f64,
    pub training_hours: f64,
    pub community_investment: f64,
    pub independent_board: f64,
    pub data_privacy_policy: Option<bool>,
    pub total_revenue: f64,
}

/// Partial metric submission.
///
/// Absent fields keep their stored value on update and take the `RawMetrics`
/// default on creation. Unknown keys are rejected, which is what makes the
/// identity fields (`id`, `userId`, `financialYear`, `createdAt`) and the
/// derived ratios impossible to smuggle into a write.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct MetricInputs {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_electricity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub renewable_electricity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_fuel: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub carbon_emissions: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_employees: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub female_employees: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub training_hours: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub community_investment: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub independent_board: Option<f64>,
    /// Tri-state: absent = leave unchanged, `null` = set to "not answered",
    /// `true`/`false` = set the answer.
    #[serde(
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub data_privacy_policy: Option<Option<bool>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_revenue: Option<f64>,
}

/// Distinguishes an absent key (`None`) from an explicit JSON `null`
/// (`Some(None)`) during deserialization.
fn double_option<'de, D>(deserializer: D) -> Result<Option<Option<bool>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<bool>::deserialize(deserializer).map(Some)
}

impl MetricInputs {
    /// Overlays the supplied fields onto `raw`, leaving absent fields alone.
    pub fn apply_to(&self, raw: &mut RawMetrics) {
        if let Some(v) = self.total_electricity {
            raw.total_electricity = v;
        }
        if let Some(v) = self.renewable_electricity {
            raw.renewable_electricity = v;
        }
        if let Some(v) = self.total_fuel {
            raw.total_fuel = v;
        }
        if let Some(v) = self.carbon_emissions {
            raw.carbon_emissions = v;
        }
        if let Some(v) = self.total_employees {
            raw.total_employees = v;
        }
        if let Some(v) = self.female_employees {
            raw.female_employees = v;
        }
        if let Some(v) = self.training_hours {
            raw.training_hours = v;
        }
        if let Some(v) = self.community_investment {
            raw.community_investment = v;
        }
        if let Some(v) = self.independent_board {
            raw.independent_board = v;
        }
        if let Some(answer) = self.data_privacy_policy {
            raw.data_privacy_policy = answer;
        }
        if let Some(v) = self.total_revenue {
            raw.total_revenue = v;
        }
    }

    /// The supplied numeric fields with their wire names, for validation.
    pub fn numeric_fields(&self) -> [(&'static str, Option<f64>); 10] {
        [
            ("totalElectricity", self.total_electricity),
            ("renewableElectricity", self.renewable_electricity),
            ("totalFuel", self.total_fuel),
            ("carbonEmissions", self.carbon_emissions),
            ("totalEmployees", self.total_employees),
            ("femaleEmployees", self.female_employees),
            ("trainingHours", self.training_hours),
            ("communityInvestment", self.community_investment),
            ("independentBoard", self.independent_board),
            ("totalRevenue", self.total_revenue),
        ]
    }
}
