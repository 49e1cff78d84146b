use serde::{Deserialize, Deserializer, Serialize};

use crate::model::metrics::MetricInputs;

/// Request payload for `POST /api/responses`.
///
/// Submits metric values for one financial year. The year selects the record
/// (create on first submission, partial update afterwards); every metric field
/// is optional, with absent fields defaulting on create and left unchanged on
/// update. Unknown keys are rejected, so identity fields (`id`, `userId`,
/// `createdAt`) and derived ratios cannot be supplied by the caller.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpsertResponseRequest {
    pub financial_year: i32,
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
    /// Tri-state: absent = leave unchanged, `null` = "not answered".
    #[serde(
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub data_privacy_policy: Option<Option<bool>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_revenue: Option<f64>,
}

fn double_option<'de, D>(deserializer: D) -> Result<Option<Option<bool>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<bool>::deserialize(deserializer).map(Some)
}

impl UpsertResponseRequest {
    /// The metric fields of the request, detached from the year.
    pub fn metrics(&self) -> MetricInputs {
        MetricInputs {
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
}

/// Query parameters for `GET /api/responses`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListResponsesQuery {
    /// Restrict the listing to a single financial year.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub financial_year: Option<i32>,
}

/// Request payload for `POST /api/responses/bulk_delete`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkDeleteRequest {
    pub ids: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upsert_request_parses_metric_fields() {
        let req: UpsertResponseRequest = serde_json::from_str(
            r#"{"financialYear": 2023, "totalRevenue": 1000, "carbonEmissions": 50}"#,
        )
        .unwrap();
        assert_eq!(req.financial_year, 2023);
        let metrics = req.metrics();
        assert_eq!(metrics.total_revenue, Some(1000.0));
        assert_eq!(metrics.carbon_emissions, Some(50.0));
        assert_eq!(metrics.total_fuel, None);
    }

    #[test]
    fn upsert_request_rejects_identity_fields() {
        for payload in [
            r#"{"financialYear": 2023, "id": "abc"}"#,
            r#"{"financialYear": 2023, "userId": "u1"}"#,
            r#"{"financialYear": 2023, "createdAt": "2024-01-01T00:00:00Z"}"#,
            r#"{"financialYear": 2023, "renewableRatio": 0.5}"#,
        ] {
            assert!(
                serde_json::from_str::<UpsertResponseRequest>(payload).is_err(),
                "payload should be rejected: {payload}"
            );
        }
    }

    #[test]
    fn upsert_request_keeps_privacy_tri_state() {
        let absent: UpsertResponseRequest =
            serde_json::from_str(r#"{"financialYear": 2023}"#).unwrap();
        assert_eq!(absent.metrics().data_privacy_policy, None);

        let null: UpsertResponseRequest =
            serde_json::from_str(r#"{"financialYear": 2023, "dataPrivacyPolicy": null}"#).unwrap();
        assert_eq!(null.metrics().data_privacy_policy, Some(None));

        let set: UpsertResponseRequest =
            serde_json::from_str(r#"{"financialYear": 2023, "dataPrivacyPolicy": false}"#).unwrap();
        assert_eq!(set.metrics().data_privacy_policy, Some(Some(false)));
    }
}
