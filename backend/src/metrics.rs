//! Derivation of the four standard sustainability ratios from raw metrics.
//!
//! Every function here is pure and total: no I/O, no rounding, and a zero or
//! negative denominator yields `0.0` rather than an error or `NaN`/`Infinity`.
//! Rounding and percentage formatting are presentation concerns and happen in
//! the clients, never here. Ratios are fractions, not percentages: a company
//! with 4 female employees out of 10 has a diversity ratio of `0.4`.
//!
//! Values are deliberately not clamped. A submission claiming more renewable
//! than total electricity produces a ratio above 1 and is stored as-is.

use common::model::metrics::RawMetrics;

/// The four ratios recomputed on every write of a response record.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DerivedMetrics {
    pub carbon_intensity: f64,
    pub renewable_ratio: f64,
    pub diversity_ratio: f64,
    pub community_spend_ratio: f64,
}

/// Tonnes of CO2 emitted per unit of revenue.
pub fn carbon_intensity(carbon_emissions: f64, total_revenue: f64) -> f64 {
    safe_ratio(carbon_emissions, total_revenue)
}

/// Fraction of electricity consumption covered by renewable sources.
pub fn renewable_ratio(renewable_electricity: f64, total_electricity: f64) -> f64 {
    safe_ratio(renewable_electricity, total_electricity)
}

/// Fraction of the workforce that is female.
pub fn diversity_ratio(female_employees: f64, total_employees: f64) -> f64 {
    safe_ratio(female_employees, total_employees)
}

/// Fraction of revenue invested into the community.
pub fn community_spend_ratio(community_investment: f64, total_revenue: f64) -> f64 {
    safe_ratio(community_investment, total_revenue)
}

/// Computes all four ratios from a merged raw metric set.
pub fn derive(raw: &RawMetrics) -> DerivedMetrics {
    DerivedMetrics {
        carbon_intensity: carbon_intensity(raw.carbon_emissions, raw.total_revenue),
        renewable_ratio: renewable_ratio(raw.renewable_electricity, raw.total_electricity),
        diversity_ratio: diversity_ratio(raw.female_employees, raw.total_employees),
        community_spend_ratio: community_spend_ratio(raw.community_investment, raw.total_revenue),
    }
}

fn safe_ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 && denominator.is_finite() {
        numerator / denominator
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ratios_match_reference_scenario() {
        // upsert(u1, 2023, {totalRevenue: 1000, carbonEmissions: 50,
        //   totalElectricity: 200, renewableElectricity: 50,
        //   totalEmployees: 10, femaleEmployees: 4, communityInvestment: 20})
        assert_eq!(carbon_intensity(50.0, 1000.0), 0.05);
        assert_eq!(renewable_ratio(50.0, 200.0), 0.25);
        assert_eq!(diversity_ratio(4.0, 10.0), 0.4);
        assert_eq!(community_spend_ratio(20.0, 1000.0), 0.02);
    }

    #[test]
    fn zero_denominator_yields_zero_not_an_error() {
        assert_eq!(carbon_intensity(50.0, 0.0), 0.0);
        assert_eq!(renewable_ratio(50.0, 0.0), 0.0);
        assert_eq!(diversity_ratio(4.0, 0.0), 0.0);
        assert_eq!(community_spend_ratio(20.0, 0.0), 0.0);
    }

    #[test]
    fn negative_denominator_yields_zero() {
        assert_eq!(carbon_intensity(50.0, -1000.0), 0.0);
        assert_eq!(diversity_ratio(4.0, -10.0), 0.0);
    }

    #[test]
    fn results_are_finite_and_non_negative_for_valid_inputs() {
        let cases = [
            (0.0, 0.0),
            (0.0, 1.0),
            (1.0, 1.0),
            (1e12, 0.001),
            (0.001, 1e12),
            (5.0, f64::INFINITY),
        ];
        for (num, den) in cases {
            let r = carbon_intensity(num, den);
            assert!(r.is_finite(), "({num}, {den}) produced {r}");
            assert!(r >= 0.0, "({num}, {den}) produced {r}");
        }
    }

    #[test]
    fn out_of_range_ratio_is_passed_through_unclamped() {
        assert_eq!(renewable_ratio(300.0, 200.0), 1.5);
    }

    #[test]
    fn derivation_is_deterministic() {
        let raw = RawMetrics {
            total_electricity: 200.0,
            renewable_electricity: 50.0,
            carbon_emissions: 50.0,
            total_employees: 10.0,
            female_employees: 4.0,
            community_investment: 20.0,
            total_revenue: 1000.0,
            ..RawMetrics::default()
        };
        assert_eq!(derive(&raw), derive(&raw));
    }

    #[test]
    fn derive_maps_each_ratio_to_its_fields() {
        let raw = RawMetrics {
            total_electricity: 200.0,
            renewable_electricity: 50.0,
            carbon_emissions: 50.0,
            total_employees: 10.0,
            female_employees: 4.0,
            community_investment: 20.0,
            total_revenue: 1000.0,
            ..RawMetrics::default()
        };
        let derived = derive(&raw);
        assert_eq!(derived.carbon_intensity, 0.05);
        assert_eq!(derived.renewable_ratio, 0.25);
        assert_eq!(derived.diversity_ratio, 0.4);
        assert_eq!(derived.community_spend_ratio, 0.02);
    }
}
