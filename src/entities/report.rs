//! Aggregated request counts from `GET /api/reports`

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PreventiveVsCorrective {
    #[serde(default)]
    pub preventive: u64,
    #[serde(default)]
    pub corrective: u64,
    #[serde(default)]
    pub preventive_percentage: f64,
    #[serde(default)]
    pub corrective_percentage: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Report {
    #[serde(default)]
    pub requests_per_team: BTreeMap<String, u64>,
    /// Top 20 equipment by request count
    #[serde(default)]
    pub requests_per_equipment: BTreeMap<String, u64>,
    #[serde(default)]
    pub preventive_vs_corrective: PreventiveVsCorrective,
}

impl Report {
    /// Entries sorted by count, highest first; ties keep name order
    pub fn ranked(counts: &BTreeMap<String, u64>) -> Vec<(&str, u64)> {
        let mut entries: Vec<(&str, u64)> = counts.iter().map(|(k, v)| (k.as_str(), *v)).collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1));
        entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_deserializes_and_ranks() {
        let json = r#"{
            "requests_per_team": {"Mechanics": 4, "Electricians": 9, "IT": 4},
            "requests_per_equipment": {},
            "preventive_vs_corrective": {"preventive": 3, "corrective": 1,
                                         "preventive_percentage": 75.0, "corrective_percentage": 25.0}
        }"#;
        let report: Report = serde_json::from_str(json).unwrap();
        let ranked = Report::ranked(&report.requests_per_team);
        assert_eq!(ranked[0], ("Electricians", 9));
        assert_eq!(ranked[1], ("IT", 4));
        assert_eq!(ranked[2], ("Mechanics", 4));
        assert_eq!(report.preventive_vs_corrective.preventive, 3);
    }
}
