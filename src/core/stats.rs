//! Dashboard counters

use serde::Serialize;

use crate::entities::{EquipmentList, MaintenanceRequest};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DashboardStats {
    pub total_equipment: u64,
    pub active_equipment: usize,
    pub total_requests: usize,
    pub open_requests: usize,
    pub overdue_requests: usize,
}

impl DashboardStats {
    pub fn compute(equipment: &EquipmentList, requests: &[MaintenanceRequest]) -> Self {
        Self {
            total_equipment: equipment.total,
            active_equipment: equipment.active_count(),
            total_requests: requests.len(),
            open_requests: requests.iter().filter(|r| r.status.is_open()).count(),
            overdue_requests: requests.iter().filter(|r| r.is_overdue).count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compute() {
        let equipment: EquipmentList = serde_json::from_str(
            r#"{"items": [{"id": 1, "name": "A", "status": "ACTIVE"},
                          {"id": 2, "name": "B", "status": "SCRAPPED"},
                          {"id": 3, "name": "C"}],
                "total": 12}"#,
        )
        .unwrap();
        let requests: Vec<MaintenanceRequest> = serde_json::from_value(serde_json::json!([
            {"id": 1, "subject": "a", "equipment_id": 1, "request_type": "CORRECTIVE",
             "status": "NEW", "created_at": "2025-01-01T00:00:00", "is_overdue": true},
            {"id": 2, "subject": "b", "equipment_id": 1, "request_type": "PREVENTIVE",
             "status": "IN_PROGRESS", "created_at": "2025-01-01T00:00:00"},
            {"id": 3, "subject": "c", "equipment_id": 1, "request_type": "CORRECTIVE",
             "status": "REPAIRED", "created_at": "2025-01-01T00:00:00", "is_overdue": true},
            {"id": 4, "subject": "d", "equipment_id": 3, "request_type": "CORRECTIVE",
             "status": "ON_HOLD", "created_at": "2025-01-01T00:00:00"}
        ]))
        .unwrap();

        let stats = DashboardStats::compute(&equipment, &requests);
        assert_eq!(
            stats,
            DashboardStats {
                total_equipment: 12,
                active_equipment: 2,
                total_requests: 4,
                open_requests: 2,
                overdue_requests: 2,
            }
        );
    }
}
