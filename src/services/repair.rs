use crate::api::{ApiClient, ApiResponse};
use crate::error::ClientResult;
use repairhub_shared::date::DateRange;
use repairhub_shared::protocol::{
    DeleteRepair, GetRepair, ListRepairs, RepairReminders, RepairStatsRequest, RepairsByDateRange,
    UpdateRepair,
};
use repairhub_shared::{Repair, RepairPatch, RepairStats, ServiceReminder};

#[derive(Clone)]
pub struct RepairService {
    api: ApiClient,
}

impl RepairService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn list(&self) -> ApiResponse<Vec<Repair>> {
        self.api.fetch(&ListRepairs).await
    }

    pub async fn get(&self, id: &str) -> ApiResponse<Repair> {
        self.api.fetch(&GetRepair { id: id.to_string() }).await
    }

    pub async fn stats(&self) -> ApiResponse<RepairStats> {
        self.api.fetch(&RepairStatsRequest).await
    }

    pub async fn reminders(&self) -> ApiResponse<Vec<ServiceReminder>> {
        self.api.fetch(&RepairReminders).await
    }

    pub async fn by_date_range(&self, range: DateRange) -> ApiResponse<Vec<Repair>> {
        self.api.fetch(&RepairsByDateRange { range }).await
    }

    pub async fn update(&self, id: &str, patch: RepairPatch) -> ClientResult<Repair> {
        let request = UpdateRepair {
            id: id.to_string(),
            patch,
        };
        self.api
            .send(&request)
            .await
            .map_err(|e| e.in_op_with("repairs.update", id))
    }

    pub async fn delete(&self, id: &str) -> ClientResult<()> {
        self.api
            .send(&DeleteRepair { id: id.to_string() })
            .await
            .map(|_| ())
            .map_err(|e| e.in_op_with("repairs.delete", id))
    }
}

#[cfg(test)]
mod tests {
    use crate::request::HttpMethod;
    use crate::services::testing::{mock_services, url};
    use repairhub_shared::date::DateRange;
    use serde_json::json;

    #[tokio::test]
    async fn test_date_range_query() {
        let (services, mock) = mock_services(Some("t"));
        mock.mock_ok(
            HttpMethod::Get,
            &url("/api/repairs/date-range?start=2024-01-01&end=2024-06-30"),
            json!([{ "id": 1, "vehicle_id": 2, "service_type": "Oil change", "cost": "49.99", "service_date": "2024-02-10" }]),
        );

        let range = DateRange::parse("2024-01-01", "2024-06-30").unwrap();
        let repairs = services.repairs.by_date_range(range).await.into_result().unwrap();
        assert_eq!(repairs.len(), 1);
        assert_eq!(repairs[0].vehicle_id, "2");
        assert!(repairs[0].parts.is_empty());
    }

    #[tokio::test]
    async fn test_reminders_null_is_empty() {
        let (services, mock) = mock_services(Some("t"));
        mock.mock_ok(HttpMethod::Get, &url("/api/repairs/reminders"), json!({ "reminders": null }));
        let reminders = services.repairs.reminders().await.into_result().unwrap();
        assert!(reminders.is_empty());
    }
}
