use crate::api::{ApiClient, ApiResponse};
use crate::error::ClientResult;
use repairhub_shared::protocol::{
    DeleteVehicle, GetVehicle, ListVehicles, SetPrimaryVehicle, UpdateVehicle, VehicleRepairs,
    VehicleStatsRequest,
};
use repairhub_shared::{Repair, Vehicle, VehicleDraft, VehiclePatch, VehicleStats};

#[derive(Clone)]
pub struct VehicleService {
    api: ApiClient,
}

impl VehicleService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn list(&self) -> ApiResponse<Vec<Vehicle>> {
        self.api.fetch(&ListVehicles).await
    }

    pub async fn get(&self, id: &str) -> ApiResponse<Vehicle> {
        self.api.fetch(&GetVehicle { id: id.to_string() }).await
    }

    pub async fn stats(&self, id: &str) -> ApiResponse<VehicleStats> {
        self.api
            .fetch(&VehicleStatsRequest { id: id.to_string() })
            .await
    }

    pub async fn repairs_for(&self, id: &str) -> ApiResponse<Vec<Repair>> {
        self.api.fetch(&VehicleRepairs { id: id.to_string() }).await
    }

    pub async fn create(&self, draft: &VehicleDraft) -> ClientResult<Vehicle> {
        self.api
            .send(draft)
            .await
            .map_err(|e| e.in_op("vehicles.create"))
    }

    pub async fn update(&self, id: &str, patch: VehiclePatch) -> ClientResult<Vehicle> {
        let request = UpdateVehicle {
            id: id.to_string(),
            patch,
        };
        self.api
            .send(&request)
            .await
            .map_err(|e| e.in_op_with("vehicles.update", id))
    }

    pub async fn delete(&self, id: &str) -> ClientResult<()> {
        self.api
            .send(&DeleteVehicle { id: id.to_string() })
            .await
            .map(|_| ())
            .map_err(|e| e.in_op_with("vehicles.delete", id))
    }

    pub async fn set_primary(&self, id: &str) -> ClientResult<()> {
        self.api
            .send(&SetPrimaryVehicle { id: id.to_string() })
            .await
            .map(|_| ())
            .map_err(|e| e.in_op_with("vehicles.set_primary", id))
    }
}
