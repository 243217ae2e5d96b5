use super::{ViewCell, ViewController};
use crate::RepairHub;
use crate::gate::Access;
use repairhub_shared::{Repair, Vehicle, VehicleStats};

#[derive(Debug, Clone, PartialEq)]
pub struct VehicleDetailState {
    pub vehicle: Option<Vehicle>,
    pub stats: Option<VehicleStats>,
    pub repairs: Vec<Repair>,
    pub loading: bool,
}

impl Default for VehicleDetailState {
    fn default() -> Self {
        Self {
            vehicle: None,
            stats: None,
            repairs: Vec::new(),
            loading: true,
        }
    }
}

/// 单辆车的详情页：车辆、统计、维修记录三路并发读取
#[derive(Clone)]
pub struct VehicleDetailController {
    hub: RepairHub,
    vehicle_id: String,
    cell: ViewCell<VehicleDetailState>,
}

impl ViewController for VehicleDetailController {
    type State = VehicleDetailState;

    fn cell(&self) -> &ViewCell<VehicleDetailState> {
        &self.cell
    }
}

impl VehicleDetailController {
    pub fn new(hub: &RepairHub, _access: &Access, vehicle_id: &str) -> Self {
        Self {
            hub: hub.clone(),
            vehicle_id: vehicle_id.to_string(),
            cell: ViewCell::new(VehicleDetailState::default()),
        }
    }

    pub async fn load(&self) -> bool {
        if !self.cell.claim_first_load() {
            return false;
        }
        let vehicles = &self.hub.services.vehicles;
        let id = self.vehicle_id.as_str();

        // 三个请求互不依赖，各自写回自己那部分状态
        let load_vehicle = async {
            let resp = vehicles.get(id).await;
            self.cell.apply(|s| s.vehicle = resp.data);
        };
        let load_stats = async {
            let resp = vehicles.stats(id).await;
            self.cell.apply(|s| s.stats = resp.data);
        };
        let load_repairs = async {
            let resp = vehicles.repairs_for(id).await;
            self.cell.apply(|s| s.repairs = resp.data.unwrap_or_default());
        };
        futures::join!(load_vehicle, load_stats, load_repairs);

        self.cell.apply(|s| s.loading = false)
    }

    /// 按服务日期倒序的维修记录
    pub fn recent_repairs(&self) -> Vec<Repair> {
        let mut repairs = self.cell.with(|s| s.repairs.clone());
        repairs.sort_by(|a, b| b.service_date.cmp(&a.service_date));
        repairs
    }
}
