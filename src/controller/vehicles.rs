use super::{ListState, Submission, Submits, ViewCell, ViewController, mutate};
use crate::RepairHub;
use crate::error::{ValidationError, first_invalid};
use crate::gate::Access;
use crate::view::{Filter, ListView, matches_search};
use chrono::Datelike;
use repairhub_shared::{VIN_LENGTH, Vehicle, VehicleDraft, VehiclePatch};
use validator::Validate;

pub const MIN_VEHICLE_YEAR: i32 = 1900;

/// 按 VIN / 品牌 / 型号 / 车牌搜索
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VehicleSearch {
    pub query: String,
}

impl Filter<Vehicle> for VehicleSearch {
    fn matches(&self, v: &Vehicle) -> bool {
        matches_search(
            &self.query,
            &[
                &v.vin,
                &v.make,
                &v.model,
                v.license_plate.as_deref().unwrap_or_default(),
                &v.year.to_string(),
            ],
        )
    }

    fn is_active(&self) -> bool {
        !self.query.trim().is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct VehiclesState {
    pub list: ListState<Vehicle>,
    pub search: VehicleSearch,
}

impl Submits for VehiclesState {
    fn submission(&mut self) -> &mut Submission {
        &mut self.list.submission
    }
}

/// 校验并规整新车辆：VIN 去空格转大写，必须正好 17 位
pub fn validate_vehicle(draft: &VehicleDraft) -> Result<VehicleDraft, ValidationError> {
    let mut clean = draft.clone();
    clean.vin = draft.vin.trim().to_uppercase();
    clean.make = draft.make.trim().to_string();
    clean.model = draft.model.trim().to_string();

    let max_year = chrono::Utc::now().year() + 1;
    let out_of_range = ValidationError::YearOutOfRange {
        min: MIN_VEHICLE_YEAR,
        max: max_year,
    };
    if let Err(report) = clean.validate() {
        return Err(match first_invalid(&report, &["vin", "make", "model", "year"]) {
            Some("year") => out_of_range,
            Some(field @ ("make" | "model")) => ValidationError::Required { field },
            _ => ValidationError::VinLength {
                expected: VIN_LENGTH,
            },
        });
    }
    if clean.year > max_year {
        return Err(out_of_range);
    }
    Ok(clean)
}

/// 车主的车辆列表页
#[derive(Clone)]
pub struct VehiclesController {
    hub: RepairHub,
    cell: ViewCell<VehiclesState>,
}

impl ViewController for VehiclesController {
    type State = VehiclesState;

    fn cell(&self) -> &ViewCell<VehiclesState> {
        &self.cell
    }
}

impl VehiclesController {
    /// `Access` 证明访问守卫已经放行
    pub fn new(hub: &RepairHub, _access: &Access) -> Self {
        Self {
            hub: hub.clone(),
            cell: ViewCell::new(VehiclesState::default()),
        }
    }

    pub fn view(&self) -> ListView<Vehicle> {
        self.cell
            .with(|s| ListView::derive(s.list.loading, &s.list.entities, &s.search))
    }

    /// 每次挂载只加载一次
    pub async fn load(&self) -> bool {
        if !self.cell.claim_first_load() {
            return false;
        }
        let resp = self.hub.services.vehicles.list().await;
        self.cell.apply(|s| s.list.settle(resp.data))
    }

    pub fn set_search(&self, query: &str) {
        self.cell.apply(|s| s.search.query = query.to_string());
    }

    /// 新建成功后直接追加到本地列表
    pub async fn create(&self, draft: VehicleDraft) -> bool {
        let draft = match validate_vehicle(&draft) {
            Ok(d) => d,
            Err(e) => {
                self.cell.apply(|s| s.list.submission.reject(e));
                return false;
            }
        };

        let created = mutate(&self.cell, "vehicles.create", self.hub.services.vehicles.create(&draft)).await;
        let ttl = self.hub.config.notice_ttl();
        match created {
            Some(vehicle) => self.cell.apply(|s| {
                s.list.append(vehicle);
                s.list.submission.succeed("Vehicle added", ttl);
            }),
            None => false,
        }
    }

    /// 成功后用服务端返回的车辆替换本地记录
    pub async fn update(&self, id: &str, patch: VehiclePatch) -> bool {
        let updated = mutate(
            &self.cell,
            "vehicles.update",
            self.hub.services.vehicles.update(id, patch),
        )
        .await;
        let ttl = self.hub.config.notice_ttl();
        match updated {
            Some(vehicle) => self.cell.apply(|s| {
                s.list.replace(vehicle);
                s.list.submission.succeed("Vehicle updated", ttl);
            }),
            None => false,
        }
    }

    /// 未确认时不发任何请求
    pub async fn delete(&self, id: &str, confirmed: bool) -> bool {
        if !confirmed {
            return false;
        }
        let deleted = mutate(&self.cell, "vehicles.delete", self.hub.services.vehicles.delete(id)).await;
        let ttl = self.hub.config.notice_ttl();
        match deleted {
            Some(()) => self.cell.apply(|s| {
                s.list.remove(id);
                s.list.submission.succeed("Vehicle deleted", ttl);
            }),
            None => false,
        }
    }

    pub async fn set_primary(&self, id: &str) -> bool {
        let done = mutate(
            &self.cell,
            "vehicles.set_primary",
            self.hub.services.vehicles.set_primary(id),
        )
        .await;
        let ttl = self.hub.config.notice_ttl();
        match done {
            Some(()) => self.cell.apply(|s| {
                for vehicle in &mut s.list.entities {
                    vehicle.is_primary = vehicle.id == id;
                }
                s.list.submission.succeed("Primary vehicle updated", ttl);
            }),
            None => false,
        }
    }
}
