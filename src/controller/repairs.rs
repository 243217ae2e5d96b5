use super::{ListState, Submission, Submits, ViewCell, ViewController, mutate};
use crate::RepairHub;
use crate::error::ValidationError;
use crate::gate::Access;
use crate::view::{Filter, ListView, matches_search};
use repairhub_shared::date::DateRange;
use repairhub_shared::{Repair, RepairPatch, RepairStats, ServiceReminder};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RepairFilter {
    pub query: String,
    pub service_type: Option<String>,
}

impl Filter<Repair> for RepairFilter {
    fn matches(&self, r: &Repair) -> bool {
        let type_ok = self
            .service_type
            .as_deref()
            .is_none_or(|t| r.service_type.eq_ignore_ascii_case(t));
        type_ok
            && matches_search(
                &self.query,
                &[
                    &r.service_type,
                    r.description.as_deref().unwrap_or_default(),
                    r.shop_name.as_deref().unwrap_or_default(),
                ],
            )
    }

    fn is_active(&self) -> bool {
        !self.query.trim().is_empty() || self.service_type.is_some()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RepairsState {
    pub list: ListState<Repair>,
    pub stats: Option<RepairStats>,
    pub reminders: Vec<ServiceReminder>,
    pub filter: RepairFilter,
    /// 当前打开的维修记录
    pub selected: Option<Repair>,
    pub range: Option<DateRange>,
}

impl Submits for RepairsState {
    fn submission(&mut self) -> &mut Submission {
        &mut self.list.submission
    }
}

/// 维修历史页
#[derive(Clone)]
pub struct RepairsController {
    hub: RepairHub,
    cell: ViewCell<RepairsState>,
}

impl ViewController for RepairsController {
    type State = RepairsState;

    fn cell(&self) -> &ViewCell<RepairsState> {
        &self.cell
    }
}

impl RepairsController {
    pub fn new(hub: &RepairHub, _access: &Access) -> Self {
        Self {
            hub: hub.clone(),
            cell: ViewCell::new(RepairsState::default()),
        }
    }

    pub fn view(&self) -> ListView<Repair> {
        self.cell
            .with(|s| ListView::derive(s.list.loading, &s.list.entities, &s.filter))
    }

    /// 列表、统计、提醒并发读取
    pub async fn load(&self) -> bool {
        if !self.cell.claim_first_load() {
            return false;
        }
        let repairs = &self.hub.services.repairs;

        let load_list = async {
            let resp = repairs.list().await;
            self.cell.apply(|s| s.list.settle(resp.data));
        };
        let load_stats = async {
            let resp = repairs.stats().await;
            self.cell.apply(|s| s.stats = resp.data);
        };
        let load_reminders = async {
            let resp = repairs.reminders().await;
            self.cell.apply(|s| s.reminders = resp.data.unwrap_or_default());
        };
        futures::join!(load_list, load_stats, load_reminders);
        self.cell.is_alive()
    }

    pub fn set_search(&self, query: &str) {
        self.cell.apply(|s| s.filter.query = query.to_string());
    }

    pub fn set_service_type(&self, service_type: Option<&str>) {
        self.cell
            .apply(|s| s.filter.service_type = service_type.map(str::to_string));
    }

    /// 下拉框可选的服务类型（去重、排序）
    pub fn service_types(&self) -> Vec<String> {
        self.cell.with(|s| {
            s.list
                .entities
                .iter()
                .map(|r| r.service_type.clone())
                .collect::<BTreeSet<_>>()
                .into_iter()
                .collect()
        })
    }

    pub async fn open(&self, id: &str) -> bool {
        let resp = self.hub.services.repairs.get(id).await;
        match resp.data {
            Some(repair) => self.cell.apply(|s| s.selected = Some(repair)),
            None => false,
        }
    }

    pub fn close(&self) {
        self.cell.apply(|s| s.selected = None);
    }

    /// 按日期区间重新加载列表
    pub async fn load_range(&self, start: &str, end: &str) -> bool {
        let Some(range) = DateRange::parse(start, end) else {
            self.cell
                .apply(|s| s.list.submission.reject(ValidationError::InvalidDateRange));
            return false;
        };

        self.cell.apply(|s| {
            s.list.loading = true;
            s.list.submission.error = None;
        });
        let resp = self.hub.services.repairs.by_date_range(range).await;
        self.cell.apply(|s| {
            s.range = Some(range);
            s.list.settle(resp.data);
        })
    }

    pub async fn clear_range(&self) -> bool {
        self.cell.apply(|s| s.list.loading = true);
        let resp = self.hub.services.repairs.list().await;
        self.cell.apply(|s| {
            s.range = None;
            s.list.settle(resp.data);
        })
    }

    pub async fn update(&self, id: &str, patch: RepairPatch) -> bool {
        let updated = mutate(
            &self.cell,
            "repairs.update",
            self.hub.services.repairs.update(id, patch),
        )
        .await;
        let ttl = self.hub.config.notice_ttl();
        match updated {
            Some(repair) => self.cell.apply(|s| {
                if s.selected.as_ref().is_some_and(|r| r.id == repair.id) {
                    s.selected = Some(repair.clone());
                }
                s.list.replace(repair);
                s.list.submission.succeed("Repair updated", ttl);
            }),
            None => false,
        }
    }

    pub async fn delete(&self, id: &str, confirmed: bool) -> bool {
        if !confirmed {
            return false;
        }
        let deleted = mutate(&self.cell, "repairs.delete", self.hub.services.repairs.delete(id)).await;
        let ttl = self.hub.config.notice_ttl();
        match deleted {
            Some(()) => self.cell.apply(|s| {
                if s.selected.as_ref().is_some_and(|r| r.id == id) {
                    s.selected = None;
                }
                s.list.remove(id);
                s.list.submission.succeed("Repair deleted", ttl);
            }),
            None => false,
        }
    }
}
