use super::{ViewCell, ViewController};
use crate::RepairHub;
use crate::gate::Access;
use repairhub_shared::{
    Proposal, ProposalStatus, RepairLead, RepairStats, Role, ServiceReminder, Shop, Urgency, User,
    Vehicle,
};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CarOwnerOverview {
    pub vehicles: Vec<Vehicle>,
    pub stats: Option<RepairStats>,
    pub reminders: Vec<ServiceReminder>,
}

impl CarOwnerOverview {
    pub fn primary_vehicle(&self) -> Option<&Vehicle> {
        self.vehicles
            .iter()
            .find(|v| v.is_primary)
            .or_else(|| self.vehicles.first())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ShopOwnerOverview {
    pub shop: Shop,
    pub leads: Vec<RepairLead>,
    pub proposals: Vec<Proposal>,
}

impl ShopOwnerOverview {
    pub fn urgent_leads(&self) -> usize {
        self.leads
            .iter()
            .filter(|l| l.urgency == Urgency::Urgent)
            .count()
    }

    pub fn proposals_with(&self, status: ProposalStatus) -> usize {
        self.proposals.iter().filter(|p| p.status == status).count()
    }
}

/// 首页内容，按角色区分
#[derive(Debug, Clone, PartialEq)]
pub enum Overview {
    Loading,
    CarOwner(CarOwnerOverview),
    ShopOwner(ShopOwnerOverview),
    /// 店主还没有店铺，显示创建引导而不是线索面板
    ShopSetupRequired,
    InsuranceCompany(User),
    /// 关键数据读取失败
    Unavailable,
}

/// 控制面板首页
#[derive(Clone)]
pub struct OverviewController {
    hub: RepairHub,
    access: Access,
    cell: ViewCell<Overview>,
}

impl ViewController for OverviewController {
    type State = Overview;

    fn cell(&self) -> &ViewCell<Overview> {
        &self.cell
    }
}

impl OverviewController {
    pub fn new(hub: &RepairHub, access: &Access) -> Self {
        Self {
            hub: hub.clone(),
            access: access.clone(),
            cell: ViewCell::new(Overview::Loading),
        }
    }

    pub fn user(&self) -> &User {
        self.access.user()
    }

    pub async fn load(&self) -> bool {
        if !self.cell.claim_first_load() {
            return false;
        }
        let overview = match self.access.role() {
            Role::CarOwner => self.load_car_owner().await,
            Role::ShopOwner => self.load_shop_owner().await,
            Role::InsuranceCompany => Overview::InsuranceCompany(self.access.user().clone()),
        };
        self.cell.apply(|s| *s = overview)
    }

    async fn load_car_owner(&self) -> Overview {
        let services = &self.hub.services;
        let (vehicles, stats, reminders) = futures::join!(
            services.vehicles.list(),
            services.repairs.stats(),
            services.repairs.reminders()
        );
        Overview::CarOwner(CarOwnerOverview {
            vehicles: vehicles.data.unwrap_or_default(),
            stats: stats.data,
            reminders: reminders.data.unwrap_or_default(),
        })
    }

    /// 只有在店铺存在时才读取线索和报价
    async fn load_shop_owner(&self) -> Overview {
        let shops = &self.hub.services.shops;
        let shop = match shops.get_my_shop().await.into_result() {
            Ok(Some(shop)) => shop,
            Ok(None) => return Overview::ShopSetupRequired,
            Err(_) => return Overview::Unavailable,
        };

        let (leads, proposals) = futures::join!(
            shops.get_leads(self.hub.config.lead_page_size),
            shops.get_my_proposals()
        );
        Overview::ShopOwner(ShopOwnerOverview {
            shop,
            leads: leads.data.unwrap_or_default(),
            proposals: proposals.data.unwrap_or_default(),
        })
    }
}
