use super::{ListState, ViewCell, ViewController};
use crate::RepairHub;
use crate::gate::Access;
use crate::view::{Filter, ListView};
use repairhub_shared::{Proposal, ProposalStatus};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    Only(ProposalStatus),
}

impl Filter<Proposal> for StatusFilter {
    fn matches(&self, proposal: &Proposal) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(status) => proposal.status == *status,
        }
    }

    fn is_active(&self) -> bool {
        !matches!(self, StatusFilter::All)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProposalsState {
    pub list: ListState<Proposal>,
    pub filter: StatusFilter,
}

/// 店主已提交的报价
#[derive(Clone)]
pub struct ProposalsController {
    hub: RepairHub,
    cell: ViewCell<ProposalsState>,
}

impl ViewController for ProposalsController {
    type State = ProposalsState;

    fn cell(&self) -> &ViewCell<ProposalsState> {
        &self.cell
    }
}

impl ProposalsController {
    pub fn new(hub: &RepairHub, _access: &Access) -> Self {
        Self {
            hub: hub.clone(),
            cell: ViewCell::new(ProposalsState::default()),
        }
    }

    pub fn view(&self) -> ListView<Proposal> {
        self.cell
            .with(|s| ListView::derive(s.list.loading, &s.list.entities, &s.filter))
    }

    pub async fn load(&self) -> bool {
        if !self.cell.claim_first_load() {
            return false;
        }
        let resp = self.hub.services.shops.get_my_proposals().await;
        self.cell.apply(|s| s.list.settle(resp.data))
    }

    pub fn set_filter(&self, filter: StatusFilter) {
        self.cell.apply(|s| s.filter = filter);
    }

    pub fn count(&self, status: ProposalStatus) -> usize {
        self.cell
            .with(|s| s.list.entities.iter().filter(|p| p.status == status).count())
    }
}
