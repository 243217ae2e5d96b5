use super::{Submission, Submits, ViewCell, ViewController, mutate};
use crate::RepairHub;
use crate::error::ValidationError;
use crate::gate::Access;
use crate::view::Lightbox;
use repairhub_shared::{Proposal, RepairLead};

#[derive(Debug, Clone, PartialEq)]
pub struct RequestDetailState {
    pub lead: Option<RepairLead>,
    pub loading: bool,
    pub submission: Submission,
    pub lightbox: Lightbox,
}

impl Default for RequestDetailState {
    fn default() -> Self {
        Self {
            lead: None,
            loading: true,
            submission: Submission::default(),
            lightbox: Lightbox::default(),
        }
    }
}

impl Submits for RequestDetailState {
    fn submission(&mut self) -> &mut Submission {
        &mut self.submission
    }
}

#[derive(Clone, Copy)]
enum Decision {
    Accept,
    Reject,
}

/// 检查某个报价此刻能否被接受/拒绝
fn check_decision(lead: &RepairLead, proposal_id: &str, decision: Decision) -> Result<(), ValidationError> {
    let proposal = lead
        .proposals
        .iter()
        .find(|p| p.id == proposal_id)
        .ok_or(ValidationError::Required { field: "proposal" })?;

    if proposal.status.is_terminal() {
        return Err(ValidationError::ProposalResolved {
            status: proposal.status.as_str(),
        });
    }
    if matches!(decision, Decision::Accept) && lead.accepted_proposal().is_some() {
        return Err(ValidationError::ProposalAlreadyAccepted);
    }
    Ok(())
}

/// 车主查看自己的维修需求及收到的报价
#[derive(Clone)]
pub struct RequestDetailController {
    hub: RepairHub,
    lead_id: String,
    cell: ViewCell<RequestDetailState>,
}

impl ViewController for RequestDetailController {
    type State = RequestDetailState;

    fn cell(&self) -> &ViewCell<RequestDetailState> {
        &self.cell
    }
}

impl RequestDetailController {
    pub fn new(hub: &RepairHub, _access: &Access, lead_id: &str) -> Self {
        Self {
            hub: hub.clone(),
            lead_id: lead_id.to_string(),
            cell: ViewCell::new(RequestDetailState::default()),
        }
    }

    pub async fn load(&self) -> bool {
        if !self.cell.claim_first_load() {
            return false;
        }
        let resp = self.hub.services.shops.get_lead(&self.lead_id).await;
        self.cell.apply(|s| {
            s.lightbox = Lightbox::new(
                resp.data
                    .as_ref()
                    .map(|l| l.images.clone())
                    .unwrap_or_default(),
            );
            s.lead = resp.data;
            s.loading = false;
        })
    }

    /// 可以接受的条件：需求还没有已接受的报价，且该报价仍在等待中
    pub fn can_accept(&self, proposal_id: &str) -> bool {
        self.cell.with(|s| {
            s.lead
                .as_ref()
                .is_some_and(|l| check_decision(l, proposal_id, Decision::Accept).is_ok())
        })
    }

    pub async fn accept(&self, proposal_id: &str) -> bool {
        self.decide(proposal_id, Decision::Accept).await
    }

    pub async fn reject(&self, proposal_id: &str) -> bool {
        self.decide(proposal_id, Decision::Reject).await
    }

    async fn decide(&self, proposal_id: &str, decision: Decision) -> bool {
        let checked = self.cell.with(|s| match &s.lead {
            Some(lead) => check_decision(lead, proposal_id, decision),
            None => Err(ValidationError::Required { field: "proposal" }),
        });
        if let Err(e) = checked {
            self.cell.apply(|s| s.submission.reject(e));
            return false;
        }

        let shops = &self.hub.services.shops;
        let (result, op, text) = match decision {
            Decision::Accept => (
                mutate(&self.cell, "proposals.accept", shops.accept_proposal(proposal_id)).await,
                "accepted",
                "Proposal accepted",
            ),
            Decision::Reject => (
                mutate(&self.cell, "proposals.reject", shops.reject_proposal(proposal_id)).await,
                "rejected",
                "Proposal rejected",
            ),
        };
        let Some(updated) = result else {
            return false;
        };
        tracing::debug!("proposal {} {}", proposal_id, op);

        let ttl = self.hub.config.notice_ttl();
        self.cell.apply(|s| {
            if let Some(lead) = s.lead.as_mut() {
                replace_proposal(lead, proposal_id, updated);
            }
            s.submission.succeed(text, ttl);
        })
    }

    pub fn open_image(&self, index: usize) {
        self.cell.apply(|s| s.lightbox.open(index));
    }

    pub fn next_image(&self) {
        self.cell.apply(|s| s.lightbox.next());
    }

    pub fn prev_image(&self) {
        self.cell.apply(|s| s.lightbox.prev());
    }

    pub fn close_image(&self) {
        self.cell.apply(|s| s.lightbox.close());
    }
}

fn replace_proposal(lead: &mut RepairLead, proposal_id: &str, updated: Proposal) {
    if let Some(slot) = lead.proposals.iter_mut().find(|p| p.id == proposal_id) {
        *slot = updated;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use repairhub_shared::ProposalStatus;
    use serde_json::json;

    fn lead(statuses: &[&str]) -> RepairLead {
        let proposals: Vec<_> = statuses
            .iter()
            .enumerate()
            .map(|(i, status)| json!({ "id": i + 1, "lead_id": 9, "status": status }))
            .collect();
        serde_json::from_value(json!({ "id": 9, "title": "Brakes", "proposals": proposals })).unwrap()
    }

    #[test]
    fn test_accept_blocked_once_another_is_accepted() {
        let lead = lead(&["accepted", "pending"]);
        assert_eq!(
            check_decision(&lead, "2", Decision::Accept),
            Err(ValidationError::ProposalAlreadyAccepted)
        );
        assert!(check_decision(&lead, "2", Decision::Reject).is_ok());
    }

    #[test]
    fn test_resolved_proposals_are_final() {
        let lead = lead(&["rejected", "pending"]);
        assert_eq!(
            check_decision(&lead, "1", Decision::Accept),
            Err(ValidationError::ProposalResolved { status: "rejected" })
        );
        assert_eq!(lead.proposals[0].status, ProposalStatus::Rejected);
        assert!(check_decision(&lead, "2", Decision::Accept).is_ok());
    }
}
