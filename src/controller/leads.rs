use super::{ListState, Submission, Submits, ViewCell, ViewController, mutate};
use crate::RepairHub;
use crate::error::{ValidationError, first_invalid};
use crate::gate::Access;
use crate::view::{Filter, Lightbox, ListView};
use repairhub_shared::{
    MIN_PROPOSAL_MESSAGE_LEN, Proposal, ProposalDraft, RepairLead, Shop, Urgency,
};
use validator::Validate;

/// 紧急程度筛选
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UrgencyFilter {
    #[default]
    All,
    Only(Urgency),
}

impl Filter<RepairLead> for UrgencyFilter {
    fn matches(&self, lead: &RepairLead) -> bool {
        match self {
            UrgencyFilter::All => true,
            UrgencyFilter::Only(urgency) => lead.urgency == *urgency,
        }
    }

    fn is_active(&self) -> bool {
        !matches!(self, UrgencyFilter::All)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LeadsState {
    pub shop: Option<Shop>,
    /// 店主还没有店铺，线索不会被读取
    pub shop_missing: bool,
    pub leads: ListState<RepairLead>,
    pub my_proposals: Vec<Proposal>,
    pub filter: UrgencyFilter,
    /// 正在填写报价的线索
    pub proposing_for: Option<String>,
    pub lightbox: Lightbox,
}

impl Submits for LeadsState {
    fn submission(&mut self) -> &mut Submission {
        &mut self.leads.submission
    }
}

/// 报价校验：说明至少 20 个字符，费用为非负有限数
///
/// 长度按输入原样计算，通过后才去掉首尾空白再发送。
pub fn validate_proposal(draft: &ProposalDraft) -> Result<ProposalDraft, ValidationError> {
    let failed = draft
        .validate()
        .err()
        .and_then(|report| first_invalid(&report, &["lead_id", "message", "estimated_cost"]));
    match failed {
        Some("lead_id") => return Err(ValidationError::Required { field: "lead_id" }),
        Some("message") => {
            return Err(ValidationError::MessageTooShort {
                min: MIN_PROPOSAL_MESSAGE_LEN,
            });
        }
        _ => {}
    }
    if !draft.estimated_cost.is_finite() {
        return Err(ValidationError::Required {
            field: "estimated_cost",
        });
    }
    if failed == Some("estimated_cost") {
        return Err(ValidationError::NegativeCost);
    }

    let optional = |v: &Option<String>| {
        v.as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    };
    Ok(ProposalDraft {
        lead_id: draft.lead_id.clone(),
        message: draft.message.trim().to_string(),
        estimated_cost: draft.estimated_cost,
        estimated_duration: optional(&draft.estimated_duration),
        warranty: optional(&draft.warranty),
    })
}

/// 店主的线索面板
#[derive(Clone)]
pub struct LeadsController {
    hub: RepairHub,
    cell: ViewCell<LeadsState>,
}

impl ViewController for LeadsController {
    type State = LeadsState;

    fn cell(&self) -> &ViewCell<LeadsState> {
        &self.cell
    }
}

impl LeadsController {
    pub fn new(hub: &RepairHub, _access: &Access) -> Self {
        Self {
            hub: hub.clone(),
            cell: ViewCell::new(LeadsState::default()),
        }
    }

    pub fn view(&self) -> ListView<RepairLead> {
        self.cell
            .with(|s| ListView::derive(s.leads.loading, &s.leads.entities, &s.filter))
    }

    /// 当前筛选下的线索
    pub fn filtered_leads(&self) -> Vec<RepairLead> {
        self.cell.with(|s| {
            s.leads
                .entities
                .iter()
                .filter(|l| s.filter.matches(l))
                .cloned()
                .collect()
        })
    }

    /// 先确认店铺存在，再并发读取线索和自己的报价
    pub async fn load(&self) -> bool {
        if !self.cell.claim_first_load() {
            return false;
        }
        let shops = &self.hub.services.shops;

        let shop = shops.get_my_shop().await.into_result();
        let shop = match shop {
            Ok(Some(shop)) => shop,
            Ok(None) => {
                return self.cell.apply(|s| {
                    s.shop_missing = true;
                    s.leads.settle(None);
                });
            }
            Err(_) => return self.cell.apply(|s| s.leads.settle(None)),
        };
        if !self.cell.apply(|s| s.shop = Some(shop)) {
            return false;
        }

        let load_leads = async {
            let resp = shops.get_leads(self.hub.config.lead_page_size).await;
            self.cell.apply(|s| s.leads.settle(resp.data));
        };
        let load_proposals = async {
            let resp = shops.get_my_proposals().await;
            self.cell
                .apply(|s| s.my_proposals = resp.data.unwrap_or_default());
        };
        futures::join!(load_leads, load_proposals);
        self.cell.is_alive()
    }

    pub fn set_filter(&self, filter: UrgencyFilter) {
        self.cell.apply(|s| s.filter = filter);
    }

    pub fn open_proposal_form(&self, lead_id: &str) {
        self.cell.apply(|s| {
            s.proposing_for = Some(lead_id.to_string());
            s.leads.submission.error = None;
        });
    }

    pub fn close_proposal_form(&self) {
        self.cell.apply(|s| s.proposing_for = None);
    }

    /// 成功后：该线索的报价数 +1，报价追加到"我的报价"
    pub async fn submit_proposal(&self, draft: ProposalDraft) -> bool {
        let draft = match validate_proposal(&draft) {
            Ok(d) => d,
            Err(e) => {
                self.cell.apply(|s| s.leads.submission.reject(e));
                return false;
            }
        };

        let submitted = mutate(
            &self.cell,
            "shops.submit_proposal",
            self.hub.services.shops.submit_proposal(&draft),
        )
        .await;
        let ttl = self.hub.config.notice_ttl();
        match submitted {
            Some(proposal) => self.cell.apply(|s| {
                if let Some(lead) = s.leads.entities.iter_mut().find(|l| l.id == draft.lead_id) {
                    lead.proposal_count += 1;
                }
                s.my_proposals.push(proposal);
                s.proposing_for = None;
                s.leads.submission.succeed("Proposal submitted", ttl);
            }),
            None => false,
        }
    }

    pub fn open_images(&self, lead_id: &str, index: usize) {
        self.cell.apply(|s| {
            let images = s.leads.find(lead_id).map(|l| l.images.clone()).unwrap_or_default();
            s.lightbox = Lightbox::new(images);
            s.lightbox.open(index);
        });
    }

    pub fn next_image(&self) {
        self.cell.apply(|s| s.lightbox.next());
    }

    pub fn prev_image(&self) {
        self.cell.apply(|s| s.lightbox.prev());
    }

    pub fn close_images(&self) {
        self.cell.apply(|s| s.lightbox.close());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_proposal_validation() {
        let draft = ProposalDraft {
            lead_id: "7".into(),
            message: "  too short  ".into(),
            estimated_cost: 120.0,
            ..Default::default()
        };
        assert_eq!(
            validate_proposal(&draft),
            Err(ValidationError::MessageTooShort { min: 20 })
        );

        let negative = ProposalDraft {
            message: "Replace both front brake pads and rotors".into(),
            estimated_cost: -1.0,
            ..draft.clone()
        };
        assert_eq!(validate_proposal(&negative), Err(ValidationError::NegativeCost));

        let free = ProposalDraft {
            estimated_cost: 0.0,
            estimated_duration: Some("  ".into()),
            ..negative
        };
        let clean = validate_proposal(&free).unwrap();
        assert_eq!(clean.estimated_duration, None);
    }

    #[test]
    fn test_padded_message_counts_as_typed() {
        let padded = ProposalDraft {
            lead_id: "7".into(),
            message: format!("{} ", "a".repeat(19)),
            estimated_cost: 80.0,
            ..Default::default()
        };
        let clean = validate_proposal(&padded).unwrap();
        assert_eq!(clean.message, "a".repeat(19));

        let nan = ProposalDraft {
            estimated_cost: f64::NAN,
            ..padded
        };
        assert_eq!(validate_proposal(&nan).unwrap_err().field(), "estimated_cost");
    }
}
