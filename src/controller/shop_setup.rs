use super::{Submission, Submits, ViewCell, ViewController, mutate};
use crate::RepairHub;
use crate::error::ValidationError;
use crate::gate::Access;
use crate::route::AppRoute;
use repairhub_shared::{Shop, ShopDraft};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShopSetupState {
    pub created: Option<Shop>,
    pub submission: Submission,
}

impl Submits for ShopSetupState {
    fn submission(&mut self) -> &mut Submission {
        &mut self.submission
    }
}

pub fn validate_shop(draft: &ShopDraft) -> Result<ShopDraft, ValidationError> {
    let mut clean = draft.clone();
    clean.name = draft.name.trim().to_string();
    clean.address = draft.address.trim().to_string();
    if clean.name.is_empty() {
        return Err(ValidationError::Required { field: "name" });
    }
    if clean.address.is_empty() {
        return Err(ValidationError::Required { field: "address" });
    }
    clean.specialities.retain(|s| !s.trim().is_empty());
    Ok(clean)
}

/// 店主首次创建店铺
#[derive(Clone)]
pub struct ShopSetupController {
    hub: RepairHub,
    cell: ViewCell<ShopSetupState>,
}

impl ViewController for ShopSetupController {
    type State = ShopSetupState;

    fn cell(&self) -> &ViewCell<ShopSetupState> {
        &self.cell
    }
}

impl ShopSetupController {
    pub fn new(hub: &RepairHub, _access: &Access) -> Self {
        Self {
            hub: hub.clone(),
            cell: ViewCell::new(ShopSetupState::default()),
        }
    }

    /// 成功后返回下一步要去的页面
    pub async fn create(&self, draft: ShopDraft) -> Option<AppRoute> {
        let draft = match validate_shop(&draft) {
            Ok(d) => d,
            Err(e) => {
                self.cell.apply(|s| s.submission.reject(e));
                return None;
            }
        };

        let shop = mutate(&self.cell, "shops.create", self.hub.services.shops.create_shop(&draft)).await?;
        let ttl = self.hub.config.notice_ttl();
        self.cell
            .apply(|s| {
                s.created = Some(shop);
                s.submission.succeed("Shop created", ttl);
            })
            .then(AppRoute::home)
    }
}
