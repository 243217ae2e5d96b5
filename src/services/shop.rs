use crate::api::{ApiClient, ApiResponse};
use crate::error::ClientResult;
use repairhub_shared::protocol::{
    AcceptProposal, GetLead, GetLeads, GetMyProposals, GetMyShop, RejectProposal,
};
use repairhub_shared::{Proposal, ProposalDraft, RepairLead, Shop, ShopDraft};

#[derive(Clone)]
pub struct ShopService {
    api: ApiClient,
}

impl ShopService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// 当前店主的店铺；还没有店铺时为 `None`（服务端用 404 或 `null` 表示）
    pub async fn get_my_shop(&self) -> ApiResponse<Option<Shop>> {
        match self.api.send(&GetMyShop).await {
            Ok(shop) => ApiResponse::ok(shop),
            Err(e) if e.is_not_found() => ApiResponse::ok(None),
            Err(e) => {
                tracing::warn!("read failed: {}", e);
                ApiResponse::failed(e)
            }
        }
    }

    pub async fn create_shop(&self, draft: &ShopDraft) -> ClientResult<Shop> {
        self.api
            .send(draft)
            .await
            .map_err(|e| e.in_op("shops.create"))
    }

    pub async fn get_leads(&self, limit: u32) -> ApiResponse<Vec<RepairLead>> {
        self.api.fetch(&GetLeads { limit }).await
    }

    pub async fn get_lead(&self, id: &str) -> ApiResponse<RepairLead> {
        self.api.fetch(&GetLead { id: id.to_string() }).await
    }

    pub async fn submit_proposal(&self, draft: &ProposalDraft) -> ClientResult<Proposal> {
        self.api
            .send(draft)
            .await
            .map_err(|e| e.in_op_with("shops.submit_proposal", &draft.lead_id))
    }

    pub async fn get_my_proposals(&self) -> ApiResponse<Vec<Proposal>> {
        self.api.fetch(&GetMyProposals).await
    }

    pub async fn accept_proposal(&self, id: &str) -> ClientResult<Proposal> {
        self.api
            .send(&AcceptProposal { id: id.to_string() })
            .await
            .map_err(|e| e.in_op_with("proposals.accept", id))
    }

    pub async fn reject_proposal(&self, id: &str) -> ClientResult<Proposal> {
        self.api
            .send(&RejectProposal { id: id.to_string() })
            .await
            .map_err(|e| e.in_op_with("proposals.reject", id))
    }
}

#[cfg(test)]
mod tests {
    use crate::request::HttpMethod;
    use crate::services::testing::{mock_services, url};
    use repairhub_shared::Urgency;
    use serde_json::json;

    #[tokio::test]
    async fn test_missing_shop_is_none() {
        let (services, mock) = mock_services(Some("t"));
        // 没有 mock 的地址返回 404
        let shop = services.shops.get_my_shop().await;
        assert!(shop.is_success());
        assert_eq!(shop.data, Some(None));

        mock.mock_ok(
            HttpMethod::Get,
            &url("/api/shops/my-shop"),
            json!({ "shop": { "id": 8, "name": "Acme Auto", "address": "1 Main St" } }),
        );
        let shop = services.shops.get_my_shop().await.into_result().unwrap().unwrap();
        assert_eq!(shop.name, "Acme Auto");
        assert!(shop.is_active);
    }

    #[tokio::test]
    async fn test_leads_use_limit_query() {
        let (services, mock) = mock_services(Some("t"));
        mock.mock_ok(
            HttpMethod::Get,
            &url("/api/shops/leads?limit=20"),
            json!({ "leads": [
                { "id": 1, "title": "Brakes", "urgency": "urgent" },
                { "id": 2, "title": "Oil change", "urgency": "low" }
            ] }),
        );

        let leads = services.shops.get_leads(20).await.into_result().unwrap();
        assert_eq!(leads.len(), 2);
        assert_eq!(leads[0].urgency, Urgency::Urgent);
    }

    #[tokio::test]
    async fn test_server_error_on_read_is_a_value() {
        let (services, mock) = mock_services(Some("t"));
        mock.mock_response(
            HttpMethod::Get,
            &url("/api/shops/my-shop"),
            500,
            json!({ "success": false, "error": "boom" }),
        );
        let shop = services.shops.get_my_shop().await;
        assert!(!shop.is_success());
        assert_eq!(shop.error_message(), Some("boom"));
    }
}
