use crate::date::DateRange;
use crate::{
    AuthSession, ListResource, Credentials, Diagnosis, DiagnosisRequest, HealthStatus, Proposal, ProposalDraft,
    Repair, RepairLead, RepairPatch, RepairStats, ServiceReminder, Shop, ShopDraft, SignupProfile,
    User, Vehicle, VehicleDraft, VehiclePatch, VehicleStats,
};
use serde::de::{DeserializeOwned, IgnoredAny};
use serde::{Deserialize, Serialize};

/// HTTP Methods for API Requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }

    /// Whether requests with this method carry a JSON body.
    pub fn has_body(&self) -> bool {
        matches!(self, HttpMethod::Post | HttpMethod::Put | HttpMethod::Patch)
    }
}

/// How the `data` field of the response envelope is shaped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Payload {
    /// `data` is the response itself.
    Item,
    /// `data` is the item, or an object wrapping it under the given field.
    Single(&'static str),
    /// `data` is a bare array, or an object wrapping the array under the given field.
    List(&'static str),
}

impl Payload {
    /// List payload wrapped under the resource's own field name.
    pub const fn list_of<T: ListResource>() -> Self {
        Payload::List(T::FIELD)
    }
}

/// A trait that defines the request-response relationship and metadata for an API endpoint.
pub trait ApiRequest: Serialize {
    /// The response type carried in the envelope's `data` field.
    type Response: DeserializeOwned;
    /// The HTTP method.
    const METHOD: HttpMethod;
    /// Whether the session token must be attached.
    const AUTHENTICATED: bool = true;
    /// Shape of the envelope payload.
    const PAYLOAD: Payload = Payload::Item;

    /// The URL path, path parameters already substituted.
    fn path(&self) -> String;

    /// Query string parameters.
    fn query(&self) -> Vec<(&'static str, String)> {
        Vec::new()
    }

    /// JSON body; path parameters are `#[serde(skip)]` so only the payload remains.
    fn body(&self) -> Result<Option<serde_json::Value>, serde_json::Error> {
        if !Self::METHOD.has_body() {
            return Ok(None);
        }
        let value = serde_json::to_value(self)?;
        Ok((!value.is_null()).then_some(value))
    }
}

// =========================================================
// Auth
// =========================================================

impl ApiRequest for Credentials {
    type Response = AuthSession;
    const METHOD: HttpMethod = HttpMethod::Post;
    const AUTHENTICATED: bool = false;

    fn path(&self) -> String {
        "/api/auth/login".into()
    }
}

impl ApiRequest for SignupProfile {
    type Response = AuthSession;
    const METHOD: HttpMethod = HttpMethod::Post;
    const AUTHENTICATED: bool = false;

    fn path(&self) -> String {
        "/api/auth/signup".into()
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Logout;

impl ApiRequest for Logout {
    type Response = IgnoredAny;
    const METHOD: HttpMethod = HttpMethod::Post;

    fn path(&self) -> String {
        "/api/auth/logout".into()
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CurrentUser;

impl ApiRequest for CurrentUser {
    type Response = User;
    const METHOD: HttpMethod = HttpMethod::Get;
    const PAYLOAD: Payload = Payload::Single("user");

    fn path(&self) -> String {
        "/api/auth/me".into()
    }
}

// =========================================================
// Vehicles
// =========================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct ListVehicles;

impl ApiRequest for ListVehicles {
    type Response = Vec<Vehicle>;
    const METHOD: HttpMethod = HttpMethod::Get;
    const PAYLOAD: Payload = Payload::list_of::<Vehicle>();

    fn path(&self) -> String {
        "/api/vehicles".into()
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GetVehicle {
    #[serde(skip)]
    pub id: String,
}

impl ApiRequest for GetVehicle {
    type Response = Vehicle;
    const METHOD: HttpMethod = HttpMethod::Get;
    const PAYLOAD: Payload = Payload::Single("vehicle");

    fn path(&self) -> String {
        format!("/api/vehicles/{}", self.id)
    }
}

impl ApiRequest for VehicleDraft {
    type Response = Vehicle;
    const METHOD: HttpMethod = HttpMethod::Post;
    const PAYLOAD: Payload = Payload::Single("vehicle");

    fn path(&self) -> String {
        "/api/vehicles".into()
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateVehicle {
    #[serde(skip)]
    pub id: String,
    #[serde(flatten)]
    pub patch: VehiclePatch,
}

impl ApiRequest for UpdateVehicle {
    type Response = Vehicle;
    const METHOD: HttpMethod = HttpMethod::Put;
    const PAYLOAD: Payload = Payload::Single("vehicle");

    fn path(&self) -> String {
        format!("/api/vehicles/{}", self.id)
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteVehicle {
    #[serde(skip)]
    pub id: String,
}

impl ApiRequest for DeleteVehicle {
    type Response = IgnoredAny;
    const METHOD: HttpMethod = HttpMethod::Delete;

    fn path(&self) -> String {
        format!("/api/vehicles/{}", self.id)
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SetPrimaryVehicle {
    #[serde(skip)]
    pub id: String,
}

impl ApiRequest for SetPrimaryVehicle {
    type Response = IgnoredAny;
    const METHOD: HttpMethod = HttpMethod::Put;

    fn path(&self) -> String {
        format!("/api/vehicles/{}/primary", self.id)
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct VehicleStatsRequest {
    #[serde(skip)]
    pub id: String,
}

impl ApiRequest for VehicleStatsRequest {
    type Response = VehicleStats;
    const METHOD: HttpMethod = HttpMethod::Get;
    const PAYLOAD: Payload = Payload::Single("stats");

    fn path(&self) -> String {
        format!("/api/vehicles/{}/stats", self.id)
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct VehicleRepairs {
    #[serde(skip)]
    pub id: String,
}

impl ApiRequest for VehicleRepairs {
    type Response = Vec<Repair>;
    const METHOD: HttpMethod = HttpMethod::Get;
    const PAYLOAD: Payload = Payload::list_of::<Repair>();

    fn path(&self) -> String {
        format!("/api/vehicles/{}/repairs", self.id)
    }
}

// =========================================================
// Shops, leads & proposals
// =========================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct GetMyShop;

impl ApiRequest for GetMyShop {
    type Response = Option<Shop>;
    const METHOD: HttpMethod = HttpMethod::Get;
    const PAYLOAD: Payload = Payload::Single("shop");

    fn path(&self) -> String {
        "/api/shops/my-shop".into()
    }
}

impl ApiRequest for ShopDraft {
    type Response = Shop;
    const METHOD: HttpMethod = HttpMethod::Post;
    const PAYLOAD: Payload = Payload::Single("shop");

    fn path(&self) -> String {
        "/api/shops".into()
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GetLeads {
    #[serde(skip)]
    pub limit: u32,
}

impl ApiRequest for GetLeads {
    type Response = Vec<RepairLead>;
    const METHOD: HttpMethod = HttpMethod::Get;
    const PAYLOAD: Payload = Payload::list_of::<RepairLead>();

    fn path(&self) -> String {
        "/api/shops/leads".into()
    }

    fn query(&self) -> Vec<(&'static str, String)> {
        vec![("limit", self.limit.to_string())]
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GetLead {
    #[serde(skip)]
    pub id: String,
}

impl ApiRequest for GetLead {
    type Response = RepairLead;
    const METHOD: HttpMethod = HttpMethod::Get;
    const PAYLOAD: Payload = Payload::Single("lead");

    fn path(&self) -> String {
        format!("/api/shops/leads/{}", self.id)
    }
}

impl ApiRequest for ProposalDraft {
    type Response = Proposal;
    const METHOD: HttpMethod = HttpMethod::Post;
    const PAYLOAD: Payload = Payload::Single("proposal");

    fn path(&self) -> String {
        "/api/shops/proposals".into()
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GetMyProposals;

impl ApiRequest for GetMyProposals {
    type Response = Vec<Proposal>;
    const METHOD: HttpMethod = HttpMethod::Get;
    const PAYLOAD: Payload = Payload::list_of::<Proposal>();

    fn path(&self) -> String {
        "/api/shops/proposals".into()
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AcceptProposal {
    #[serde(skip)]
    pub id: String,
}

impl ApiRequest for AcceptProposal {
    type Response = Proposal;
    const METHOD: HttpMethod = HttpMethod::Post;
    const PAYLOAD: Payload = Payload::Single("proposal");

    fn path(&self) -> String {
        format!("/api/proposals/{}/accept", self.id)
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RejectProposal {
    #[serde(skip)]
    pub id: String,
}

impl ApiRequest for RejectProposal {
    type Response = Proposal;
    const METHOD: HttpMethod = HttpMethod::Post;
    const PAYLOAD: Payload = Payload::Single("proposal");

    fn path(&self) -> String {
        format!("/api/proposals/{}/reject", self.id)
    }
}

// =========================================================
// Repairs
// =========================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct ListRepairs;

impl ApiRequest for ListRepairs {
    type Response = Vec<Repair>;
    const METHOD: HttpMethod = HttpMethod::Get;
    const PAYLOAD: Payload = Payload::list_of::<Repair>();

    fn path(&self) -> String {
        "/api/repairs".into()
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GetRepair {
    #[serde(skip)]
    pub id: String,
}

impl ApiRequest for GetRepair {
    type Response = Repair;
    const METHOD: HttpMethod = HttpMethod::Get;
    const PAYLOAD: Payload = Payload::Single("repair");

    fn path(&self) -> String {
        format!("/api/repairs/{}", self.id)
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateRepair {
    #[serde(skip)]
    pub id: String,
    #[serde(flatten)]
    pub patch: RepairPatch,
}

impl ApiRequest for UpdateRepair {
    type Response = Repair;
    const METHOD: HttpMethod = HttpMethod::Put;
    const PAYLOAD: Payload = Payload::Single("repair");

    fn path(&self) -> String {
        format!("/api/repairs/{}", self.id)
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteRepair {
    #[serde(skip)]
    pub id: String,
}

impl ApiRequest for DeleteRepair {
    type Response = IgnoredAny;
    const METHOD: HttpMethod = HttpMethod::Delete;

    fn path(&self) -> String {
        format!("/api/repairs/{}", self.id)
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RepairStatsRequest;

impl ApiRequest for RepairStatsRequest {
    type Response = RepairStats;
    const METHOD: HttpMethod = HttpMethod::Get;
    const PAYLOAD: Payload = Payload::Single("stats");

    fn path(&self) -> String {
        "/api/repairs/stats".into()
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RepairReminders;

impl ApiRequest for RepairReminders {
    type Response = Vec<ServiceReminder>;
    const METHOD: HttpMethod = HttpMethod::Get;
    const PAYLOAD: Payload = Payload::list_of::<ServiceReminder>();

    fn path(&self) -> String {
        "/api/repairs/reminders".into()
    }
}

#[derive(Debug, Serialize)]
pub struct RepairsByDateRange {
    #[serde(skip)]
    pub range: DateRange,
}

impl ApiRequest for RepairsByDateRange {
    type Response = Vec<Repair>;
    const METHOD: HttpMethod = HttpMethod::Get;
    const PAYLOAD: Payload = Payload::list_of::<Repair>();

    fn path(&self) -> String {
        "/api/repairs/date-range".into()
    }

    fn query(&self) -> Vec<(&'static str, String)> {
        self.range.to_query()
    }
}

// =========================================================
// AI diagnosis
// =========================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct CheckHealth;

impl ApiRequest for CheckHealth {
    type Response = HealthStatus;
    const METHOD: HttpMethod = HttpMethod::Get;
    const AUTHENTICATED: bool = false;

    fn path(&self) -> String {
        "/api/diagnosis/health".into()
    }
}

impl ApiRequest for DiagnosisRequest {
    type Response = Diagnosis;
    const METHOD: HttpMethod = HttpMethod::Post;

    fn path(&self) -> String {
        "/api/diagnosis".into()
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GetQuickDiagnosis {
    pub message: String,
}

impl ApiRequest for GetQuickDiagnosis {
    type Response = Diagnosis;
    const METHOD: HttpMethod = HttpMethod::Post;

    fn path(&self) -> String {
        "/api/diagnosis/quick".into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_list_payloads_use_resource_field() {
        assert_eq!(<ListVehicles as ApiRequest>::PAYLOAD, Payload::List("vehicles"));
        assert_eq!(<GetLeads as ApiRequest>::PAYLOAD, Payload::List("leads"));
        assert_eq!(<GetMyProposals as ApiRequest>::PAYLOAD, Payload::List("proposals"));
        assert_eq!(<RepairReminders as ApiRequest>::PAYLOAD, Payload::List("reminders"));
        assert_eq!(<RepairsByDateRange as ApiRequest>::PAYLOAD, Payload::List(Repair::FIELD));
    }

    #[test]
    fn test_path_params_are_not_in_body() {
        let req = UpdateVehicle {
            id: "v-1".into(),
            patch: VehiclePatch {
                color: Some("Blue".into()),
                ..Default::default()
            },
        };
        assert_eq!(req.path(), "/api/vehicles/v-1");
        assert_eq!(req.body().unwrap(), Some(json!({ "color": "Blue" })));
    }

    #[test]
    fn test_get_requests_have_no_body() {
        let req = GetLeads { limit: 10 };
        assert_eq!(req.body().unwrap(), None);
        assert_eq!(req.query(), vec![("limit", "10".to_string())]);
    }

    #[test]
    fn test_unit_post_sends_no_body() {
        assert_eq!(Logout.body().unwrap(), None);
    }

    #[test]
    fn test_date_range_query() {
        let req = RepairsByDateRange {
            range: DateRange::parse("2024-01-01", "2024-03-31").unwrap(),
        };
        assert_eq!(
            req.query(),
            vec![("start", "2024-01-01".to_string()), ("end", "2024-03-31".to_string())]
        );
    }
}
