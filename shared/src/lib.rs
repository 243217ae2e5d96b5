//! RepairHub 共享领域模型
//!
//! 前端与客户端核心共用的数据结构。所有模型都以服务端 JSON 为准，
//! 并通过 `serde_helper` 容忍字段编码上的差异。

pub mod date;
pub mod protocol;
pub mod serde_helper;

use serde::{Deserialize, Serialize};
use std::fmt;
use validator::Validate;

// =========================================================
// 常量定义 (Constants)
// =========================================================

pub const HEADER_AUTHORIZATION: &str = "Authorization";
pub const VIN_LENGTH: usize = 17;
pub const MIN_PROPOSAL_MESSAGE_LEN: usize = 20;

// =========================================================
// 通用 Trait
// =========================================================

/// 由服务端分配主键的实体
pub trait Entity {
    fn id(&self) -> &str;
}

/// 列表型资源
///
/// 服务端可能直接返回数组，也可能把数组包在一个以资源名命名的字段里，
/// 例如 `{ "vehicles": [...] }`。`FIELD` 即该字段名。
pub trait ListResource: Entity {
    const FIELD: &'static str;
}

// =========================================================
// 用户与角色 (User & Role)
// =========================================================

/// 用户角色
///
/// 服务端可能返回纯字符串 `"car_owner"`，也可能返回 `{ "name": "car_owner" }`。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", try_from = "RoleRepr")]
pub enum Role {
    CarOwner,
    ShopOwner,
    InsuranceCompany,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RoleRepr {
    Name(String),
    Object {
        #[serde(alias = "role_name", alias = "slug")]
        name: String,
    },
}

impl TryFrom<RoleRepr> for Role {
    type Error = String;

    fn try_from(repr: RoleRepr) -> Result<Self, Self::Error> {
        let raw = match repr {
            RoleRepr::Name(name) => name,
            RoleRepr::Object { name } => name,
        };
        Role::parse(&raw).ok_or_else(|| format!("unknown role: {}", raw))
    }
}

impl Role {
    pub const ALL: [Role; 3] = [Role::CarOwner, Role::ShopOwner, Role::InsuranceCompany];

    /// 宽松解析，忽略大小写以及 `-`/空格 分隔符
    pub fn parse(raw: &str) -> Option<Self> {
        let normalized = raw.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        match normalized.as_str() {
            "car_owner" => Some(Role::CarOwner),
            "shop_owner" => Some(Role::ShopOwner),
            "insurance_company" => Some(Role::InsuranceCompany),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::CarOwner => "car_owner",
            Role::ShopOwner => "shop_owner",
            Role::InsuranceCompany => "insurance_company",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Role::CarOwner => "Car Owner",
            Role::ShopOwner => "Repair Shop",
            Role::InsuranceCompany => "Insurance Company",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(deserialize_with = "serde_helper::id")]
    pub id: String,
    #[serde(default, alias = "full_name")]
    pub name: String,
    pub email: String,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zip_code: Option<String>,
}

impl Entity for User {
    fn id(&self) -> &str {
        &self.id
    }
}

// =========================================================
// 认证 (Auth)
// =========================================================

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct Credentials {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignupProfile {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

/// 登录/注册成功后返回的会话
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthSession {
    #[serde(alias = "access_token")]
    pub token: String,
    pub user: User,
}

// =========================================================
// 车辆 (Vehicle)
// =========================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    #[serde(deserialize_with = "serde_helper::id")]
    pub id: String,
    pub vin: String,
    pub year: i32,
    pub make: String,
    pub model: String,
    #[serde(default)]
    pub trim: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub license_plate: Option<String>,
    #[serde(default, deserialize_with = "serde_helper::opt_count")]
    pub mileage: Option<u64>,
    #[serde(default, alias = "primary")]
    pub is_primary: bool,
    #[serde(default, deserialize_with = "serde_helper::count")]
    pub repair_count: u32,
    #[serde(default, deserialize_with = "serde_helper::number")]
    pub total_repair_cost: f64,
    #[serde(default)]
    pub last_service_date: Option<String>,
}

impl Vehicle {
    /// 例如 "2020 Honda Civic"
    pub fn display_name(&self) -> String {
        format!("{} {} {}", self.year, self.make, self.model)
    }

    pub fn to_vehicle_info(&self) -> VehicleInfo {
        VehicleInfo {
            make: self.make.clone(),
            model: self.model.clone(),
            year: self.year,
            mileage: self.mileage,
        }
    }
}

impl Entity for Vehicle {
    fn id(&self) -> &str {
        &self.id
    }
}

impl ListResource for Vehicle {
    const FIELD: &'static str = "vehicles";
}

/// 新建车辆的请求体
///
/// 年份上限随当前日期变化，由调用方另行检查。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct VehicleDraft {
    #[validate(length(equal = 17))]
    pub vin: String,
    #[validate(range(min = 1900))]
    pub year: i32,
    #[validate(length(min = 1))]
    pub make: String,
    #[validate(length(min = 1))]
    pub model: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trim: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license_plate: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mileage: Option<u64>,
    #[serde(default)]
    pub is_primary: bool,
}

/// 车辆可编辑字段，`None` 字段不会出现在请求体中
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VehiclePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mileage: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license_plate: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trim: Option<String>,
}

impl VehiclePatch {
    pub fn is_empty(&self) -> bool {
        self.mileage.is_none()
            && self.color.is_none()
            && self.license_plate.is_none()
            && self.trim.is_none()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VehicleStats {
    #[serde(default, alias = "total_repairs", deserialize_with = "serde_helper::count")]
    pub repair_count: u32,
    #[serde(default, deserialize_with = "serde_helper::number")]
    pub total_cost: f64,
    #[serde(default, deserialize_with = "serde_helper::number")]
    pub average_cost: f64,
    #[serde(default)]
    pub last_service_date: Option<String>,
}

// =========================================================
// 维修记录 (Repair)
// =========================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Repair {
    #[serde(deserialize_with = "serde_helper::id")]
    pub id: String,
    #[serde(deserialize_with = "serde_helper::id")]
    pub vehicle_id: String,
    pub service_type: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "serde_helper::number")]
    pub cost: f64,
    pub service_date: String,
    #[serde(default, alias = "mileage_at_service", deserialize_with = "serde_helper::opt_count")]
    pub mileage: Option<u64>,
    #[serde(default, deserialize_with = "serde_helper::null_as_default")]
    pub parts: Vec<String>,
    #[serde(default, deserialize_with = "serde_helper::opt_id")]
    pub shop_id: Option<String>,
    #[serde(default)]
    pub shop_name: Option<String>,
    #[serde(default, alias = "insurance_claim_id")]
    pub insurance_claim: Option<String>,
    #[serde(default, deserialize_with = "serde_helper::null_as_default")]
    pub photos: Vec<String>,
    #[serde(default)]
    pub invoice_url: Option<String>,
}

impl Entity for Repair {
    fn id(&self) -> &str {
        &self.id
    }
}

impl ListResource for Repair {
    const FIELD: &'static str = "repairs";
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RepairPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mileage: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parts: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RepairStats {
    #[serde(default, alias = "repair_count", deserialize_with = "serde_helper::count")]
    pub total_repairs: u32,
    #[serde(default, deserialize_with = "serde_helper::number")]
    pub total_cost: f64,
    #[serde(default, deserialize_with = "serde_helper::number")]
    pub average_cost: f64,
    #[serde(default, deserialize_with = "serde_helper::number")]
    pub this_year_cost: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceReminder {
    #[serde(default, deserialize_with = "serde_helper::opt_id")]
    pub vehicle_id: Option<String>,
    #[serde(default)]
    pub vehicle_name: Option<String>,
    pub service_type: String,
    #[serde(default)]
    pub due_date: Option<String>,
    #[serde(default, deserialize_with = "serde_helper::opt_count")]
    pub due_mileage: Option<u64>,
    #[serde(default)]
    pub message: Option<String>,
}

impl Entity for ServiceReminder {
    fn id(&self) -> &str {
        self.vehicle_id.as_deref().unwrap_or(&self.service_type)
    }
}

impl ListResource for ServiceReminder {
    const FIELD: &'static str = "reminders";
}

// =========================================================
// 维修需求与报价 (Lead & Proposal)
// =========================================================

/// 需求紧急程度，仅用于筛选与配色，不参与排序
///
/// 未知取值按 `normal` 处理。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum Urgency {
    Urgent,
    High,
    #[default]
    Normal,
    Low,
}

impl From<String> for Urgency {
    fn from(raw: String) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "urgent" | "critical" => Urgency::Urgent,
            "high" => Urgency::High,
            "low" => Urgency::Low,
            _ => Urgency::Normal,
        }
    }
}

impl Urgency {
    pub const ALL: [Urgency; 4] = [Urgency::Urgent, Urgency::High, Urgency::Normal, Urgency::Low];

    pub fn as_str(&self) -> &'static str {
        match self {
            Urgency::Urgent => "urgent",
            Urgency::High => "high",
            Urgency::Normal => "normal",
            Urgency::Low => "low",
        }
    }

    /// 徽章样式
    pub fn badge(&self) -> &'static str {
        match self {
            Urgency::Urgent => "badge badge-error",
            Urgency::High => "badge badge-warning",
            Urgency::Normal => "badge badge-info",
            Urgency::Low => "badge badge-ghost",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeadStatus {
    #[default]
    Open,
    InProgress,
    Completed,
    Cancelled,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepairLead {
    #[serde(deserialize_with = "serde_helper::id")]
    pub id: String,
    #[serde(default, alias = "service_type")]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, deserialize_with = "serde_helper::null_as_default")]
    pub urgency: Urgency,
    #[serde(default, deserialize_with = "serde_helper::null_as_default")]
    pub status: LeadStatus,
    #[serde(default)]
    pub vehicle: Option<VehicleInfo>,
    #[serde(default, deserialize_with = "serde_helper::null_as_default")]
    pub images: Vec<String>,
    #[serde(default, alias = "proposals_count", deserialize_with = "serde_helper::count")]
    pub proposal_count: u32,
    #[serde(default, deserialize_with = "serde_helper::null_as_default")]
    pub proposals: Vec<Proposal>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl RepairLead {
    /// 已被接受的报价（每个需求最多一个）
    pub fn accepted_proposal(&self) -> Option<&Proposal> {
        self.proposals
            .iter()
            .find(|p| p.status == ProposalStatus::Accepted)
    }
}

impl Entity for RepairLead {
    fn id(&self) -> &str {
        &self.id
    }
}

impl ListResource for RepairLead {
    const FIELD: &'static str = "leads";
}

/// 报价状态：`pending` → `accepted` | `rejected`，结束后不可再变
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProposalStatus {
    #[default]
    Pending,
    Accepted,
    Rejected,
}

impl ProposalStatus {
    pub const ALL: [ProposalStatus; 3] = [
        ProposalStatus::Pending,
        ProposalStatus::Accepted,
        ProposalStatus::Rejected,
    ];

    pub fn is_terminal(&self) -> bool {
        !matches!(self, ProposalStatus::Pending)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ProposalStatus::Pending => "pending",
            ProposalStatus::Accepted => "accepted",
            ProposalStatus::Rejected => "rejected",
        }
    }

    /// 徽章样式
    pub fn badge(&self) -> &'static str {
        match self {
            ProposalStatus::Pending => "badge badge-warning",
            ProposalStatus::Accepted => "badge badge-success",
            ProposalStatus::Rejected => "badge badge-ghost",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Proposal {
    #[serde(deserialize_with = "serde_helper::id")]
    pub id: String,
    #[serde(alias = "repair_lead_id", deserialize_with = "serde_helper::id")]
    pub lead_id: String,
    #[serde(default, deserialize_with = "serde_helper::opt_id")]
    pub shop_id: Option<String>,
    #[serde(default)]
    pub shop_name: Option<String>,
    #[serde(default, deserialize_with = "serde_helper::null_as_default")]
    pub status: ProposalStatus,
    #[serde(default)]
    pub message: String,
    #[serde(default, deserialize_with = "serde_helper::number")]
    pub estimated_cost: f64,
    #[serde(default, deserialize_with = "serde_helper::opt_text")]
    pub estimated_duration: Option<String>,
    #[serde(default, deserialize_with = "serde_helper::opt_text")]
    pub warranty: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl Entity for Proposal {
    fn id(&self) -> &str {
        &self.id
    }
}

impl ListResource for Proposal {
    const FIELD: &'static str = "proposals";
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct ProposalDraft {
    #[validate(length(min = 1))]
    pub lead_id: String,
    #[validate(length(min = 20))]
    pub message: String,
    #[validate(range(min = 0.0))]
    pub estimated_cost: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_duration: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warranty: Option<String>,
}

// =========================================================
// 维修店 (Shop)
// =========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerificationStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shop {
    #[serde(deserialize_with = "serde_helper::id")]
    pub id: String,
    #[serde(default, deserialize_with = "serde_helper::opt_id")]
    pub owner_id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, alias = "specialties", deserialize_with = "serde_helper::null_as_default")]
    pub specialities: Vec<String>,
    #[serde(default, deserialize_with = "serde_helper::null_as_default")]
    pub verification_status: VerificationStatus,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl Entity for Shop {
    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShopDraft {
    pub name: String,
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub specialities: Vec<String>,
}

// =========================================================
// AI 诊断 (Diagnosis)
// =========================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleInfo {
    #[serde(default)]
    pub make: String,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub year: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mileage: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagnosisRequest {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vehicle_info: Option<VehicleInfo>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnosis {
    #[serde(alias = "diagnosis", alias = "reply")]
    pub response: String,
    #[serde(default, deserialize_with = "serde_helper::null_as_default")]
    pub possible_causes: Vec<String>,
    #[serde(default, deserialize_with = "serde_helper::null_as_default")]
    pub recommended_actions: Vec<String>,
    #[serde(default, deserialize_with = "serde_helper::opt_text")]
    pub estimated_cost: Option<String>,
    #[serde(default)]
    pub urgency: Option<Urgency>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub available: Option<bool>,
}

impl HealthStatus {
    pub fn is_available(&self) -> bool {
        self.available
            .unwrap_or_else(|| matches!(self.status.as_str(), "ok" | "healthy" | "up"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_role_accepts_string_and_object() {
        let plain: Role = serde_json::from_value(json!("shop_owner")).unwrap();
        let wrapped: Role = serde_json::from_value(json!({ "name": "shop_owner" })).unwrap();
        assert_eq!(plain, Role::ShopOwner);
        assert_eq!(wrapped, Role::ShopOwner);
        assert_eq!(serde_json::to_value(plain).unwrap(), json!("shop_owner"));
        assert!(serde_json::from_value::<Role>(json!("mechanic")).is_err());
    }

    #[test]
    fn test_unknown_urgency_falls_back_to_normal() {
        let lead: RepairLead = serde_json::from_value(json!({
            "id": 7,
            "title": "Brake noise",
            "urgency": "whenever",
            "proposals_count": 2
        }))
        .unwrap();
        assert_eq!(lead.urgency, Urgency::Normal);
        assert_eq!(lead.proposal_count, 2);
        assert!(lead.accepted_proposal().is_none());
    }

    #[test]
    fn test_vehicle_patch_omits_unset_fields() {
        let patch = VehiclePatch {
            mileage: Some(52000),
            ..Default::default()
        };
        assert_eq!(serde_json::to_value(&patch).unwrap(), json!({ "mileage": 52000 }));
    }

    #[test]
    fn test_health_status() {
        let ok: HealthStatus = serde_json::from_value(json!({ "status": "ok" })).unwrap();
        let down: HealthStatus =
            serde_json::from_value(json!({ "status": "ok", "available": false })).unwrap();
        assert!(ok.is_available());
        assert!(!down.is_available());
    }

    #[test]
    fn test_draft_rules_follow_constants() {
        let vehicle = VehicleDraft {
            vin: "V".repeat(VIN_LENGTH),
            year: 2020,
            make: "Honda".into(),
            model: "Civic".into(),
            ..Default::default()
        };
        assert!(vehicle.validate().is_ok());
        let short_vin = VehicleDraft {
            vin: "V".repeat(VIN_LENGTH - 1),
            ..vehicle
        };
        assert!(short_vin.validate().is_err());

        let proposal = ProposalDraft {
            lead_id: "3".into(),
            message: "m".repeat(MIN_PROPOSAL_MESSAGE_LEN),
            estimated_cost: 0.0,
            ..Default::default()
        };
        assert!(proposal.validate().is_ok());
        let short = ProposalDraft {
            message: "m".repeat(MIN_PROPOSAL_MESSAGE_LEN - 1),
            ..proposal
        };
        assert!(short.validate().is_err());
    }

    #[test]
    fn test_credentials_reject_malformed_email() {
        for email in ["a@b..c", "\"@b.c", "a@-b.c", "a@b_c.d", "@b.co", "a b@c.io"] {
            let credentials = Credentials {
                email: email.into(),
                password: "pw".into(),
            };
            assert!(credentials.validate().is_err(), "{} should be rejected", email);
        }
        let ok = Credentials {
            email: "dana@example.com".into(),
            password: "pw".into(),
        };
        assert!(ok.validate().is_ok());
    }
}
