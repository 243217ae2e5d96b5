use super::{Submission, ViewCell, ViewController};
use crate::RepairHub;
use crate::error::ClientResult;
use crate::gate::Access;
use chrono::{DateTime, Utc};
use repairhub_shared::{Diagnosis, Vehicle, VehicleInfo};
use uuid::Uuid;

const GREETING: &str =
    "Hi! Describe what your car is doing and I'll suggest likely causes and next steps.";
const FAILURE_TEXT: &str = "Sorry, I couldn't analyze that right now. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatRole {
    User,
    Assistant,
    /// 内联的错误提示
    System,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChatMessage {
    pub id: Uuid,
    pub role: ChatRole,
    pub text: String,
    pub diagnosis: Option<Diagnosis>,
    pub sent_at: DateTime<Utc>,
}

impl ChatMessage {
    fn new(role: ChatRole, text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            role,
            text: text.into(),
            diagnosis: None,
            sent_at: Utc::now(),
        }
    }

    fn assistant(diagnosis: Diagnosis) -> Self {
        Self {
            diagnosis: Some(diagnosis.clone()),
            ..Self::new(ChatRole::Assistant, diagnosis.response)
        }
    }
}

/// `Full` 会附带所选车辆信息，`Quick` 只发送文字
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DiagnosisMode {
    #[default]
    Full,
    Quick,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DiagnosisState {
    /// `None` 表示仍在检查服务状态
    pub available: Option<bool>,
    pub vehicles: Vec<Vehicle>,
    pub selected_vehicle: Option<String>,
    pub mode: DiagnosisMode,
    pub messages: Vec<ChatMessage>,
    pub submission: Submission,
}

impl Default for DiagnosisState {
    fn default() -> Self {
        Self {
            available: None,
            vehicles: Vec::new(),
            selected_vehicle: None,
            mode: DiagnosisMode::default(),
            messages: vec![ChatMessage::new(ChatRole::Assistant, GREETING)],
            submission: Submission::default(),
        }
    }
}

impl DiagnosisState {
    pub fn selected(&self) -> Option<&Vehicle> {
        let id = self.selected_vehicle.as_deref()?;
        self.vehicles.iter().find(|v| v.id == id)
    }
}

/// AI 诊断对话页
#[derive(Clone)]
pub struct DiagnosisController {
    hub: RepairHub,
    cell: ViewCell<DiagnosisState>,
}

impl ViewController for DiagnosisController {
    type State = DiagnosisState;

    fn cell(&self) -> &ViewCell<DiagnosisState> {
        &self.cell
    }
}

impl DiagnosisController {
    pub fn new(hub: &RepairHub, _access: &Access) -> Self {
        Self {
            hub: hub.clone(),
            cell: ViewCell::new(DiagnosisState::default()),
        }
    }

    /// 服务状态与车辆列表并发读取；默认选中主车辆
    pub async fn load(&self) -> bool {
        if !self.cell.claim_first_load() {
            return false;
        }
        let services = &self.hub.services;
        let (health, vehicles) =
            futures::join!(services.diagnosis.check_health(), services.vehicles.list());

        self.cell.apply(|s| {
            s.available = Some(health.data.is_some_and(|h| h.is_available()));
            s.vehicles = vehicles.data.unwrap_or_default();
            s.selected_vehicle = s
                .vehicles
                .iter()
                .find(|v| v.is_primary)
                .or_else(|| s.vehicles.first())
                .map(|v| v.id.clone());
        })
    }

    pub fn select_vehicle(&self, id: Option<&str>) {
        self.cell
            .apply(|s| s.selected_vehicle = id.map(str::to_string));
    }

    pub fn set_mode(&self, mode: DiagnosisMode) {
        self.cell.apply(|s| s.mode = mode);
    }

    /// 空消息直接忽略；一次只处理一条
    pub async fn send(&self, message: &str) -> bool {
        let text = message.trim().to_string();
        if text.is_empty() {
            return false;
        }

        let prepared = self.cell.update(|s| -> ClientResult<(DiagnosisMode, Option<VehicleInfo>)> {
            s.submission.begin()?;
            s.messages.push(ChatMessage::new(ChatRole::User, text.clone()));
            Ok((s.mode, s.selected().map(Vehicle::to_vehicle_info)))
        });
        let (mode, vehicle_info) = match prepared {
            Some(Ok(prepared)) => prepared,
            Some(Err(e)) => {
                tracing::debug!("diagnosis skipped: {}", e);
                return false;
            }
            None => return false,
        };

        let diagnosis = &self.hub.services.diagnosis;
        let result = match mode {
            DiagnosisMode::Full => diagnosis.get_diagnosis(&text, vehicle_info).await,
            DiagnosisMode::Quick => diagnosis.get_quick_diagnosis(&text).await,
        };

        match result {
            Ok(reply) => self.cell.apply(|s| {
                s.messages.push(ChatMessage::assistant(reply));
                s.submission.submitting = false;
            }),
            Err(e) => {
                tracing::error!("diagnosis failed: {}", e);
                self.cell.apply(|s| {
                    s.messages.push(ChatMessage::new(ChatRole::System, FAILURE_TEXT));
                    s.submission.fail(e);
                });
                false
            }
        }
    }

    /// 清空对话，只保留问候语
    pub fn clear(&self) {
        self.cell.apply(|s| {
            s.messages = vec![ChatMessage::new(ChatRole::Assistant, GREETING)];
            s.submission.error = None;
        });
    }
}
