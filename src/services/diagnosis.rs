use crate::api::{ApiClient, ApiResponse};
use crate::error::ClientResult;
use repairhub_shared::protocol::{CheckHealth, GetQuickDiagnosis};
use repairhub_shared::{Diagnosis, DiagnosisRequest, HealthStatus, VehicleInfo};

#[derive(Clone)]
pub struct DiagnosisService {
    api: ApiClient,
}

impl DiagnosisService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn check_health(&self) -> ApiResponse<HealthStatus> {
        self.api.fetch(&CheckHealth).await
    }

    /// 车辆信息仅在提供时才出现在请求体中
    pub async fn get_diagnosis(
        &self,
        message: &str,
        vehicle_info: Option<VehicleInfo>,
    ) -> ClientResult<Diagnosis> {
        let request = DiagnosisRequest {
            message: message.to_string(),
            vehicle_info,
        };
        self.api
            .send(&request)
            .await
            .map_err(|e| e.in_op("diagnosis.full"))
    }

    pub async fn get_quick_diagnosis(&self, message: &str) -> ClientResult<Diagnosis> {
        let request = GetQuickDiagnosis {
            message: message.to_string(),
        };
        self.api
            .send(&request)
            .await
            .map_err(|e| e.in_op("diagnosis.quick"))
    }
}

#[cfg(test)]
mod tests {
    use crate::request::HttpMethod;
    use crate::services::testing::{mock_services, url};
    use repairhub_shared::VehicleInfo;
    use serde_json::json;

    #[tokio::test]
    async fn test_vehicle_fields_only_when_given() {
        let (services, mock) = mock_services(Some("t"));
        mock.mock_ok(HttpMethod::Post, &url("/api/diagnosis"), json!({ "response": "Check pads" }));

        services.diagnosis.get_diagnosis("noise", None).await.unwrap();
        assert_eq!(mock.last().unwrap().body, Some(json!({ "message": "noise" })));

        let info = VehicleInfo {
            make: "Honda".into(),
            model: "Civic".into(),
            year: 2020,
            mileage: None,
        };
        let diagnosis = services.diagnosis.get_diagnosis("noise", Some(info)).await.unwrap();
        assert_eq!(diagnosis.response, "Check pads");
        assert_eq!(
            mock.last().unwrap().body,
            Some(json!({ "message": "noise", "vehicle_info": { "make": "Honda", "model": "Civic", "year": 2020 } }))
        );
    }
}
