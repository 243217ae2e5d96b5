use crate::error::{ClientError, ClientResult};
use crate::request::{HttpClient, HttpRequest};
use crate::session::Session;
use repairhub_shared::HEADER_AUTHORIZATION;
use repairhub_shared::protocol::{ApiRequest, Payload};
use serde::Deserialize;
use serde_json::Value;
use std::rc::Rc;

// =========================================================
// 响应约定: { success, data?, error?/message? }
// =========================================================

#[derive(Deserialize)]
struct Envelope {
    success: bool,
    #[serde(default)]
    data: Option<Value>,
    #[serde(default)]
    error: Option<Value>,
    #[serde(default)]
    message: Option<Value>,
}

impl Envelope {
    fn failure_text(&self) -> Option<String> {
        self.error
            .as_ref()
            .and_then(text_of)
            .or_else(|| self.message.as_ref().and_then(text_of))
    }
}

/// 服务端错误字段可能是字符串，也可能是 `{ message }` 对象
fn text_of(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Object(map) => map.get("message").and_then(text_of),
        _ => None,
    }
}

/// 把 `data` 规整成 `Payload` 描述的形状
///
/// - `List(field)`: 裸数组，或以 `field` / `data` / `items` 包装的数组，统一成数组；`null` → 空数组
/// - `Single(field)`: 以 `field` 包装的对象会被解包
pub fn normalize_payload(payload: Payload, data: Option<Value>) -> ClientResult<Value> {
    let data = data.unwrap_or(Value::Null);
    match payload {
        Payload::Item => Ok(data),
        Payload::Single(field) => match data {
            Value::Object(mut map) if map.contains_key(field) => {
                Ok(map.remove(field).unwrap_or(Value::Null))
            }
            other => Ok(other),
        },
        Payload::List(field) => match data {
            Value::Array(_) => Ok(data),
            Value::Null => Ok(Value::Array(Vec::new())),
            Value::Object(mut map) => {
                let inner = [field, "data", "items"]
                    .iter()
                    .find_map(|key| map.remove(*key));
                match inner {
                    Some(Value::Array(items)) => Ok(Value::Array(items)),
                    Some(Value::Null) => Ok(Value::Array(Vec::new())),
                    _ => Err(ClientError::decode(format!(
                        "expected a list under '{}'",
                        field
                    ))),
                }
            }
            _ => Err(ClientError::decode(format!(
                "expected a list of {}",
                field
            ))),
        },
    }
}

// =========================================================
// 读路径结果
// =========================================================

/// 读路径的结果形状：失败也是一个值，不会中断并发的兄弟请求
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<ClientError>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn failed(error: ClientError) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error),
        }
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error.as_ref().map(|e| e.message())
    }

    pub fn into_result(self) -> ClientResult<T> {
        let success = self.success;
        match (self.data, self.error) {
            (Some(data), None) if success => Ok(data),
            (_, Some(err)) => Err(err),
            _ => Err(ClientError::decode("response carried no data")),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ApiResponse<U> {
        ApiResponse {
            success: self.success,
            data: self.data.map(f),
            error: self.error,
        }
    }
}

impl<T> From<ClientResult<T>> for ApiResponse<T> {
    fn from(result: ClientResult<T>) -> Self {
        match result {
            Ok(data) => ApiResponse::ok(data),
            Err(e) => ApiResponse::failed(e),
        }
    }
}

// =========================================================
// API 客户端
// =========================================================

/// 远端 API 的统一出口
///
/// 负责拼接 URL、附加 token、解析响应约定并规整数据形状。
/// 每次调用最多发起一次网络请求。
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    http: Rc<dyn HttpClient>,
    session: Session,
}

impl ApiClient {
    pub fn new(base_url: &str, http: impl HttpClient + 'static, session: Session) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http: Rc::new(http),
            session,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// 写路径：失败以 `Err` 返回，由调用方内联展示
    pub async fn send<R: ApiRequest>(&self, request: &R) -> ClientResult<R::Response> {
        let path = request.path();
        self.dispatch(request, &path)
            .await
            .map_err(|e| e.in_op_with("api.send", format!("{} {}", R::METHOD.as_str(), path)))
    }

    /// 读路径：失败折叠进 `ApiResponse`，并记录一条诊断日志
    pub async fn fetch<R: ApiRequest>(&self, request: &R) -> ApiResponse<R::Response> {
        let result = self.send(request).await;
        if let Err(e) = &result {
            tracing::warn!("read failed: {}", e);
        }
        ApiResponse::from(result)
    }

    async fn dispatch<R: ApiRequest>(&self, request: &R, path: &str) -> ClientResult<R::Response> {
        let url = format!("{}{}", self.base_url, path);
        let mut http_req = HttpRequest::new(&url, R::METHOD)
            .with_header("Accept", "application/json")
            .with_query(&request.query());

        if R::AUTHENTICATED {
            // 没有 token 就不发请求
            let token = self
                .session
                .token()
                .ok_or_else(|| ClientError::unauthenticated("Not signed in"))?;
            http_req = http_req.with_header(HEADER_AUTHORIZATION, &format!("Bearer {}", token));
        }

        if let Some(body) = request.body()? {
            http_req = http_req.with_json(body);
        }

        tracing::debug!("{} {}", R::METHOD.as_str(), http_req.url);
        let resp = self.http.send(http_req).await?;

        let envelope: Option<Envelope> = resp.json().ok();
        let server_text = envelope.as_ref().and_then(Envelope::failure_text);

        match resp.status {
            401 => {
                self.session.invalidate();
                return Err(ClientError::unauthenticated(
                    server_text.unwrap_or_else(|| "Session expired".to_string()),
                )
                .with_status(401));
            }
            403 => {
                return Err(ClientError::forbidden(
                    server_text.unwrap_or_else(|| "Access denied".to_string()),
                )
                .with_status(403));
            }
            status if !resp.is_success() => {
                return Err(ClientError::request(
                    server_text.unwrap_or_else(|| format!("Request failed with status {}", status)),
                )
                .with_status(status));
            }
            _ => {}
        }

        let envelope = envelope.ok_or_else(|| {
            ClientError::decode("response is not a { success, data } envelope")
                .with_status(resp.status)
        })?;

        if !envelope.success {
            return Err(ClientError::request(
                server_text.unwrap_or_else(|| "Request was not successful".to_string()),
            )
            .with_status(resp.status));
        }

        let data = normalize_payload(R::PAYLOAD, envelope.data)?;
        Ok(serde_json::from_value(data)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::request::{HttpMethod, MockHttpClient};
    use crate::session::MemoryTokenStore;
    use repairhub_shared::protocol::{CheckHealth, CurrentUser, GetMyShop, ListVehicles};
    use serde_json::json;
    use std::cell::Cell;

    const BASE: &str = "http://api.test";

    fn client_with_token(token: Option<&str>) -> (ApiClient, Rc<MockHttpClient>, Session) {
        let mock = Rc::new(MockHttpClient::new());
        let session = match token {
            Some(t) => Session::new(MemoryTokenStore::with_token(t)),
            None => Session::in_memory(),
        };
        let api = ApiClient::new(BASE, mock.clone(), session.clone());
        (api, mock, session)
    }

    fn vehicle(id: u32) -> Value {
        json!({ "id": id, "vin": "1HGCM82633A004352", "year": 2020, "make": "Honda", "model": "Civic" })
    }

    #[tokio::test]
    async fn test_attaches_bearer_token() {
        let (api, mock, _) = client_with_token(Some("abc"));
        mock.mock_ok(HttpMethod::Get, "http://api.test/api/vehicles", json!([vehicle(1)]));

        let vehicles = api.send(&ListVehicles).await.unwrap();
        assert_eq!(vehicles.len(), 1);
        assert_eq!(vehicles[0].id, "1");

        let sent = mock.last().unwrap();
        assert_eq!(sent.headers.get("Authorization").map(String::as_str), Some("Bearer abc"));
    }

    #[tokio::test]
    async fn test_no_token_means_no_request() {
        let (api, mock, _) = client_with_token(None);
        let err = api.send(&ListVehicles).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Unauthenticated);
        assert_eq!(mock.total(), 0);
    }

    #[tokio::test]
    async fn test_public_endpoint_without_token() {
        let (api, mock, _) = client_with_token(None);
        mock.mock_ok(HttpMethod::Get, "http://api.test/api/diagnosis/health", json!({ "status": "ok" }));

        let health = api.send(&CheckHealth).await.unwrap();
        assert!(health.is_available());
        assert!(mock.last().unwrap().headers.get("Authorization").is_none());
    }

    #[tokio::test]
    async fn test_wrapped_list_is_normalized() {
        let (api, mock, _) = client_with_token(Some("abc"));
        mock.mock_ok(
            HttpMethod::Get,
            "http://api.test/api/vehicles",
            json!({ "vehicles": [vehicle(1), vehicle(2)], "total": 2 }),
        );
        let vehicles = api.send(&ListVehicles).await.unwrap();
        assert_eq!(vehicles.iter().map(|v| v.id.as_str()).collect::<Vec<_>>(), ["1", "2"]);
    }

    #[tokio::test]
    async fn test_unauthorized_invalidates_session() {
        let (api, mock, session) = client_with_token(Some("dead"));
        let fired = Rc::new(Cell::new(false));
        let flag = fired.clone();
        session.on_invalidate(move || flag.set(true));
        mock.mock_response(
            HttpMethod::Get,
            "http://api.test/api/auth/me",
            401,
            json!({ "success": false, "error": "Invalid token" }),
        );

        let err = api.send(&CurrentUser).await.unwrap_err();
        assert!(err.is_auth_failure());
        assert_eq!(err.message(), "Invalid token");
        assert!(!session.has_session());
        assert!(fired.get());
    }

    #[tokio::test]
    async fn test_non_envelope_body_is_failure() {
        let (api, mock, _) = client_with_token(Some("abc"));
        mock.mock_response(HttpMethod::Get, "http://api.test/api/vehicles", 200, json!([vehicle(1)]));

        let err = api.send(&ListVehicles).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Decode);
    }

    #[tokio::test]
    async fn test_success_false_surfaces_message() {
        let (api, mock, _) = client_with_token(Some("abc"));
        mock.mock_response(
            HttpMethod::Get,
            "http://api.test/api/vehicles",
            200,
            json!({ "success": false, "message": "Database unavailable" }),
        );

        let resp = api.fetch(&ListVehicles).await;
        assert!(!resp.is_success());
        assert_eq!(resp.error_message(), Some("Database unavailable"));
    }

    #[tokio::test]
    async fn test_null_shop_is_none() {
        let (api, mock, _) = client_with_token(Some("abc"));
        mock.mock_ok(HttpMethod::Get, "http://api.test/api/shops/my-shop", Value::Null);
        assert_eq!(api.send(&GetMyShop).await.unwrap(), None);
    }

    #[test]
    fn test_normalize_payload_shapes() {
        let list = Payload::List("leads");
        assert_eq!(normalize_payload(list, None).unwrap(), json!([]));
        assert_eq!(
            normalize_payload(list, Some(json!({ "items": [1] }))).unwrap(),
            json!([1])
        );
        assert!(normalize_payload(list, Some(json!("nope"))).is_err());

        let single = Payload::Single("user");
        assert_eq!(
            normalize_payload(single, Some(json!({ "user": { "id": 1 } }))).unwrap(),
            json!({ "id": 1 })
        );
        assert_eq!(
            normalize_payload(single, Some(json!({ "id": 1 }))).unwrap(),
            json!({ "id": 1 })
        );
    }
}
