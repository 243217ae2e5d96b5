//! 通过真实 HTTP (reqwest) 对接模拟服务端的集成测试
//!
//! 使用 wiremock 模拟 RepairHub API，验证请求头、响应约定解析与会话失效处理。

use repairhub::RepairHub;
use repairhub::config::{ClientConfig, ENV_API_URL, ENV_TIMEOUT_SECS};
use repairhub::controller::{LeadsController, UrgencyFilter};
use repairhub::error::ErrorKind;
use repairhub::gate::{AccessGate, GateState};
use repairhub::route::AppRoute;
use repairhub::session::MemoryTokenStore;
use repairhub::shared::{Role, Urgency};
use serde_json::json;
use std::cell::Cell;
use std::rc::Rc;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ============================================================================
// Helper Functions
// ============================================================================

fn hub_for(server: &MockServer, token: Option<&str>) -> RepairHub {
    let config = ClientConfig::default().with_api_base_url(server.uri());
    let store = match token {
        Some(t) => MemoryTokenStore::with_token(t),
        None => MemoryTokenStore::new(),
    };
    RepairHub::with_reqwest(config, store)
}

async fn mount_me(server: &MockServer, role: &str) {
    Mock::given(method("GET"))
        .and(path("/api/auth/me"))
        .and(header("Authorization", "Bearer abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": { "user": { "id": 4, "name": "Pat", "email": "pat@example.com", "role": role } }
        })))
        .mount(server)
        .await;
}

// ============================================================================
// Envelope & auth header
// ============================================================================

#[tokio::test]
async fn test_bearer_token_and_wrapped_list() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/vehicles"))
        .and(header("Authorization", "Bearer abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": { "vehicles": [
                { "id": 1, "vin": "1HGCM82633A004352", "year": 2020, "make": "Honda", "model": "Civic", "is_primary": true }
            ] }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let hub = hub_for(&server, Some("abc123"));
    let resp = hub.services.vehicles.list().await;

    assert!(resp.is_success());
    let vehicles = resp.data.unwrap();
    assert_eq!(vehicles.len(), 1);
    assert_eq!(vehicles[0].id, "1");
    assert_eq!(vehicles[0].display_name(), "2020 Honda Civic");
}

#[tokio::test]
async fn test_login_stores_token_and_sends_credentials() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .and(body_json(json!({ "email": "pat@example.com", "password": "hunter22" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": {
                "token": "abc123",
                "user": { "id": 4, "name": "Pat", "email": "pat@example.com", "role": "car_owner" }
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let hub = hub_for(&server, None);
    let user = hub.services.auth.login("  pat@example.com ", "hunter22").await.unwrap();

    assert_eq!(user.role, Role::CarOwner);
    assert_eq!(hub.session().token().as_deref(), Some("abc123"));
}

#[tokio::test]
async fn test_unsuccessful_envelope_surfaces_server_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "success": false,
            "error": { "message": "Invalid email or password" }
        })))
        .mount(&server)
        .await;

    let hub = hub_for(&server, None);
    let err = hub.services.auth.login("pat@example.com", "wrong").await.unwrap_err();

    assert_eq!(err.kind, ErrorKind::Request);
    assert_eq!(err.status(), Some(400));
    assert_eq!(err.message(), "Invalid email or password");
    assert!(!hub.session().has_session());
}

#[tokio::test]
async fn test_plain_text_body_is_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/repairs/stats"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let hub = hub_for(&server, Some("abc123"));
    let resp = hub.services.repairs.stats().await;

    assert!(!resp.is_success());
    assert_eq!(resp.error.map(|e| e.kind), Some(ErrorKind::Decode));
}

// ============================================================================
// Session invalidation
// ============================================================================

#[tokio::test]
async fn test_unauthorized_response_invalidates_session() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/vehicles"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "success": false,
            "error": "Token expired"
        })))
        .mount(&server)
        .await;

    let hub = hub_for(&server, Some("abc123"));
    let fired = Rc::new(Cell::new(0));
    let counter = fired.clone();
    hub.session().on_invalidate(move || counter.set(counter.get() + 1));

    let resp = hub.services.vehicles.list().await;

    assert_eq!(resp.error.as_ref().map(|e| e.kind), Some(ErrorKind::Unauthenticated));
    assert_eq!(hub.session().token(), None);
    assert_eq!(fired.get(), 1);
}

#[tokio::test]
async fn test_no_token_means_no_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/vehicles"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true, "data": [] })))
        .expect(0)
        .mount(&server)
        .await;

    let hub = hub_for(&server, None);
    let resp = hub.services.vehicles.list().await;
    assert_eq!(resp.error.map(|e| e.kind), Some(ErrorKind::Unauthenticated));
}

// ============================================================================
// Gate → controller
// ============================================================================

#[tokio::test]
async fn test_gate_admits_shop_owner_into_leads() {
    let server = MockServer::start().await;
    mount_me(&server, "shop_owner").await;
    Mock::given(method("GET"))
        .and(path("/api/shops/my-shop"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": { "shop": { "id": 3, "name": "Acme Auto", "address": "1 Main St" } }
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/shops/leads"))
        .and(query_param("limit", "20"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": [
                { "id": 1, "title": "Brakes", "urgency": "urgent" },
                { "id": 2, "title": "Oil leak", "urgency": "low" }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/shops/proposals"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": { "proposals": [] }
        })))
        .mount(&server)
        .await;

    let hub = hub_for(&server, Some("abc123"));
    let gate = AccessGate::for_route(&AppRoute::Leads);
    let state = gate.run(&hub.services.auth).await;
    let access = state.access().unwrap();
    assert_eq!(access.role(), Role::ShopOwner);

    let leads = LeadsController::new(&hub, access);
    assert!(leads.load().await);
    leads.set_filter(UrgencyFilter::Only(Urgency::Low));
    let shown: Vec<String> = leads.filtered_leads().into_iter().map(|l| l.title).collect();
    assert_eq!(shown, ["Oil leak"]);
}

#[tokio::test]
async fn test_gate_redirects_wrong_role_before_any_page_fetch() {
    let server = MockServer::start().await;
    mount_me(&server, "shop_owner").await;
    Mock::given(method("GET"))
        .and(path("/api/vehicles"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true, "data": [] })))
        .expect(0)
        .mount(&server)
        .await;

    let hub = hub_for(&server, Some("abc123"));
    let gate = AccessGate::for_route(&AppRoute::Vehicles);
    let state = gate.run(&hub.services.auth).await;

    assert_eq!(state, GateState::Redirected(AppRoute::Dashboard));
    assert!(state.access().is_none());
    // 第二次运行不会重新请求用户信息
    assert_eq!(gate.run(&hub.services.auth).await, state);
}

// ============================================================================
// Configuration
// ============================================================================

#[tokio::test]
async fn test_hub_from_environment() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/vehicles"))
        .and(header("Authorization", "Bearer abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true, "data": [] })))
        .expect(1)
        .mount(&server)
        .await;

    // 本测试是唯一读取进程环境变量的地方
    unsafe {
        std::env::set_var(ENV_API_URL, format!("{}/", server.uri()));
        std::env::set_var(ENV_TIMEOUT_SECS, "5");
    }
    let config = ClientConfig::from_env();
    assert_eq!(config.api_base_url(), server.uri());
    assert_eq!(config.request_timeout(), Some(std::time::Duration::from_secs(5)));

    let hub = RepairHub::with_reqwest(config, MemoryTokenStore::with_token("abc123"));
    let resp = hub.services.vehicles.list().await;
    assert!(resp.is_success());
    assert_eq!(resp.data.map(|v| v.len()), Some(0));
}
