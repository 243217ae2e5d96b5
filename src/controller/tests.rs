use super::*;
use crate::error::ErrorKind;
use crate::gate::{AccessGate, GateState};
use crate::request::HttpMethod;
use crate::route::AppRoute;
use crate::testing::{access, hub, url};
use crate::view::ListView;
use repairhub_shared::{ProposalDraft, Role, ShopDraft, Urgency, VehicleDraft, VehiclePatch};
use serde_json::{Value, json};

// =========================================================
// Fixtures
// =========================================================

const LEADS_URL: &str = "/api/shops/leads?limit=20";

fn vehicle_json(id: u32, make: &str, model: &str, primary: bool) -> Value {
    json!({
        "id": id,
        "vin": format!("1HGCM82633A00435{}", id % 10),
        "year": 2020,
        "make": make,
        "model": model,
        "trim": "EX",
        "color": "Silver",
        "license_plate": "ABC-123",
        "mileage": 30000,
        "is_primary": primary,
        "repair_count": 2,
        "total_repair_cost": "480.00"
    })
}

fn lead_json(id: u32, urgency: &str, proposals: u32) -> Value {
    json!({
        "id": id,
        "title": format!("Lead {}", id),
        "description": "Grinding noise when braking",
        "urgency": urgency,
        "status": "open",
        "images": ["a.jpg", "b.jpg"],
        "proposal_count": proposals
    })
}

fn shop_json() -> Value {
    json!({ "id": 8, "name": "Acme Auto", "address": "1 Main St", "verification_status": "approved" })
}

fn mock_shop_with_leads(mock: &crate::request::MockHttpClient) {
    mock.mock_ok(HttpMethod::Get, &url("/api/shops/my-shop"), json!({ "shop": shop_json() }));
    mock.mock_ok(
        HttpMethod::Get,
        &url(LEADS_URL),
        json!({ "leads": [lead_json(1, "urgent", 0), lead_json(2, "low", 3), lead_json(3, "urgent", 1)] }),
    );
    mock.mock_ok(HttpMethod::Get, &url("/api/shops/proposals"), json!([]));
}

fn valid_proposal(lead_id: &str) -> ProposalDraft {
    ProposalDraft {
        lead_id: lead_id.into(),
        message: "Replace front pads and resurface rotors".into(),
        estimated_cost: 240.0,
        estimated_duration: Some("2 hours".into()),
        warranty: Some("12 months".into()),
    }
}

// =========================================================
// Access gate + restricted fetches
// =========================================================

#[tokio::test]
async fn test_mismatched_role_never_reaches_restricted_endpoint() {
    let (hub, mock) = hub();
    mock.mock_ok(
        HttpMethod::Get,
        &url("/api/auth/me"),
        json!({ "id": 1, "name": "Dana", "email": "dana@example.com", "role": "car_owner" }),
    );
    mock_shop_with_leads(&mock);

    let gate = AccessGate::for_route(&AppRoute::Leads);
    let state = gate.run(&hub.services.auth).await;

    assert_eq!(state, GateState::Redirected(AppRoute::Dashboard));
    assert!(state.access().is_none());
    assert_eq!(mock.total(), 1);
    assert_eq!(mock.count(HttpMethod::Get, &url("/api/shops")), 0);
}

#[tokio::test]
async fn test_matching_role_proceeds_to_page_fetch() {
    let (hub, mock) = hub();
    mock.mock_ok(
        HttpMethod::Get,
        &url("/api/auth/me"),
        json!({ "id": 2, "name": "Sam", "email": "sam@acme.io", "role": { "name": "shop_owner" } }),
    );
    mock_shop_with_leads(&mock);

    let gate = AccessGate::for_route(&AppRoute::Leads);
    let state = gate.run(&hub.services.auth).await;
    let access = state.access().expect("gate should admit shop owner");

    let leads = LeadsController::new(&hub, access);
    assert!(leads.load().await);
    assert_eq!(leads.state().leads.entities.len(), 3);
}

// =========================================================
// Leads & proposals
// =========================================================

#[tokio::test]
async fn test_urgency_filter_is_exact() {
    let (hub, mock) = hub();
    mock_shop_with_leads(&mock);
    let controller = LeadsController::new(&hub, &access(Role::ShopOwner));
    controller.load().await;

    assert_eq!(controller.filtered_leads().len(), 3);

    controller.set_filter(UrgencyFilter::Only(Urgency::Urgent));
    let ids: Vec<String> = controller.filtered_leads().into_iter().map(|l| l.id).collect();
    assert_eq!(ids, ["1", "3"]);

    controller.set_filter(UrgencyFilter::Only(Urgency::High));
    assert!(controller.filtered_leads().is_empty());
    assert_eq!(
        controller.view().empty_message("leads").as_deref(),
        Some("No leads match your filters")
    );

    controller.set_filter(UrgencyFilter::All);
    assert_eq!(controller.filtered_leads().len(), 3);
}

#[tokio::test]
async fn test_short_proposal_sends_nothing() {
    let (hub, mock) = hub();
    mock_shop_with_leads(&mock);
    let controller = LeadsController::new(&hub, &access(Role::ShopOwner));
    controller.load().await;
    let before = mock.total();

    let draft = ProposalDraft {
        message: "Can fix it".into(),
        ..valid_proposal("1")
    };
    assert!(!controller.submit_proposal(draft).await);

    assert_eq!(mock.total(), before);
    let state = controller.state();
    assert_eq!(state.leads.submission.field_error("message"), Some("Message must be at least 20 characters"));
    assert!(!state.leads.submission.submitting);
}

#[tokio::test]
async fn test_proposal_increments_only_originating_lead() {
    let (hub, mock) = hub();
    mock_shop_with_leads(&mock);
    mock.mock_ok(
        HttpMethod::Post,
        &url("/api/shops/proposals"),
        json!({ "proposal": { "id": 50, "lead_id": 2, "status": "pending", "message": "Replace front pads and resurface rotors", "estimated_cost": 240 } }),
    );
    let controller = LeadsController::new(&hub, &access(Role::ShopOwner));
    controller.load().await;
    controller.open_proposal_form("2");

    assert!(controller.submit_proposal(valid_proposal("2")).await);
    assert_eq!(mock.count(HttpMethod::Post, &url("/api/shops/proposals")), 1);

    let state = controller.state();
    let counts: Vec<u32> = state.leads.entities.iter().map(|l| l.proposal_count).collect();
    assert_eq!(counts, [0, 4, 1]);
    assert_eq!(state.my_proposals.len(), 1);
    assert_eq!(state.proposing_for, None);
    assert_eq!(state.leads.submission.visible_notice(), Some("Proposal submitted"));

    let body = mock.last().unwrap().body.unwrap();
    assert_eq!(body["lead_id"], "2");
    assert_eq!(body["estimated_cost"], 240.0);
}

#[tokio::test]
async fn test_padded_proposal_message_is_sent_trimmed() {
    let (hub, mock) = hub();
    mock_shop_with_leads(&mock);
    mock.mock_ok(
        HttpMethod::Post,
        &url("/api/shops/proposals"),
        json!({ "proposal": { "id": 51, "lead_id": 1, "status": "pending", "message": "aaaaaaaaaaaaaaaaaaa", "estimated_cost": 90 } }),
    );
    let controller = LeadsController::new(&hub, &access(Role::ShopOwner));
    controller.load().await;

    let draft = ProposalDraft {
        message: format!("{} ", "a".repeat(19)),
        estimated_cost: 90.0,
        ..valid_proposal("1")
    };
    assert!(controller.submit_proposal(draft).await);
    assert_eq!(mock.count(HttpMethod::Post, &url("/api/shops/proposals")), 1);
    assert_eq!(mock.last().unwrap().body.unwrap()["message"], "a".repeat(19));
    assert_eq!(controller.state().leads.submission.error, None);
}

#[tokio::test]
async fn test_failed_proposal_keeps_form_open() {
    let (hub, mock) = hub();
    mock_shop_with_leads(&mock);
    mock.mock_response(
        HttpMethod::Post,
        &url("/api/shops/proposals"),
        409,
        json!({ "success": false, "error": "You already bid on this lead" }),
    );
    let controller = LeadsController::new(&hub, &access(Role::ShopOwner));
    controller.load().await;
    controller.open_proposal_form("1");

    assert!(!controller.submit_proposal(valid_proposal("1")).await);
    let state = controller.state();
    assert_eq!(state.proposing_for.as_deref(), Some("1"));
    assert_eq!(state.leads.submission.error_message(), Some("You already bid on this lead"));
    assert_eq!(state.leads.entities[0].proposal_count, 0);
}

#[tokio::test]
async fn test_leads_without_shop_skip_lead_fetch() {
    let (hub, mock) = hub();
    let controller = LeadsController::new(&hub, &access(Role::ShopOwner));
    controller.load().await;

    assert!(controller.state().shop_missing);
    assert_eq!(mock.count(HttpMethod::Get, &url("/api/shops/leads")), 0);
}

#[tokio::test]
async fn test_lightbox_over_lead_images() {
    let (hub, mock) = hub();
    mock_shop_with_leads(&mock);
    let controller = LeadsController::new(&hub, &access(Role::ShopOwner));
    controller.load().await;

    controller.open_images("1", 1);
    controller.next_image();
    assert_eq!(controller.state().lightbox.current(), Some("a.jpg"));
    controller.close_images();
    assert!(!controller.state().lightbox.is_open());
}

// =========================================================
// Vehicles
// =========================================================

fn mock_vehicles(mock: &crate::request::MockHttpClient) {
    mock.mock_ok(
        HttpMethod::Get,
        &url("/api/vehicles"),
        json!({ "vehicles": [
            vehicle_json(1, "Honda", "Civic", true),
            vehicle_json(2, "Toyota", "Camry", false),
            vehicle_json(3, "Ford", "F-150", false)
        ] }),
    );
}

#[tokio::test]
async fn test_delete_removes_exactly_one_vehicle() {
    let (hub, mock) = hub();
    mock_vehicles(&mock);
    mock.mock_ok(HttpMethod::Delete, &url("/api/vehicles/2"), Value::Null);
    let controller = VehiclesController::new(&hub, &access(Role::CarOwner));
    controller.load().await;

    assert!(!controller.delete("2", false).await);
    assert_eq!(mock.count(HttpMethod::Delete, &url("/api/vehicles")), 0);
    assert_eq!(controller.state().list.entities.len(), 3);

    assert!(controller.delete("2", true).await);
    assert_eq!(mock.count(HttpMethod::Delete, &url("/api/vehicles")), 1);
    let ids: Vec<String> = controller.state().list.entities.into_iter().map(|v| v.id).collect();
    assert_eq!(ids, ["1", "3"]);
}

#[tokio::test]
async fn test_failed_delete_leaves_state_unchanged() {
    let (hub, mock) = hub();
    mock_vehicles(&mock);
    mock.mock_network_error(HttpMethod::Delete, &url("/api/vehicles/2"));
    let controller = VehiclesController::new(&hub, &access(Role::CarOwner));
    controller.load().await;

    assert!(!controller.delete("2", true).await);
    let state = controller.state();
    assert_eq!(state.list.entities.len(), 3);
    assert_eq!(state.list.submission.error.as_ref().map(|e| e.kind), Some(ErrorKind::Transport));
    assert!(!state.list.submission.submitting);
}

#[tokio::test]
async fn test_edit_updates_only_edited_fields_from_server() {
    let (hub, mock) = hub();
    mock_vehicles(&mock);
    let mut updated = vehicle_json(1, "Honda", "Civic", true);
    updated["mileage"] = json!(45210);
    updated["color"] = json!("Blue");
    updated["license_plate"] = json!("XYZ-987");
    updated["trim"] = json!("Sport");
    mock.mock_ok(HttpMethod::Put, &url("/api/vehicles/1"), json!({ "vehicle": updated }));

    let controller = VehiclesController::new(&hub, &access(Role::CarOwner));
    controller.load().await;
    let before = controller.state().list.entities;

    let patch = VehiclePatch {
        mileage: Some(45210),
        color: Some("Blue".into()),
        license_plate: Some("XYZ-987".into()),
        trim: Some("Sport".into()),
    };
    assert!(controller.update("1", patch).await);

    let after = controller.state().list.entities;
    let edited = &after[0];
    assert_eq!(edited.mileage, Some(45210));
    assert_eq!(edited.color.as_deref(), Some("Blue"));
    assert_eq!(edited.license_plate.as_deref(), Some("XYZ-987"));
    assert_eq!(edited.trim.as_deref(), Some("Sport"));
    assert_eq!(edited.vin, before[0].vin);
    assert_eq!(edited.make, before[0].make);
    assert_eq!(edited.repair_count, before[0].repair_count);
    assert!(edited.is_primary);
    assert_eq!(after[1..], before[1..]);
}

#[tokio::test]
async fn test_create_appends_and_validates() {
    let (hub, mock) = hub();
    mock_vehicles(&mock);
    mock.mock_ok(
        HttpMethod::Post,
        &url("/api/vehicles"),
        json!({ "vehicle": vehicle_json(9, "Mazda", "CX-5", false) }),
    );
    let controller = VehiclesController::new(&hub, &access(Role::CarOwner));
    controller.load().await;

    let bad = VehicleDraft {
        vin: "SHORTVIN".into(),
        year: 2021,
        make: "Mazda".into(),
        model: "CX-5".into(),
        ..Default::default()
    };
    assert!(!controller.create(bad.clone()).await);
    assert_eq!(mock.count(HttpMethod::Post, &url("/api/vehicles")), 0);
    assert_eq!(
        controller.state().list.submission.field_error("vin"),
        Some("VIN must be exactly 17 characters")
    );

    let good = VehicleDraft {
        vin: "jm3kfbcm1n0123456".into(),
        ..bad
    };
    assert!(controller.create(good).await);
    assert_eq!(mock.last().unwrap().body.unwrap()["vin"], "JM3KFBCM1N0123456");
    assert_eq!(controller.state().list.entities.len(), 4);
}

#[tokio::test]
async fn test_create_while_submitting_sends_nothing() {
    let (hub, mock) = hub();
    mock_vehicles(&mock);
    mock.mock_ok(
        HttpMethod::Post,
        &url("/api/vehicles"),
        json!({ "vehicle": vehicle_json(9, "Mazda", "CX-5", false) }),
    );
    let controller = VehiclesController::new(&hub, &access(Role::CarOwner));
    controller.load().await;

    // 第一次写操作尚未返回
    controller.cell().apply(|s| s.list.submission.submitting = true);
    let draft = VehicleDraft {
        vin: "JM3KFBCM1N0123456".into(),
        year: 2021,
        make: "Mazda".into(),
        model: "CX-5".into(),
        ..Default::default()
    };
    assert!(!controller.create(draft).await);

    assert_eq!(mock.count(HttpMethod::Post, &url("/api/vehicles")), 0);
    let state = controller.state();
    assert!(state.list.submission.submitting);
    assert_eq!(state.list.submission.error, None);
    assert_eq!(state.list.entities.len(), 3);
}

#[tokio::test]
async fn test_set_primary_flags_single_vehicle() {
    let (hub, mock) = hub();
    mock_vehicles(&mock);
    mock.mock_ok(HttpMethod::Put, &url("/api/vehicles/3/primary"), json!({ "message": "ok" }));
    let controller = VehiclesController::new(&hub, &access(Role::CarOwner));
    controller.load().await;

    assert!(controller.set_primary("3").await);
    let primaries: Vec<bool> = controller.state().list.entities.iter().map(|v| v.is_primary).collect();
    assert_eq!(primaries, [false, false, true]);
}

#[tokio::test]
async fn test_vehicle_search_distinguishes_empty_states() {
    let (hub, mock) = hub();
    mock_vehicles(&mock);
    let controller = VehiclesController::new(&hub, &access(Role::CarOwner));
    assert_eq!(controller.view(), ListView::Loading);
    controller.load().await;

    controller.set_search("camry");
    assert_eq!(controller.view().items().len(), 1);

    controller.set_search("tesla");
    assert_eq!(
        controller.view().empty_message("vehicles").as_deref(),
        Some("No vehicles match your filters")
    );
}

#[tokio::test]
async fn test_failed_load_degrades_to_empty() {
    let (hub, mock) = hub();
    mock.mock_response(HttpMethod::Get, &url("/api/vehicles"), 500, json!({ "success": false }));
    let controller = VehiclesController::new(&hub, &access(Role::CarOwner));
    controller.load().await;

    let state = controller.state();
    assert!(state.list.entities.is_empty());
    assert!(state.list.submission.error.is_none());
    assert_eq!(
        controller.view().empty_message("vehicles").as_deref(),
        Some("No vehicles yet")
    );
}

// =========================================================
// Lifecycle
// =========================================================

#[tokio::test]
async fn test_double_mount_fetches_once() {
    let (hub, mock) = hub();
    mock_vehicles(&mock);
    let controller = VehiclesController::new(&hub, &access(Role::CarOwner));

    let (first, second) = futures::join!(controller.load(), controller.load());
    assert!(first);
    assert!(!second);
    assert_eq!(mock.count(HttpMethod::Get, &url("/api/vehicles")), 1);

    // 新实例拥有自己的守卫
    let remount = VehiclesController::new(&hub, &access(Role::CarOwner));
    assert!(remount.load().await);
    assert_eq!(mock.count(HttpMethod::Get, &url("/api/vehicles")), 2);
}

#[tokio::test]
async fn test_response_after_unmount_is_dropped() {
    let (hub, mock) = hub();
    mock_vehicles(&mock);
    let controller = VehiclesController::new(&hub, &access(Role::CarOwner));
    controller.cell().unmount();

    assert!(!controller.load().await);
    assert_eq!(mock.total(), 1);
    let state = controller.state();
    assert!(state.list.loading);
    assert!(state.list.entities.is_empty());
}

#[test]
fn test_submission_refuses_second_begin() {
    let mut submission = Submission::default();
    assert!(submission.begin().is_ok());
    assert_eq!(submission.begin().unwrap_err().kind, ErrorKind::Busy);
    submission.fail(crate::error::ClientError::request("nope"));
    assert!(submission.begin().is_ok());
}

#[test]
fn test_notice_expires() {
    let notice = Notice::new("Saved", std::time::Duration::from_millis(3000));
    assert!(notice.is_visible_at(notice.shown_at + chrono::Duration::milliseconds(2999)));
    assert!(!notice.is_visible_at(notice.shown_at + chrono::Duration::milliseconds(3000)));
}

// =========================================================
// Overview & shop setup
// =========================================================

#[tokio::test]
async fn test_shop_owner_without_shop_sees_setup_then_dashboard() {
    let (hub, mock) = hub();
    let owner = access(Role::ShopOwner);

    let overview = OverviewController::new(&hub, &owner);
    overview.load().await;
    assert_eq!(overview.state(), Overview::ShopSetupRequired);
    assert_eq!(mock.count(HttpMethod::Get, &url("/api/shops/leads")), 0);

    mock.mock_ok(HttpMethod::Post, &url("/api/shops"), json!({ "shop": shop_json() }));
    let setup = ShopSetupController::new(&hub, &owner);
    let next = setup
        .create(ShopDraft {
            name: "Acme Auto".into(),
            address: "1 Main St".into(),
            ..Default::default()
        })
        .await;
    assert_eq!(next, Some(AppRoute::Dashboard));
    assert_eq!(
        mock.last().unwrap().body,
        Some(json!({ "name": "Acme Auto", "address": "1 Main St" }))
    );

    mock_shop_with_leads(&mock);
    let revisit = OverviewController::new(&hub, &owner);
    revisit.load().await;
    match revisit.state() {
        Overview::ShopOwner(dashboard) => {
            assert_eq!(dashboard.shop.name, "Acme Auto");
            assert_eq!(dashboard.leads.len(), 3);
            assert_eq!(dashboard.urgent_leads(), 2);
        }
        other => panic!("expected leads dashboard, got {:?}", other),
    }
}

#[tokio::test]
async fn test_shop_setup_requires_name_and_address() {
    let (hub, mock) = hub();
    let setup = ShopSetupController::new(&hub, &access(Role::ShopOwner));
    let next = setup
        .create(ShopDraft {
            name: "Acme Auto".into(),
            ..Default::default()
        })
        .await;
    assert_eq!(next, None);
    assert_eq!(mock.total(), 0);
    assert_eq!(setup.state().submission.field_error("address"), Some("address is required"));
}

#[tokio::test]
async fn test_car_owner_overview_survives_failed_sibling() {
    let (hub, mock) = hub();
    mock_vehicles(&mock);
    mock.mock_network_error(HttpMethod::Get, &url("/api/repairs/stats"));
    mock.mock_ok(
        HttpMethod::Get,
        &url("/api/repairs/reminders"),
        json!([{ "vehicle_id": 1, "service_type": "Oil change", "due_date": "2024-09-01" }]),
    );

    let overview = OverviewController::new(&hub, &access(Role::CarOwner));
    overview.load().await;
    match overview.state() {
        Overview::CarOwner(data) => {
            assert_eq!(data.vehicles.len(), 3);
            assert_eq!(data.stats, None);
            assert_eq!(data.reminders.len(), 1);
            assert_eq!(data.primary_vehicle().map(|v| v.model.as_str()), Some("Civic"));
        }
        other => panic!("expected car owner overview, got {:?}", other),
    }
}

#[tokio::test]
async fn test_insurance_overview_needs_no_fetch() {
    let (hub, mock) = hub();
    let overview = OverviewController::new(&hub, &access(Role::InsuranceCompany));
    overview.load().await;
    assert!(matches!(overview.state(), Overview::InsuranceCompany(_)));
    assert_eq!(mock.total(), 0);
}

// =========================================================
// Diagnosis
// =========================================================

#[tokio::test]
async fn test_diagnosis_vehicle_fields_follow_mode() {
    let (hub, mock) = hub();
    mock_vehicles(&mock);
    mock.mock_ok(HttpMethod::Get, &url("/api/diagnosis/health"), json!({ "status": "ok" }));
    mock.mock_ok(
        HttpMethod::Post,
        &url("/api/diagnosis"),
        json!({ "response": "Likely worn brake pads", "possible_causes": ["Worn pads"] }),
    );
    mock.mock_ok(
        HttpMethod::Post,
        &url("/api/diagnosis/quick"),
        json!({ "response": "Check the pads" }),
    );

    let controller = DiagnosisController::new(&hub, &access(Role::CarOwner));
    controller.load().await;
    assert_eq!(controller.state().available, Some(true));
    assert_eq!(controller.state().selected().map(|v| v.display_name()).as_deref(), Some("2020 Honda Civic"));

    assert!(controller.send("brakes squeaking").await);
    let full = mock.last().unwrap().body.unwrap();
    assert_eq!(full["message"], "brakes squeaking");
    assert_eq!(full["vehicle_info"]["make"], "Honda");
    assert_eq!(full["vehicle_info"]["model"], "Civic");
    assert_eq!(full["vehicle_info"]["year"], 2020);

    controller.set_mode(DiagnosisMode::Quick);
    assert!(controller.send("brakes squeaking").await);
    let quick = mock.last().unwrap();
    assert_eq!(quick.url, url("/api/diagnosis/quick"));
    assert_eq!(quick.body, Some(json!({ "message": "brakes squeaking" })));

    let roles: Vec<ChatRole> = controller.state().messages.iter().map(|m| m.role).collect();
    assert_eq!(
        roles,
        [ChatRole::Assistant, ChatRole::User, ChatRole::Assistant, ChatRole::User, ChatRole::Assistant]
    );
}

#[tokio::test]
async fn test_diagnosis_failure_becomes_system_message() {
    let (hub, mock) = hub();
    let controller = DiagnosisController::new(&hub, &access(Role::CarOwner));
    controller.load().await;
    let before = mock.total();

    assert!(!controller.send("   ").await);
    assert_eq!(mock.total(), before);

    assert!(!controller.send("engine light on").await);
    let state = controller.state();
    let last = state.messages.last().unwrap();
    assert_eq!(last.role, ChatRole::System);
    assert!(!state.submission.submitting);
    assert_eq!(state.messages.len(), 3);
}

// =========================================================
// Request detail
// =========================================================

#[tokio::test]
async fn test_accept_replaces_proposal_from_server() {
    let (hub, mock) = hub();
    mock.mock_ok(
        HttpMethod::Get,
        &url("/api/shops/leads/9"),
        json!({ "lead": {
            "id": 9, "title": "Brakes", "images": ["x.jpg"],
            "proposals": [
                { "id": 1, "lead_id": 9, "status": "pending", "estimated_cost": "300" },
                { "id": 2, "lead_id": 9, "status": "pending", "estimated_cost": "250" }
            ]
        } }),
    );
    mock.mock_ok(
        HttpMethod::Post,
        &url("/api/proposals/2/accept"),
        json!({ "id": 2, "lead_id": 9, "status": "accepted", "estimated_cost": "250" }),
    );

    let controller = RequestDetailController::new(&hub, &access(Role::CarOwner), "9");
    controller.load().await;
    assert!(controller.can_accept("1"));

    assert!(controller.accept("2").await);
    assert!(!controller.can_accept("1"));

    // 已有接受的报价，本地直接拒绝
    assert!(!controller.accept("1").await);
    assert_eq!(mock.count(HttpMethod::Post, &url("/api/proposals")), 1);
    let state = controller.state();
    assert_eq!(
        state.submission.error_message(),
        Some("This request already has an accepted proposal")
    );
    assert_eq!(state.lead.unwrap().accepted_proposal().map(|p| p.id.as_str()), Some("2"));
}

// =========================================================
// Repairs
// =========================================================

#[tokio::test]
async fn test_repairs_filters_and_range() {
    let (hub, mock) = hub();
    mock.mock_ok(
        HttpMethod::Get,
        &url("/api/repairs"),
        json!([
            { "id": 1, "vehicle_id": 1, "service_type": "Oil change", "cost": 60, "service_date": "2024-01-10" },
            { "id": 2, "vehicle_id": 1, "service_type": "Brakes", "cost": "320.5", "service_date": "2024-03-02", "shop_name": "Acme Auto" },
            { "id": 3, "vehicle_id": 2, "service_type": "Oil change", "cost": 55, "service_date": "2024-05-20" }
        ]),
    );
    mock.mock_ok(
        HttpMethod::Get,
        &url("/api/repairs/date-range?start=2024-03-01&end=2024-03-31"),
        json!({ "repairs": [
            { "id": 2, "vehicle_id": 1, "service_type": "Brakes", "cost": "320.5", "service_date": "2024-03-02" }
        ] }),
    );
    let controller = RepairsController::new(&hub, &access(Role::CarOwner));
    controller.load().await;

    assert_eq!(controller.service_types(), ["Brakes", "Oil change"]);
    controller.set_service_type(Some("oil change"));
    assert_eq!(controller.view().items().len(), 2);
    controller.set_search("acme");
    assert!(matches!(controller.view(), ListView::Empty { filtered: true }));

    assert!(!controller.load_range("2024-04-01", "2024-03-01").await);
    assert_eq!(
        controller.state().list.submission.field_error("start"),
        Some("Start date must be on or before end date")
    );

    assert!(controller.load_range("2024-03-01", "2024-03-31").await);
    assert_eq!(controller.state().list.entities.len(), 1);
}
