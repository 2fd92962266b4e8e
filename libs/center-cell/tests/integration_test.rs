use assert_matches::assert_matches;
use serde_json::json;
use wiremock::{MockServer, Mock, ResponseTemplate};
use wiremock::matchers::{method, path, header, body_json, query_param};

use center_cell::{CenterService, MembershipService, ReportService};
use center_cell::models::{CreateCenterRequest, MemberRole, UpdateCenterRequest};
use shared_models::AppError;
use shared_utils::Month;
use shared_utils::test_utils::{TestConfig, TestMember, MockRosterResponses};

#[tokio::test]
async fn test_list_centers() {
    let mock_server = MockServer::start().await;
    let config = TestConfig::with_url(&mock_server.uri()).to_app_config();

    Mock::given(method("GET"))
        .and(path("/centers"))
        .and(header("Authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(MockRosterResponses::centers_response()))
        .mount(&mock_server)
        .await;

    let service = CenterService::new(&config);
    let centers = service.list_centers("test-token").await.unwrap();

    assert_eq!(centers.len(), 2);
    assert_eq!(centers[0].id, "c1");
    assert_eq!(centers[0].location.as_deref(), Some("Cluj-Napoca"));
}

#[tokio::test]
async fn test_create_center_trims_name() {
    let mock_server = MockServer::start().await;
    let config = TestConfig::with_url(&mock_server.uri()).to_app_config();

    Mock::given(method("POST"))
        .and(path("/centers"))
        .and(body_json(json!({ "name": "UPU Iasi", "location": "Iasi" })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "id": "c3" })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let service = CenterService::new(&config);
    let id = service.create_center(CreateCenterRequest {
        name: "  UPU Iasi ".to_string(),
        location: Some("Iasi ".to_string()),
    }, "test-token").await.unwrap();

    assert_eq!(id, "c3");
}

#[tokio::test]
async fn test_update_center_requires_a_field() {
    let config = TestConfig::default().to_app_config();
    let service = CenterService::new(&config);

    let err = service
        .update_center("c1", UpdateCenterRequest::default(), "test-token")
        .await
        .unwrap_err();

    assert!(err.to_string().contains("Nothing to update"));
}

#[tokio::test]
async fn test_list_members_parses_roles() {
    let mock_server = MockServer::start().await;
    let config = TestConfig::with_url(&mock_server.uri()).to_app_config();

    Mock::given(method("GET"))
        .and(path("/centers/c1/members"))
        .respond_with(ResponseTemplate::new(200).set_body_json(MockRosterResponses::members_response(&[
            TestMember::lead("m1"),
            TestMember::medic("m2"),
        ])))
        .mount(&mock_server)
        .await;

    let service = MembershipService::new(&config);
    let members = service.list_members("c1", "test-token").await.unwrap();

    assert_eq!(members.len(), 2);
    assert_eq!(members[0].role, MemberRole::Lead);
    assert!(members[0].is_lead());
    assert_eq!(members[1].display_name(), "First-m2 Last-m2");
}

#[tokio::test]
async fn test_add_member_by_email_requires_approved_user() {
    let mock_server = MockServer::start().await;
    let config = TestConfig::with_url(&mock_server.uri()).to_app_config();

    Mock::given(method("GET"))
        .and(path("/users/find"))
        .and(query_param("email", "pending@roster.test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(
            MockRosterResponses::user_response("u5", "pending")
        ))
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/centers/c1/members"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&mock_server)
        .await;

    let service = MembershipService::new(&config);
    let err = service
        .add_member_by_email("c1", "Pending@Roster.test", "test-token")
        .await
        .unwrap_err();

    assert!(err.to_string().contains("not approved"));
}

#[tokio::test]
async fn test_add_member_by_email_posts_membership() {
    let mock_server = MockServer::start().await;
    let config = TestConfig::with_url(&mock_server.uri()).to_app_config();

    Mock::given(method("GET"))
        .and(path("/users/find"))
        .respond_with(ResponseTemplate::new(200).set_body_json(
            MockRosterResponses::user_response("u6", "approved")
        ))
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/centers/c1/members"))
        .and(body_json(json!({ "user_id": "u6" })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "message": "medic adaugat" })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let service = MembershipService::new(&config);
    let user = service
        .add_member_by_email("c1", "test@roster.test", "test-token")
        .await
        .unwrap();

    assert_eq!(user.id, "u6");
}

#[tokio::test]
async fn test_add_member_unknown_email_is_not_found() {
    let mock_server = MockServer::start().await;
    let config = TestConfig::with_url(&mock_server.uri()).to_app_config();

    Mock::given(method("GET"))
        .and(path("/users/find"))
        .respond_with(ResponseTemplate::new(404).set_body_json(
            MockRosterResponses::error_response("User not found")
        ))
        .mount(&mock_server)
        .await;

    let service = MembershipService::new(&config);
    let err = service
        .add_member_by_email("c1", "nobody@roster.test", "test-token")
        .await
        .unwrap_err();

    assert_matches!(err.downcast_ref::<AppError>(), Some(AppError::NotFound(_)));
}

#[tokio::test]
async fn test_remove_member_reports_dropped_shifts() {
    let mock_server = MockServer::start().await;
    let config = TestConfig::with_url(&mock_server.uri()).to_app_config();

    Mock::given(method("DELETE"))
        .and(path("/centers/c1/members/m2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "member removed",
            "future_shifts_removed": 3
        })))
        .mount(&mock_server)
        .await;

    let service = MembershipService::new(&config);
    let response = service.remove_member("c1", "m2", "test-token").await.unwrap();

    assert_eq!(response.future_shifts_removed, 3);
}

#[tokio::test]
async fn test_assign_lead_conflict_elsewhere() {
    let mock_server = MockServer::start().await;
    let config = TestConfig::with_url(&mock_server.uri()).to_app_config();

    Mock::given(method("PATCH"))
        .and(path("/centers/c1/assign-lead"))
        .and(body_json(json!({ "user_id": "m2" })))
        .respond_with(ResponseTemplate::new(409).set_body_json(
            MockRosterResponses::error_response("Medicul este deja coordonator al altui centru")
        ))
        .mount(&mock_server)
        .await;

    let service = MembershipService::new(&config);
    let err = service.assign_lead("c1", "m2", "test-token").await.unwrap_err();

    assert_matches!(err.downcast_ref::<AppError>(), Some(AppError::Conflict(_)));
}

#[tokio::test]
async fn test_monthly_report_and_csv_export() {
    let mock_server = MockServer::start().await;
    let config = TestConfig::with_url(&mock_server.uri()).to_app_config();
    let month: Month = "2026-10".parse().unwrap();

    Mock::given(method("GET"))
        .and(path("/centers/c1/reports"))
        .and(query_param("month", "2026-10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "center_id": "c1",
            "month": "2026-10",
            "rows": [
                { "medic_id": "m1", "count": 4, "first_name": "Ana", "last_name": "Pop", "email": "a@r.test" },
                { "medic_id": "m2", "count": 2, "first_name": "Ion", "last_name": "Rus", "email": "i@r.test" }
            ],
            "total": 6
        })))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/centers/c1/reports.csv"))
        .and(query_param("month", "2026-10"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            "medic_id,first_name,last_name,email,count\nm1,Ana,Pop,a@r.test,4\n"
        ))
        .mount(&mock_server)
        .await;

    let service = ReportService::new(&config);
    let report = service.monthly_report("c1", month, "test-token").await.unwrap();
    assert_eq!(report.total, 6);
    assert_eq!(report.rows[0].display_name(), "Ana Pop");

    let dir = tempfile::tempdir().unwrap();
    let dest = dir.path().join("report.csv");
    let written = service.export_csv("c1", month, &dest, "test-token").await.unwrap();

    let contents = std::fs::read_to_string(&dest).unwrap();
    assert_eq!(written, contents.len());
    assert!(contents.contains("m1,Ana,Pop"));
}
