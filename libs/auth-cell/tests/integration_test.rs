use assert_matches::assert_matches;
use serde_json::json;
use wiremock::{MockServer, Mock, ResponseTemplate};
use wiremock::matchers::{method, path, header, body_json, query_param};

use auth_cell::{AccountService, AdminService, DirectoryService};
use auth_cell::models::{LoginRequest, RegisterRequest, ChangePasswordRequest, AccountStatus};
use shared_models::AppError;
use shared_utils::test_utils::{TestConfig, MockRosterResponses};

fn register_request(recheck: &str) -> RegisterRequest {
    RegisterRequest {
        first_name: "Ana".to_string(),
        last_name: "Pop".to_string(),
        email: "ana@roster.test".to_string(),
        password: "secret-1".to_string(),
        password_recheck: recheck.to_string(),
    }
}

#[tokio::test]
async fn test_register_sends_password_recheck_field() {
    let mock_server = MockServer::start().await;
    let config = TestConfig::with_url(&mock_server.uri()).to_app_config();

    Mock::given(method("POST"))
        .and(path("/register"))
        .and(body_json(json!({
            "first_name": "Ana",
            "last_name": "Pop",
            "email": "ana@roster.test",
            "password": "secret-1",
            "passwordRecheck": "secret-1"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "Registration successful, awaiting approval"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let service = AccountService::new(&config);
    let response = service.register(register_request("secret-1")).await.unwrap();

    assert_eq!(response.message.as_deref(), Some("Registration successful, awaiting approval"));
}

#[tokio::test]
async fn test_register_rejects_mismatched_passwords_locally() {
    let mock_server = MockServer::start().await;
    let config = TestConfig::with_url(&mock_server.uri()).to_app_config();

    Mock::given(method("POST"))
        .and(path("/register"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let service = AccountService::new(&config);
    let err = service.register(register_request("other")).await.unwrap_err();

    assert!(err.to_string().contains("Passwords do not match"));
}

#[tokio::test]
async fn test_login_returns_token_and_user() {
    let mock_server = MockServer::start().await;
    let config = TestConfig::with_url(&mock_server.uri()).to_app_config();

    Mock::given(method("POST"))
        .and(path("/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(
            MockRosterResponses::login_response("u1", "jwt-abc")
        ))
        .mount(&mock_server)
        .await;

    let service = AccountService::new(&config);
    let response = service.login(LoginRequest {
        email: "test@roster.test".to_string(),
        password: "pw".to_string(),
    }).await.unwrap();

    assert_eq!(response.access_token, "jwt-abc");
    assert_eq!(response.user.id, "u1");
    assert_eq!(response.user.status, AccountStatus::Approved);
}

#[tokio::test]
async fn test_login_pending_account_is_forbidden() {
    let mock_server = MockServer::start().await;
    let config = TestConfig::with_url(&mock_server.uri()).to_app_config();

    Mock::given(method("POST"))
        .and(path("/login"))
        .respond_with(ResponseTemplate::new(403).set_body_json(
            MockRosterResponses::error_response("Contul nu a fost aprobat")
        ))
        .mount(&mock_server)
        .await;

    let service = AccountService::new(&config);
    let err = service.login(LoginRequest {
        email: "test@roster.test".to_string(),
        password: "pw".to_string(),
    }).await.unwrap_err();

    assert_matches!(err.downcast_ref::<AppError>(), Some(AppError::Forbidden(_)));
}

#[tokio::test]
async fn test_me_uses_bearer_token() {
    let mock_server = MockServer::start().await;
    let config = TestConfig::with_url(&mock_server.uri()).to_app_config();

    Mock::given(method("GET"))
        .and(path("/me"))
        .and(header("Authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(
            MockRosterResponses::user_response("u1", "approved")
        ))
        .mount(&mock_server)
        .await;

    let service = AccountService::new(&config);
    let me = service.me("test-token").await.unwrap();

    assert_eq!(me.display_name(), "Test User");
}

#[tokio::test]
async fn test_change_password_requires_confirmation() {
    let config = TestConfig::default().to_app_config();
    let service = AccountService::new(&config);

    let err = service.change_password(ChangePasswordRequest {
        current_password: "old".to_string(),
        new_password: "new-1".to_string(),
        confirm_password: "new-2".to_string(),
    }, "test-token").await.unwrap_err();

    assert!(err.to_string().contains("Passwords do not match"));
}

#[tokio::test]
async fn test_admin_lists_pending_and_approves() {
    let mock_server = MockServer::start().await;
    let config = TestConfig::with_url(&mock_server.uri()).to_app_config();

    Mock::given(method("GET"))
        .and(path("/admin/pending"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "pending": [
                { "id": "u9", "first_name": "Ion", "last_name": "Rus", "email": "ion@roster.test" }
            ]
        })))
        .mount(&mock_server)
        .await;

    Mock::given(method("PATCH"))
        .and(path("/admin/approve/u9"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "message": "User aprobat" })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let service = AdminService::new(&config);
    let pending = service.list_pending("test-token").await.unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].status, AccountStatus::Pending);

    let response = service.approve(&pending[0].id, "test-token").await.unwrap();
    assert_eq!(response.message.as_deref(), Some("User aprobat"));
}

#[tokio::test]
async fn test_find_by_email_normalizes_and_encodes() {
    let mock_server = MockServer::start().await;
    let config = TestConfig::with_url(&mock_server.uri()).to_app_config();

    Mock::given(method("GET"))
        .and(path("/users/find"))
        .and(query_param("email", "ana+oncall@roster.test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(
            MockRosterResponses::user_response("u1", "approved")
        ))
        .expect(1)
        .mount(&mock_server)
        .await;

    let service = DirectoryService::new(&config);
    let user = service.find_by_email("  Ana+OnCall@Roster.test ", "test-token").await.unwrap();

    assert_eq!(user.id, "u1");
}

#[tokio::test]
async fn test_basics_skips_request_for_empty_ids() {
    let mock_server = MockServer::start().await;
    let config = TestConfig::with_url(&mock_server.uri()).to_app_config();

    Mock::given(method("GET"))
        .and(path("/users/basics"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let service = DirectoryService::new(&config);
    let users = service.basics(&[], "test-token").await.unwrap();

    assert!(users.is_empty());
}

#[tokio::test]
async fn test_basics_joins_ids() {
    let mock_server = MockServer::start().await;
    let config = TestConfig::with_url(&mock_server.uri()).to_app_config();

    Mock::given(method("GET"))
        .and(path("/users/basics"))
        .and(query_param("ids", "u1,u2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "users": [
                { "id": "u1", "first_name": "Ana", "last_name": "Pop", "email": "a@r.test", "global_role": "medic" },
                { "id": "u2", "first_name": "", "last_name": "", "email": "b@r.test", "global_role": "admin" }
            ]
        })))
        .mount(&mock_server)
        .await;

    let service = DirectoryService::new(&config);
    let users = service
        .basics(&["u1".to_string(), "u2".to_string()], "test-token")
        .await
        .unwrap();

    assert_eq!(users[0].display_name(), "Ana Pop");
    assert_eq!(users[1].display_name(), "b@r.test");
}
