//! Integration tests for the Raiser HTTP client

use raiser_http::client::{ClientError, PublicRaiserClient, TypedClientBuilder};
use raiser_http::types::{
    LoginRequest, PageQuery, RegisterRequest, Role, SubmissionStatus,
};
use serde_json::json;
use wiremock::matchers::{body_json, body_string, header, header_exists, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_client_builder() {
    let client = TypedClientBuilder::new()
        .base_url("http://localhost:8000")
        .build_public();

    assert!(client.is_ok());
    let client = client.unwrap();
    assert_eq!(client.base_url(), "http://localhost:8000");
}

#[tokio::test]
async fn test_client_builder_requires_base_url() {
    let result = TypedClientBuilder::new().build_public();
    assert!(matches!(result, Err(ClientError::Configuration(_))));
}

#[tokio::test]
async fn test_login_is_form_encoded() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .and(body_string("username=alice&password=s3cret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "access-1",
            "expires_at": 1_900_000_000,
            "token_type": "bearer"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = PublicRaiserClient::new(mock_server.uri()).unwrap();
    let token = client
        .login(&LoginRequest {
            username: "alice".into(),
            password: "s3cret".into(),
        })
        .await
        .unwrap();

    assert_eq!(token.access_token, "access-1");
    assert_eq!(token.expires_at, 1_900_000_000);
}

#[tokio::test]
async fn test_refresh_sends_cookie_from_login() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header(
                    "set-cookie",
                    "refresh_token=rt-123; HttpOnly; Path=/auth/refresh; SameSite=Lax",
                )
                .set_body_json(json!({"access_token": "access-1", "expires_at": 100})),
        )
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .and(header("cookie", "refresh_token=rt-123"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"access_token": "access-2", "expires_at": 200})),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = PublicRaiserClient::new(mock_server.uri()).unwrap();
    client
        .login(&LoginRequest {
            username: "alice".into(),
            password: "pw".into(),
        })
        .await
        .unwrap();

    let refreshed = client.refresh().await.unwrap();
    assert_eq!(refreshed.access_token, "access-2");
    assert_eq!(refreshed.expires_at, 200);
}

#[tokio::test]
async fn test_refresh_without_cookie_is_rejected() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"detail": "Missing refresh token"})),
        )
        .mount(&mock_server)
        .await;

    let client = PublicRaiserClient::new(mock_server.uri()).unwrap();
    let err = client.refresh().await.unwrap_err();

    assert!(err.is_auth_expired());
    assert_eq!(err.message(), "Missing refresh token");
}

#[tokio::test]
async fn test_register_conflict() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/register"))
        .and(body_json(json!({
            "username": "alice",
            "email": "alice@example.com",
            "password": "pw",
            "role": "PROBLEM_SETTER"
        })))
        .respond_with(
            ResponseTemplate::new(409).set_body_json(json!({"detail": "User already exists"})),
        )
        .mount(&mock_server)
        .await;

    let client = PublicRaiserClient::new(mock_server.uri()).unwrap();
    let result = client
        .register(&RegisterRequest {
            username: "alice".into(),
            email: "alice@example.com".into(),
            password: "pw".into(),
            role: Some(Role::ProblemSetter),
        })
        .await;

    assert!(matches!(result, Err(ClientError::Conflict(ref m)) if m == "User already exists"));
}

#[tokio::test]
async fn test_get_me_sends_bearer_token() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users/me"))
        .and(header("authorization", "Bearer access-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 7,
            "username": "alice",
            "email": "alice@example.com",
            "role": "USER",
            "created_at": "2024-05-01T10:00:00"
        })))
        .mount(&mock_server)
        .await;

    let client = PublicRaiserClient::new(mock_server.uri())
        .unwrap()
        .with_token("access-1");
    let user = client.get_me().await.unwrap();

    assert_eq!(user.id, 7);
    assert_eq!(user.role, Role::User);
}

#[tokio::test]
async fn test_public_client_sends_no_authorization() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/verify-email"))
        .and(header_exists("authorization"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/auth/verify-email"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"message": "Email verified successfully"})),
        )
        .mount(&mock_server)
        .await;

    let client = PublicRaiserClient::new(mock_server.uri()).unwrap();
    let response = client.verify_email("alice@example.com").await.unwrap();
    assert_eq!(response.message, "Email verified successfully");
}

#[tokio::test]
async fn test_my_submissions_pagination_query() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/submissions/me/submissions"))
        .and(query_param("skip", "20"))
        .and(query_param("limit", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "id": 1,
                "problem_id": 3,
                "language": "python",
                "status": "WRONG_ANSWER",
                "test_cases_passed": 2,
                "total_test_cases": 5,
                "created_at": "2024-05-01T10:00:00"
            }
        ])))
        .mount(&mock_server)
        .await;

    let client = PublicRaiserClient::new(mock_server.uri())
        .unwrap()
        .with_token("access-1");
    let submissions = client
        .my_submissions(PageQuery { skip: 20, limit: 10 })
        .await
        .unwrap();

    assert_eq!(submissions.len(), 1);
    assert_eq!(submissions[0].status, SubmissionStatus::WrongAnswer);
}

#[tokio::test]
async fn test_error_handling() {
    let mock_server = MockServer::start().await;

    // Test 401 Unauthorized
    Mock::given(method("POST"))
        .and(path("/auth/logout"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Unauthorized"))
        .mount(&mock_server)
        .await;

    let client = PublicRaiserClient::new(mock_server.uri())
        .unwrap()
        .with_token("stale");

    let result = client.logout().await;
    assert!(matches!(result, Err(ClientError::AuthenticationFailed(ref m)) if m == "Unauthorized"));
}

#[tokio::test]
async fn test_get_problem_detail() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/problems/7"))
        .and(header("authorization", "Bearer access-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 7,
            "title": "Two Sum",
            "description": "Find two numbers adding up to a target.",
            "difficulty": "EASY",
            "test_cases": [
                {"id": 1, "input": "2 7 11 15\n9", "expected_output": "0 1", "is_sample": true}
            ]
        })))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/problems/8"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"detail": "Problem not found"})))
        .mount(&mock_server)
        .await;

    let client = PublicRaiserClient::new(mock_server.uri())
        .unwrap()
        .with_token("access-1");

    let problem = client.get_problem(7).await.unwrap();
    assert_eq!(problem.title, "Two Sum");
    assert!(!problem.is_solved);
    assert_eq!(problem.test_cases.len(), 1);
    assert!(problem.test_cases[0].is_sample);

    let missing = client.get_problem(8).await;
    assert!(matches!(missing, Err(ClientError::NotFound(ref m)) if m == "Problem not found"));
}

#[tokio::test]
async fn test_saved_refresh_cookie_works_in_new_client() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header(
                    "set-cookie",
                    "refresh_token=rt-9; HttpOnly; Path=/auth/refresh; SameSite=Lax",
                )
                .set_body_json(json!({"access_token": "a1", "expires_at": 1_900_000_000})),
        )
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .and(header("cookie", "refresh_token=rt-9"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"access_token": "a2", "expires_at": 1_900_000_900})),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let first = PublicRaiserClient::new(mock_server.uri()).unwrap();
    first
        .login(&LoginRequest {
            username: "alice".into(),
            password: "s3cret".into(),
        })
        .await
        .unwrap();
    let saved = first.cookie_header("/auth/refresh").unwrap().unwrap();

    let second = PublicRaiserClient::new(mock_server.uri()).unwrap();
    second.restore_cookies("/auth/refresh", &saved).unwrap();

    let token = second.refresh().await.unwrap();
    assert_eq!(token.access_token, "a2");
}
