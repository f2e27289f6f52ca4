//! Tests for the DevMatch client library.
//!
//! These tests use mock servers to verify client behavior without
//! requiring a real backend.

use devmatch_client::{ClientConfig, ClientError, DevMatchClient};
use devmatch_core::{
    DevMatchError, Gateway, LoginCredentials, ProfileDraft, RequestId, ReviewDecision,
    SendStatus, SignupForm, User, UserId,
};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn user_json(id: &str, first: &str) -> serde_json::Value {
    serde_json::json!({
        "_id": id,
        "firstName": first,
        "lastName": "Tester",
        "emailId": format!("{}@example.com", first.to_lowercase()),
        "skills": ["rust"]
    })
}

async fn client_for(server: &MockServer) -> DevMatchClient {
    DevMatchClient::new(ClientConfig::new(server.uri())).unwrap()
}

// =============================================================================
// Client Creation Tests
// =============================================================================

mod client_creation {
    use super::*;

    #[test]
    fn test_valid_http_url() {
        assert!(DevMatchClient::new(ClientConfig::new("http://localhost:3001")).is_ok());
    }

    #[test]
    fn test_empty_url_rejected() {
        match DevMatchClient::new(ClientConfig::new("")) {
            Err(ClientError::InvalidUrl(msg)) => assert!(msg.contains("empty")),
            _ => panic!("Expected InvalidUrl error"),
        }
    }

    #[test]
    fn test_url_without_scheme_rejected() {
        match DevMatchClient::new(ClientConfig::new("example.com")) {
            Err(ClientError::InvalidUrl(msg)) => {
                assert!(msg.contains("http://") || msg.contains("https://"));
            }
            _ => panic!("Expected InvalidUrl error"),
        }
    }
}

// =============================================================================
// Session Tests
// =============================================================================

mod session {
    use super::*;

    #[tokio::test]
    async fn test_login_success_wrapped_user() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/login"))
            .and(body_partial_json(serde_json::json!({
                "emailId": "alice@example.com",
                "password": "password123"
            })))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "user": user_json("u1", "Alice") })),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server).await;
        let user = client
            .auth()
            .login(&LoginCredentials::new("alice@example.com", "password123"))
            .await
            .unwrap();

        assert_eq!(user.id.as_str(), "u1");
        assert_eq!(user.first_name, "Alice");
    }

    #[tokio::test]
    async fn test_login_invalid_credentials() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/login"))
            .respond_with(
                ResponseTemplate::new(401)
                    .set_body_json(serde_json::json!({ "message": "Invalid credentials" })),
            )
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server).await;
        let err = client
            .auth()
            .login(&LoginCredentials::new("alice@example.com", "wrongpass1"))
            .await
            .unwrap_err();

        match err {
            ClientError::AuthFailed(msg) => assert_eq!(msg, "Invalid credentials"),
            e => panic!("Expected AuthFailed, got: {:?}", e),
        }
    }

    #[tokio::test]
    async fn test_login_rejection_plain_text_body() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/login"))
            .respond_with(ResponseTemplate::new(400).set_body_string("ERROR: Invalid credentials"))
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server).await;
        let err = Gateway::login(
            &client,
            &LoginCredentials::new("alice@example.com", "wrongpass1"),
        )
        .await
        .unwrap_err();

        assert_eq!(err, DevMatchError::Conflict("ERROR: Invalid credentials".into()));
    }

    #[tokio::test]
    async fn test_session_cookie_sent_after_login() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/login"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("set-cookie", "token=abc123; Path=/")
                    .set_body_json(user_json("u1", "Alice")),
            )
            .mount(&mock_server)
            .await;

        Mock::given(method("GET"))
            .and(path("/profile/view"))
            .and(header("cookie", "token=abc123"))
            .respond_with(ResponseTemplate::new(200).set_body_json(user_json("u1", "Alice")))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server).await;
        client
            .auth()
            .login(&LoginCredentials::new("alice@example.com", "password123"))
            .await
            .unwrap();

        let me = client.auth().profile_view().await.unwrap();
        assert_eq!(me.first_name, "Alice");
    }

    #[tokio::test]
    async fn test_profile_view_unauthorized() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/profile/view"))
            .respond_with(ResponseTemplate::new(401).set_body_string("Please Login!"))
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server).await;
        let err = Gateway::profile_view(&client).await.unwrap_err();
        assert_eq!(err, DevMatchError::AuthRequired);
    }

    #[tokio::test]
    async fn test_signup_and_logout() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/signup"))
            .and(body_partial_json(serde_json::json!({
                "firstName": "Bob",
                "lastName": "Tester",
                "emailId": "bob@example.com"
            })))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({
                    "message": "User added successfully",
                    "data": user_json("u2", "Bob")
                })),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        Mock::given(method("POST"))
            .and(path("/logout"))
            .respond_with(ResponseTemplate::new(200).set_body_string("Logout successful"))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server).await;
        let form = SignupForm {
            first_name: "Bob".into(),
            last_name: "Tester".into(),
            email_id: "bob@example.com".into(),
            password: "password123".into(),
        };

        let user = client.auth().signup(&form).await.unwrap();
        assert_eq!(user.id.as_str(), "u2");
        client.auth().logout().await.unwrap();
    }
}

// =============================================================================
// Discovery Tests
// =============================================================================

mod discovery {
    use super::*;

    #[tokio::test]
    async fn test_get_feed() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/feed"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": [user_json("a", "Alice"), user_json("b", "Bob")]
            })))
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server).await;
        let feed = client.discovery().get_feed().await.unwrap();

        let names: Vec<&str> = feed.iter().map(|u| u.first_name.as_str()).collect();
        assert_eq!(names, vec!["Alice", "Bob"]);
    }

    #[tokio::test]
    async fn test_send_request_path() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/request/send/interested/a"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&mock_server)
            .await;

        Mock::given(method("POST"))
            .and(path("/request/send/ignored/b"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server).await;
        Gateway::send_request(&client, SendStatus::Interested, &UserId::new("a"))
            .await
            .unwrap();
        Gateway::send_request(&client, SendStatus::Ignored, &UserId::new("b"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_feed_server_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/feed"))
            .respond_with(ResponseTemplate::new(500).set_body_string(""))
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server).await;
        match Gateway::feed(&client).await.unwrap_err() {
            DevMatchError::Server { status, message } => {
                assert_eq!(status, 500);
                assert_eq!(message, "Error fetching feed");
            }
            e => panic!("Expected Server error, got: {:?}", e),
        }
    }

    #[tokio::test]
    async fn test_feed_malformed_body() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/feed"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server).await;
        let err = client.discovery().get_feed().await.unwrap_err();
        assert!(matches!(err, ClientError::ParseError(_)));
    }
}

// =============================================================================
// Request Tests
// =============================================================================

mod requests {
    use super::*;

    #[tokio::test]
    async fn test_received_requests() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/user/requests/received"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "message": "Data fetched successfully",
                "requests": [{
                    "_id": "r1",
                    "fromUserId": user_json("u5", "Carol"),
                    "createdAt": "2024-05-01T12:00:00Z"
                }]
            })))
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server).await;
        let requests = Gateway::received_requests(&client).await.unwrap();

        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].id, RequestId::new("r1"));
        assert_eq!(requests[0].sender.first_name, "Carol");
    }

    #[tokio::test]
    async fn test_review_error_text_is_verbatim() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/request/review/accepted/r1"))
            .respond_with(
                ResponseTemplate::new(404)
                    .set_body_json(serde_json::json!({ "error": "Connection request not found" })),
            )
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server).await;
        let err = Gateway::review_request(&client, ReviewDecision::Accepted, &RequestId::new("r1"))
            .await
            .unwrap_err();

        assert_eq!(err, DevMatchError::Conflict("Connection request not found".into()));
        assert_eq!(err.user_message(), "Connection request not found");
    }

    #[tokio::test]
    async fn test_connections() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/user/viewConnections"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": [user_json("c1", "Dana")]
            })))
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server).await;
        let connections = Gateway::connections(&client).await.unwrap();
        assert_eq!(connections[0].first_name, "Dana");
    }
}

// =============================================================================
// Profile Tests
// =============================================================================

mod profile {
    use super::*;

    #[tokio::test]
    async fn test_edit_sends_camel_case_draft() {
        let mock_server = MockServer::start().await;

        Mock::given(method("PATCH"))
            .and(path("/profile/edit"))
            .and(body_partial_json(serde_json::json!({
                "firstName": "Ada",
                "lastName": "Lovelace",
                "about": "Analytical engines",
                "skills": ["math"]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "message": "Profile updated"
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server).await;
        let mut draft = ProfileDraft::from_user(&User::new(UserId::new("u1"), "Ada", "Lovelace"));
        draft.about = "Analytical engines".into();
        draft.skills.try_add("math").unwrap();

        Gateway::update_profile(&client, &draft).await.unwrap();
    }

    #[tokio::test]
    async fn test_delete_failure_is_classified() {
        let mock_server = MockServer::start().await;

        Mock::given(method("DELETE"))
            .and(path("/profile/delete"))
            .respond_with(ResponseTemplate::new(503).set_body_json(serde_json::json!({
                "message": "Try again later"
            })))
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server).await;
        let err = Gateway::delete_profile(&client).await.unwrap_err();
        assert_eq!(err, DevMatchError::server(503, "Try again later"));
    }
}

// =============================================================================
// Connectivity Tests
// =============================================================================

mod connectivity {
    use super::*;

    #[tokio::test]
    async fn test_unreachable_server_is_classified() {
        // Port 9 (discard) is not expected to be listening
        let client = DevMatchClient::new(ClientConfig::new("http://127.0.0.1:9")).unwrap();

        match Gateway::feed(&client).await.unwrap_err() {
            DevMatchError::Unreachable(_) => {}
            e => panic!("Expected Unreachable, got: {:?}", e),
        }
    }
}
