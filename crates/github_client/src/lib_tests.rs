//! Unit tests for the github_client crate.

use super::*; // Import items from lib.rs
use serde_json::json;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn create_test_client(mock_server: &MockServer) -> GitHubClient {
    let octocrab = octocrab::Octocrab::builder()
        .base_uri(mock_server.uri())
        .unwrap()
        .personal_token("test-token".to_string())
        .build()
        .unwrap();
    GitHubClient::new(octocrab)
}

fn repository_json(name: &str) -> serde_json::Value {
    json!({
        "id": 123456,
        "name": name,
        "full_name": format!("test-org/{name}"),
        "url": format!("https://api.github.com/repos/test-org/{name}"),
        "archived": false,
        "default_branch": "main"
    })
}

#[tokio::test]
async fn test_get_organization_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/orgs/test-org"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "login": "test-org",
            "id": 1
        })))
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);

    let result = client.get_organization("test-org").await;

    let org = result.expect("organization lookup should succeed");
    assert_eq!(org.name, "test-org");
}

#[tokio::test]
async fn test_get_organization_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/orgs/missing-org"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "message": "Not Found",
            "documentation_url": "https://docs.github.com/rest"
        })))
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);

    let result = client.get_organization("missing-org").await;

    assert!(matches!(result, Err(Error::NotFound)));
}

#[tokio::test]
async fn test_list_organization_repositories_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/orgs/test-org/repos"))
        .and(query_param("per_page", "100"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            repository_json("service-a"),
            repository_json("service-b")
        ])))
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);

    let result = client.list_organization_repositories("test-org").await;

    if let Err(e) = &result {
        eprintln!("list_organization_repositories error: {e:?}");
    }
    let repos = result.unwrap();
    let names: Vec<&str> = repos.iter().map(|r| r.name()).collect();
    assert_eq!(names, vec!["service-a", "service-b"]);
}

#[tokio::test]
async fn test_get_repository_success() {
    let mock_server = MockServer::start().await;
    let mut body = repository_json("test-repo");
    body["allow_squash_merge"] = json!(false);
    body["allow_merge_commit"] = json!(true);
    body["allow_auto_merge"] = json!(true);
    body["squash_merge_commit_title"] = json!("PR_TITLE");
    body["owner"] = json!({ "login": "test-org" });

    Mock::given(method("GET"))
        .and(path("/repos/test-org/test-repo"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);

    let result = client.get_repository("test-org", "test-repo").await;

    if let Err(e) = &result {
        eprintln!("get_repository error: {e:?}");
    }
    let repo = result.unwrap();
    assert_eq!(repo.full_name(), "test-org/test-repo");
    assert_eq!(repo.default_branch(), Some("main"));

    let settings = repo.settings();
    assert_eq!(settings["allow_squash_merge"], json!(false));
    assert_eq!(settings["allow_merge_commit"], json!(true));
    assert_eq!(settings["allow_auto_merge"], json!(true));
    assert_eq!(settings["squash_merge_commit_title"], json!("PR_TITLE"));
    assert_eq!(settings["default_branch"], json!("main"));
    assert!(!settings.contains_key("owner"));
}

#[tokio::test]
async fn test_update_repository_settings_sends_settings() {
    let mock_server = MockServer::start().await;
    let settings: Map<String, Value> = serde_json::from_value(json!({
        "allow_squash_merge": true,
        "delete_branch_on_merge": true
    }))
    .unwrap();

    Mock::given(method("PATCH"))
        .and(path("/repos/test-org/test-repo"))
        .and(body_json(json!({
            "allow_squash_merge": true,
            "delete_branch_on_merge": true
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(repository_json("test-repo")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);

    let result = client
        .update_repository_settings("test-org", "test-repo", &settings)
        .await;

    if let Err(e) = &result {
        eprintln!("update_repository_settings error: {e:?}");
    }
    assert!(result.is_ok());
}

#[tokio::test]
async fn test_update_repository_settings_validation_failure() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path("/repos/test-org/test-repo"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "message": "Validation Failed",
            "documentation_url": "https://docs.github.com/rest"
        })))
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);

    let result = client
        .update_repository_settings("test-org", "test-repo", &Map::new())
        .await;

    match result {
        Err(Error::ApiError(message)) => assert_eq!(message, "Validation Failed"),
        other => panic!("expected an API error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_get_branch_protection_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/repos/test-org/test-repo/branches/main/protection"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "url": "https://api.github.com/repos/test-org/test-repo/branches/main/protection",
            "enforce_admins": { "enabled": true },
            "required_pull_request_reviews": { "required_approving_review_count": 1 },
            "allow_force_pushes": { "enabled": false }
        })))
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);

    let protection = client
        .get_branch_protection("test-org", "test-repo", "main")
        .await
        .expect("protection read should succeed");

    let settings = protection.to_settings();
    assert_eq!(settings["enforce_admins"], json!(true));
    assert_eq!(settings["required_approving_review_count"], json!(1));
    assert_eq!(settings["allow_force_pushes"], json!(false));
}

#[tokio::test]
async fn test_get_branch_protection_not_protected() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/repos/test-org/test-repo/branches/main/protection"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "message": "Branch not protected",
            "documentation_url": "https://docs.github.com/rest"
        })))
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);

    let result = client
        .get_branch_protection("test-org", "test-repo", "main")
        .await;

    assert!(matches!(result, Err(Error::NotFound)));
}

#[tokio::test]
async fn test_get_branch_protection_forbidden() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/repos/test-org/test-repo/branches/main/protection"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "message": "Upgrade to GitHub Pro or make this repository public to enable this feature.",
            "documentation_url": "https://docs.github.com/rest"
        })))
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);

    let result = client
        .get_branch_protection("test-org", "test-repo", "main")
        .await;

    assert!(matches!(result, Err(Error::ApiError(_))));
}

#[tokio::test]
async fn test_update_branch_protection_sends_shaped_payload() {
    let mock_server = MockServer::start().await;
    let settings: Map<String, Value> = serde_json::from_value(json!({
        "enforce_admins": true,
        "required_approving_review_count": 1,
        "allow_force_pushes": false,
        "required_conversation_resolution": true
    }))
    .unwrap();
    let update = BranchProtectionUpdate::from_settings(&settings);

    Mock::given(method("PUT"))
        .and(path("/repos/test-org/test-repo/branches/main/protection"))
        .and(body_json(json!({
            "enforce_admins": true,
            "required_pull_request_reviews": { "required_approving_review_count": 1 },
            "allow_force_pushes": false,
            "required_conversation_resolution": true,
            "required_status_checks": null,
            "restrictions": null
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "url": "https://api.github.com/repos/test-org/test-repo/branches/main/protection"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);

    let result = client
        .update_branch_protection("test-org", "test-repo", "main", &update)
        .await;

    if let Err(e) = &result {
        eprintln!("update_branch_protection error: {e:?}");
    }
    assert!(result.is_ok());
}

#[tokio::test]
async fn test_create_token_client() {
    let result = create_token_client("ghp_test_token");

    assert!(result.is_ok());
}
