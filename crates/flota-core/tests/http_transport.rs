//! End-to-end checks of the reqwest transport against a local mock backend.

use std::sync::Arc;

use flota_core::{Config, DataAccess, Filters, HttpTransport, Record, ResourceKind};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config(server: &MockServer) -> Config {
    Config {
        supabase_url: server.uri(),
        api_key: "anon-key".to_string(),
        ..Config::default()
    }
}

fn access(server: &MockServer) -> DataAccess {
    DataAccess::from_config(&config(server)).expect("client")
}

#[tokio::test]
async fn list_sends_credentials_and_query() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/marcas"))
        .and(header("apikey", "anon-key"))
        .and(header("authorization", "Bearer anon-key"))
        .and(query_param("select", "*"))
        .and(query_param("order", "nombre.asc"))
        .and(query_param("nombre", "ilike.*toy*"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([{"id": 1, "nombre": "Toyota"}]))
                .insert_header("content-range", "0-0/12"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let access = access(&server);
    let filters = Filters::new().search("toy");
    let env = access.list(ResourceKind::Brands, &filters).await;
    assert!(env.is_success(), "error: {:?}", env.error());
    assert_eq!(env.data().len(), 1);
    assert_eq!(env.count(), Some(12));

    // Served from cache; the mock's expect(1) verifies on drop.
    let again = access.list(ResourceKind::Brands, &filters).await;
    assert_eq!(env, again);
}

#[tokio::test]
async fn create_posts_json_and_asks_for_representation() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/marcas"))
        .and(header("prefer", "return=representation"))
        .and(body_json(json!({"nombre": "Kia"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([{"id": 5, "nombre": "Kia"}])))
        .expect(1)
        .mount(&server)
        .await;

    let mut record = Record::new();
    record.insert("nombre".to_string(), json!("Kia"));

    let env = access(&server).create(ResourceKind::Brands, &record).await;
    assert!(env.is_success());
    assert_eq!(env.first().and_then(|r| r.get("id")), Some(&json!(5)));
}

#[tokio::test]
async fn delete_with_no_content_is_empty_success() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/rest/v1/tareas"))
        .and(query_param("id", "eq.3"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let env = access(&server).delete(ResourceKind::Tasks, 3).await;
    assert!(env.is_success());
    assert!(env.data().is_empty());
}

#[tokio::test]
async fn server_error_becomes_failed_envelope() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/vehiculos"))
        .respond_with(ResponseTemplate::new(500).set_body_string("database unavailable"))
        .mount(&server)
        .await;

    let access = access(&server);
    let env = access.list(ResourceKind::Vehicles, &Filters::new()).await;
    assert!(!env.is_success());
    assert!(env.data().is_empty());
    assert!(env.error().unwrap_or_default().contains("database unavailable"));
    assert_eq!(access.cache_stats().entries, 0);
}

#[tokio::test]
async fn unreachable_backend_becomes_failed_envelope() {
    let server = MockServer::start().await;
    let config = config(&server);
    drop(server);

    let transport = HttpTransport::new(&config.supabase_url, &config.api_key, config.request_timeout())
        .expect("client");
    let access = DataAccess::new(Arc::new(transport), &config);
    let env = access.get(ResourceKind::Vehicles, 1).await;
    assert!(!env.is_success());
    assert!(!env.error().unwrap_or_default().is_empty());
}
