/// Integration tests with a mocked remote lead service
/// Exercises the full fetch -> pipeline -> mutate workflow without
/// hitting the real Metropole backend
use metropole_crm_api::board::LeadBoard;
use metropole_crm_api::intake::{FormKind, FormState, IntakeVariant};
use metropole_crm_api::metropole_client::MetropoleClient;
use metropole_crm_api::models::LeadStatus;
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> MetropoleClient {
    MetropoleClient::new(server.uri()).expect("client should build")
}

#[tokio::test]
async fn test_list_leads_sorted_most_recent_first() {
    let mock_server = MockServer::start().await;

    let mock_response = json!([
        { "id": 1, "name": "Oldest", "createdAt": "2025-03-01T10:00:00Z" },
        { "id": 2, "name": "Newest", "createdAt": "2025-03-03T10:00:00Z" },
        { "id": 3, "name": "Middle", "createdAt": "2025-03-02T10:00:00Z" }
    ]);

    Mock::given(method("GET"))
        .and(path("/metropole/v1/data/7/shalomconsorcios"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&mock_response))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let leads = client.list_leads(7, "shalomconsorcios").await.unwrap();
    assert_eq!(leads.len(), 3);

    let board = LeadBoard::from_snapshot(leads);
    let order: Vec<i64> = board.leads().iter().map(|l| l.id).collect();
    assert_eq!(order, vec![2, 3, 1]);
}

#[tokio::test]
async fn test_list_leads_error_status() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/metropole/v1/data/7/shalomconsorcios"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let result = client.list_leads(7, "shalomconsorcios").await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_empty_collection_yields_zeroed_dashboard() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/metropole/v1/data/7/shalomconsorcios"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let leads = client.list_leads(7, "shalomconsorcios").await.unwrap();
    let board = LeadBoard::from_snapshot(leads);

    let stats = board.stats();
    assert_eq!(stats.total, 0);
    assert_eq!(stats.qualified, 0);
    assert_eq!(stats.new, 0);
    assert_eq!(stats.closed, 0);
    assert_eq!(stats.qualification_rate, "0");
    assert_eq!(stats.conversion_rate, "0");

    let view = board.page("", 1);
    assert!(view.items.is_empty());
    assert_eq!(view.total_pages, 0);
}

#[tokio::test]
async fn test_status_update_patches_field03() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/metropole/v1/update/42"))
        .and(body_json(json!({ "field03": "FECHADO" })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    client.update_status(42, LeadStatus::Fechado).await.unwrap();

    // the successful remote patch is applied to the local snapshot,
    // without a re-fetch
    let mut board = LeadBoard::from_snapshot(
        serde_json::from_value(json!([
            { "id": 42, "createdAt": "2025-03-01T10:00:00Z" }
        ]))
        .unwrap(),
    );
    assert!(board.apply_status(42, LeadStatus::Fechado));
    assert_eq!(
        board.find("42").unwrap().pipeline_status(),
        Some(LeadStatus::Fechado)
    );
}

#[tokio::test]
async fn test_repeated_status_update_issues_independent_calls() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/metropole/v1/update/7"))
        .and(body_json(json!({ "field03": "PROPOSTA" })))
        .respond_with(ResponseTemplate::new(200))
        .expect(2)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    client.update_status(7, LeadStatus::Proposta).await.unwrap();
    client.update_status(7, LeadStatus::Proposta).await.unwrap();
}

#[tokio::test]
async fn test_failed_status_update_leaves_snapshot_unchanged() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/metropole/v1/update/42"))
        .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let board = LeadBoard::from_snapshot(
        serde_json::from_value(json!([
            { "id": 42, "field03": "NOVO", "createdAt": "2025-03-01T10:00:00Z" }
        ]))
        .unwrap(),
    );

    let result = client.update_status(42, LeadStatus::Fechado).await;
    assert!(result.is_err());

    // failure is scoped to the single operation; the snapshot keeps
    // the previous status
    assert_eq!(
        board.find("42").unwrap().pipeline_status(),
        Some(LeadStatus::Novo)
    );
}

#[tokio::test]
async fn test_create_lead_posts_full_wire_payload() {
    let mock_server = MockServer::start().await;

    let mut form = FormState::new();
    form.name = "Maria Souza".to_string();
    form.email = "maria@example.com".to_string();
    form.cell_phone = "(11) 98765-4321".to_string();
    form.product = "shalomconsorcios".to_string();
    form.variant = IntakeVariant::Premium {
        main_interest: "morar".to_string(),
        financing: "Vou financiar com FGTS".to_string(),
        search_time: "1-3 meses".to_string(),
    };
    form.validate().unwrap();

    let record = form.to_wire(7);
    let expected_body = serde_json::to_value(&record).unwrap();
    assert_eq!(expected_body["tenantId"], json!({ "id": 7 }));

    Mock::given(method("POST"))
        .and(path("/metropole/v1/send"))
        .and(body_json(&expected_body))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    client.create_lead(&record).await.unwrap();
}

#[tokio::test]
async fn test_failed_create_keeps_form_state_for_correction() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/metropole/v1/send"))
        .respond_with(ResponseTemplate::new(422).set_body_string("rejected"))
        .mount(&mock_server)
        .await;

    let mut form = FormState::new();
    form.name = "João".to_string();
    form.email = "joao@example.com".to_string();
    form.cell_phone = "11999998888".to_string();
    form.product = "shalomconsorcios".to_string();

    let client = client_for(&mock_server);
    let result = client.create_lead(&form.to_wire(7)).await;
    assert!(result.is_err());

    // no field is cleared on failure
    assert_eq!(form.name, "João");
    assert_eq!(form.email, "joao@example.com");
    assert_eq!(form.cell_phone, "11999998888");
    assert_eq!(form.kind(), FormKind::Premium);
}

#[tokio::test]
async fn test_concurrent_updates_to_different_ids() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(200))
        .expect(10)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);

    // Fire 10 concurrent updates for distinct leads
    let mut handles = vec![];
    for id in 0..10 {
        let client_clone = client.clone();
        let handle = tokio::spawn(async move {
            client_clone
                .update_status(id, LeadStatus::ContatoFeito)
                .await
        });
        handles.push(handle);
    }

    // Wait for all to complete
    for handle in handles {
        let result = handle.await.unwrap();
        assert!(result.is_ok());
    }
}
