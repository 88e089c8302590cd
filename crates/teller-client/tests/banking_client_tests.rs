use mockito::Matcher;
use rust_decimal::Decimal;
use teller_client::{AccountsApi, BankingClient, ChatApi, FetchError, OperationFeed};
use teller_types::{AccountType, OperationType};

fn client_for(server: &mockito::ServerGuard) -> BankingClient {
    BankingClient::builder()
        .base_url(server.url())
        .bearer_token("token-123")
        .build()
        .unwrap()
}

#[test]
fn test_builder_missing_base_url() {
    let result = BankingClient::builder().build();

    assert!(result.is_err());
    let err_msg = result.err().unwrap().to_string();
    assert!(err_msg.contains("Base URL"));
}

#[test]
fn test_builder_rejects_unparseable_base_url() {
    let result = BankingClient::builder().base_url("not a url").build();
    assert!(result.is_err());

    let result = BankingClient::builder().base_url("mailto:ops@bank.local").build();
    assert!(result.is_err());
}

#[test]
fn test_builder_rejects_bad_token() {
    let result = BankingClient::builder()
        .base_url("http://localhost:8085")
        .bearer_token("line\nbreak")
        .build();

    assert!(result.is_err());
}

#[tokio::test]
async fn test_fetch_operations_maps_page() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/accounts/A1/pageOperations")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("page".into(), "1".into()),
            Matcher::UrlEncoded("size".into(), "5".into()),
        ]))
        .match_header("authorization", "Bearer token-123")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{
                "accountId": "A1",
                "balance": 300.0,
                "currentPage": 1,
                "totalPages": 3,
                "pageSize": 5,
                "accountOperationDTOS": [
                    {"id": 6, "operationDate": 1700000000000, "amount": 10.0, "type": "DEBIT"},
                    {"id": 7, "operationDate": 1700000100000, "amount": 20.0, "type": "TRANSFER"}
                ]
            }"#,
        )
        .create_async()
        .await;

    let page = client_for(&server).fetch_operations("A1", 1, 5).await.unwrap();

    mock.assert_async().await;
    assert_eq!(page.page_index, 1);
    assert_eq!(page.total_pages, 3);
    assert_eq!(page.items.len(), 2);
    assert_eq!(page.items[1].op_type, OperationType::Transfer);
    assert_eq!(page.balance, Some(Decimal::from(300)));
}

#[tokio::test]
async fn test_non_success_status_is_fetch_error() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/accounts/A1/pageOperations")
        .match_query(Matcher::Any)
        .with_status(500)
        .with_body("boom")
        .create_async()
        .await;

    let err = client_for(&server).fetch_operations("A1", 0, 5).await.unwrap_err();
    assert_eq!(err, FetchError::Status { status: 500, body: "boom".into() });
}

#[tokio::test]
async fn test_malformed_body_is_decode_error() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/accounts/A1/pageOperations")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body("not json")
        .create_async()
        .await;

    let err = client_for(&server).fetch_operations("A1", 0, 5).await.unwrap_err();
    assert!(matches!(err, FetchError::Decode(_)));
}

#[tokio::test]
async fn test_unknown_operation_type_is_invalid_payload() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/accounts/A1/pageOperations")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(
            r#"{"currentPage":0,"totalPages":1,"pageSize":5,
                "accountOperationDTOS":[{"id":1,"operationDate":0,"amount":1.0,"type":"REFUND"}]}"#,
        )
        .create_async()
        .await;

    let err = client_for(&server).fetch_operations("A1", 0, 5).await.unwrap_err();
    assert!(matches!(err, FetchError::InvalidPayload(_)));
}

#[tokio::test]
async fn test_get_account_normalizes_type() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/accounts/A1")
        .with_status(200)
        .with_body(r#"{"id":"A1","type":"SavingAccount","balance":12.5,"status":"CREATED"}"#)
        .create_async()
        .await;

    let summary = client_for(&server).get_account("A1").await.unwrap();
    assert_eq!(summary.account_type, Some(AccountType::Saving));
    assert_eq!(summary.status.as_deref(), Some("CREATED"));
}

#[tokio::test]
async fn test_debit_posts_query_params() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/accounts/debit/A1")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("amount".into(), "42.5".into()),
            Matcher::UrlEncoded("desc".into(), "weekly groceries".into()),
        ]))
        .with_status(200)
        .create_async()
        .await;

    client_for(&server)
        .debit("A1", Decimal::new(425, 1), Some("weekly groceries"))
        .await
        .unwrap();
    mock.assert_async().await;
}

#[tokio::test]
async fn test_credit_without_description_sends_empty_desc() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/accounts/credit/A1")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("amount".into(), "10.00".into()),
            Matcher::UrlEncoded("desc".into(), "".into()),
        ]))
        .with_status(200)
        .create_async()
        .await;

    client_for(&server)
        .credit("A1", Decimal::new(1000, 2), None)
        .await
        .unwrap();
    mock.assert_async().await;
}

#[tokio::test]
async fn test_transfer_posts_both_accounts() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/accounts/transfer")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("from".into(), "A1".into()),
            Matcher::UrlEncoded("to".into(), "B2".into()),
            Matcher::UrlEncoded("amount".into(), "100".into()),
        ]))
        .with_status(200)
        .create_async()
        .await;

    client_for(&server)
        .transfer("A1", "B2", Decimal::from(100), Some("rent"))
        .await
        .unwrap();
    mock.assert_async().await;
}

#[tokio::test]
async fn test_rejected_mutation_is_status_error() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/accounts/debit/A1")
        .match_query(Matcher::Any)
        .with_status(400)
        .with_body("Balance not sufficient")
        .create_async()
        .await;

    let err = client_for(&server)
        .debit("A1", Decimal::from(5000), None)
        .await
        .unwrap_err();
    assert!(matches!(err, FetchError::Status { status: 400, ref body } if body == "Balance not sufficient"));
}

#[tokio::test]
async fn test_account_id_is_percent_encoded() {
    let mut server = mockito::Server::new_async().await;
    let encoded = server
        .mock("GET", "/accounts/A%2F1%3Fx/pageOperations")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("page".into(), "0".into()),
            Matcher::UrlEncoded("size".into(), "2".into()),
        ]))
        .with_status(200)
        .with_body(r#"{"accountId":"A/1?x","currentPage":0,"totalPages":1,"pageSize":2,"accountOperationDTOS":[]}"#)
        .create_async()
        .await;
    let rerouted = server.mock("GET", Matcher::Regex("^/accounts/A/".into())).expect(0).create_async().await;

    let page = client_for(&server).fetch_operations("A/1?x", 0, 2).await.unwrap();
    encoded.assert_async().await;
    rerouted.assert_async().await;
    assert!(page.items.is_empty());
}

#[tokio::test]
async fn test_ask_uses_chat_base_url() {
    let mut bank = mockito::Server::new_async().await;
    let mut chat = mockito::Server::new_async().await;
    let mock = chat
        .mock("POST", "/ai/chat")
        .match_body(Matcher::Json(serde_json::json!({"message": "hello"})))
        .with_status(200)
        .with_body(r#"{"answer":"Hi there"}"#)
        .create_async()
        .await;
    let _untouched = bank.mock("POST", "/ai/chat").expect(0).create_async().await;

    let client = BankingClient::builder()
        .base_url(bank.url())
        .chat_base_url(format!("{}/", chat.url()))
        .build()
        .unwrap();

    let answer = client.ask("hello").await.unwrap();
    mock.assert_async().await;
    assert_eq!(answer.answer, "Hi there");
}

#[tokio::test]
async fn test_ask_missing_answer_defaults_to_empty() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/ai/chat")
        .with_status(200)
        .with_body("{}")
        .create_async()
        .await;

    let answer = client_for(&server).ask("anything").await.unwrap();
    assert_eq!(answer.answer, "");
}
