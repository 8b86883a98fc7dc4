//! Integration tests for the read-only customer lookups.

mod common;

use common::{context, FakeApi};
use panel::{ClientId, PanelError};
use pretty_assertions::assert_eq;
use resources::Customers;
use serde_json::json;

#[tokio::test]
async fn customers_list_accepts_keyed_object() {
    let api = FakeApi::new();
    api.respond(
        "client_get_all",
        json!({
            "0": {"client_id": "2", "company_name": "Acme"},
            "1": {"client_id": "3", "company_name": "Initech"}
        }),
    );
    let customers = Customers::new(context(&api));

    let all = customers.list().await.unwrap();

    assert_eq!(all.len(), 2);
    assert_eq!(all[0].company_name.as_deref(), Some("Acme"));
}

#[tokio::test]
async fn customer_get_uses_client_id_param() {
    let api = FakeApi::new();
    api.respond("client_get", json!({"client_id": 2, "company_name": "Acme"}));
    let customers = Customers::new(context(&api));

    let customer = customers.get(ClientId::new(2)).await.unwrap();

    assert_eq!(customer.company_name.as_deref(), Some("Acme"));
    assert_eq!(api.calls_to("client_get")[0]["client_id"], json!(2));
}

#[tokio::test]
async fn customers_list_treats_false_as_empty() {
    let api = FakeApi::new();
    api.respond("client_get_all", json!(false));
    let customers = Customers::new(context(&api));

    assert!(customers.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn missing_customer_is_not_found() {
    let api = FakeApi::new();
    api.respond("client_get", json!([]));
    let customers = Customers::new(context(&api));

    let err = customers.get(ClientId::new(9)).await.unwrap_err();

    assert!(err.is_not_found());
    assert!(matches!(err, PanelError::Operation { action: "get", .. }));
}
