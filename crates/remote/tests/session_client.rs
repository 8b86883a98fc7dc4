use std::sync::Arc;
use std::time::Duration;

use panel::{
    ClientId, Customer, Identifier, MailDomain, MailDomainId, MailUser, MailUserId, PanelError,
    PhpHandler, PhpId, RemoteApi, ServerId, WebDomain, WebDomainId,
};
use pretty_assertions::assert_eq;
use remote::{discover_php_versions, ClientConfig, Operations, SessionClient};
use serde_json::{json, Value};
use wiremock::matchers::{body_partial_json, method};
use wiremock::{Match, Mock, MockServer, Request, ResponseTemplate};

/// Matches the RPC method carried as the bare query string.
struct Rpc(&'static str);

impl Match for Rpc {
    fn matches(&self, request: &Request) -> bool {
        request.url.path() == "/remote/json.php" && request.url.query() == Some(self.0)
    }
}

fn ok(response: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({"code": "ok", "message": "", "response": response}))
}

fn fault(message: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_json(json!({"code": "remote_fault", "message": message, "response": false}))
}

fn config(server: &MockServer) -> ClientConfig {
    ClientConfig::new(format!("{}/remote/json.php", server.uri()), "admin", "secret")
}

async fn logged_in(server: &MockServer) -> Arc<SessionClient> {
    Mock::given(method("POST"))
        .and(Rpc("login"))
        .and(body_partial_json(json!({"username": "admin", "password": "secret"})))
        .respond_with(ok(json!("sess-1")))
        .expect(1)
        .mount(server)
        .await;
    let client = SessionClient::new(config(server)).unwrap();
    client.login().await.unwrap();
    Arc::new(client)
}

// ── Login / logout ──────────────────────────────────────────────

#[tokio::test]
async fn login_stores_token_and_calls_carry_it() {
    let server = MockServer::start().await;
    let client = logged_in(&server).await;
    assert!(client.is_authenticated().await);

    Mock::given(method("POST"))
        .and(Rpc("client_get_all"))
        .and(body_partial_json(json!({"session_id": "sess-1"})))
        .respond_with(ok(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let response = client.call("client_get_all", Default::default()).await.unwrap();
    assert_eq!(response, json!([]));
}

#[tokio::test]
async fn refused_login_is_an_authentication_error() {
    let server = MockServer::start().await;
    Mock::given(Rpc("login"))
        .respond_with(fault("The login failed. Username or password wrong."))
        .mount(&server)
        .await;

    let client = SessionClient::new(config(&server)).unwrap();
    let err = client.login().await.unwrap_err();
    match err {
        PanelError::Authentication { message } => assert!(message.contains("Username or password wrong")),
        other => panic!("unexpected error: {other}"),
    }
    assert!(!client.is_authenticated().await);
}

#[tokio::test]
async fn login_without_string_token_is_an_authentication_error() {
    let server = MockServer::start().await;
    Mock::given(Rpc("login")).respond_with(ok(json!(false))).mount(&server).await;

    let client = SessionClient::new(config(&server)).unwrap();
    let err = client.login().await.unwrap_err();
    assert!(matches!(err, PanelError::Authentication { .. }));
}

#[tokio::test]
async fn logout_clears_token_even_when_remote_fails() {
    let server = MockServer::start().await;
    let client = logged_in(&server).await;
    Mock::given(Rpc("logout"))
        .and(body_partial_json(json!({"session_id": "sess-1"})))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    client.logout().await;
    assert!(!client.is_authenticated().await);
}

// ── Transport and protocol failures ─────────────────────────────

#[tokio::test]
async fn remote_fault_is_a_protocol_error_with_message() {
    let server = MockServer::start().await;
    let client = logged_in(&server).await;
    Mock::given(Rpc("sites_web_domain_delete"))
        .respond_with(fault("domain_id does not exist"))
        .mount(&server)
        .await;

    let err = Operations::<WebDomain>::new(client)
        .delete(WebDomainId::new(42))
        .await
        .unwrap_err();
    let message = err.to_string();
    assert!(message.contains("delete web domain 42"), "{message}");
    match err.root() {
        PanelError::Protocol { code, message, .. } => {
            assert_eq!(code, "remote_fault");
            assert_eq!(message, "domain_id does not exist");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn http_error_status_is_a_transport_error() {
    let server = MockServer::start().await;
    let client = logged_in(&server).await;
    Mock::given(Rpc("client_get"))
        .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
        .mount(&server)
        .await;

    let err = client.call("client_get", Default::default()).await.unwrap_err();
    assert!(matches!(err, PanelError::Transport { ref message, .. } if message.contains("502")));
}

#[tokio::test]
async fn unparseable_body_is_a_transport_error() {
    let server = MockServer::start().await;
    let client = logged_in(&server).await;
    Mock::given(Rpc("client_get"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let err = client.call("client_get", Default::default()).await.unwrap_err();
    assert!(matches!(err, PanelError::Transport { .. }));
}

#[tokio::test]
async fn slow_response_times_out() {
    let server = MockServer::start().await;
    Mock::given(Rpc("login"))
        .respond_with(ok(json!("sess-1")).set_delay(Duration::from_millis(500)))
        .mount(&server)
        .await;

    let client =
        SessionClient::new(config(&server).with_timeout(Duration::from_millis(50))).unwrap();
    let err = client.login().await.unwrap_err();
    assert!(matches!(err, PanelError::Transport { .. }));
}

// ── Operations over HTTP ────────────────────────────────────────

#[tokio::test]
async fn add_sends_client_and_params_and_decodes_string_id() {
    let server = MockServer::start().await;
    let client = logged_in(&server).await;
    Mock::given(Rpc("sites_web_domain_add"))
        .and(body_partial_json(json!({
            "client_id": 2,
            "params": {"domain": "example.com", "server_id": 1, "disable_symlinknotowner": "n"}
        })))
        .respond_with(ok(json!("17")))
        .expect(1)
        .mount(&server)
        .await;

    let record = WebDomain {
        domain: "example.com".into(),
        server_id: Some(ServerId::new(1)),
        ..Default::default()
    };
    let id = Operations::<WebDomain>::new(client)
        .add(&record, ClientId::new(2))
        .await
        .unwrap();
    assert_eq!(id, WebDomainId::new(17));
}

#[tokio::test]
async fn mail_domain_get_unwraps_single_element_array() {
    let server = MockServer::start().await;
    let client = logged_in(&server).await;
    Mock::given(Rpc("mail_domain_get"))
        .and(body_partial_json(json!({"primary_id": 4})))
        .respond_with(ok(json!([{
            "domain_id": "4",
            "server_id": "1",
            "domain": "example.com",
            "active": "y",
            "local_delivery": "y"
        }])))
        .mount(&server)
        .await;

    let domain = Operations::<MailDomain>::new(client)
        .get(MailDomainId::new(4))
        .await
        .unwrap();
    assert_eq!(domain.id, Some(MailDomainId::new(4)));
    assert_eq!(domain.server_id, Some(ServerId::new(1)));
    assert!(domain.active);
}

#[tokio::test]
async fn mail_user_get_unwraps_single_element_array() {
    let server = MockServer::start().await;
    let client = logged_in(&server).await;
    Mock::given(Rpc("mail_user_get"))
        .and(body_partial_json(json!({"primary_id": 12})))
        .respond_with(ok(json!([{
            "mailuser_id": "12",
            "server_id": "1",
            "maildomain_id": "4",
            "email": "info@example.com",
            "move_junk": "n",
            "purge_trash_days": "0",
            "purge_junk_days": "0"
        }])))
        .mount(&server)
        .await;

    let inbox = Operations::<MailUser>::new(client)
        .get(MailUserId::new(12))
        .await
        .unwrap();
    assert_eq!(inbox.id, Some(MailUserId::new(12)));
    assert_eq!(inbox.mail_domain_id, Some(MailDomainId::new(4)));
    assert_eq!(inbox.email, "info@example.com");
}

#[tokio::test]
async fn customer_get_uses_client_id_parameter() {
    let server = MockServer::start().await;
    let client = logged_in(&server).await;
    Mock::given(Rpc("client_get"))
        .and(body_partial_json(json!({"client_id": 2})))
        .respond_with(ok(json!({"client_id": "2", "company_name": "Acme"})))
        .expect(1)
        .mount(&server)
        .await;

    let customer = Operations::<Customer>::new(client)
        .get(ClientId::new(2))
        .await
        .unwrap();
    assert_eq!(customer.company_name.as_deref(), Some("Acme"));
}

async fn discover(response: Value) -> panel::PhpCatalog {
    let server = MockServer::start().await;
    let client = logged_in(&server).await;
    Mock::given(Rpc("server_get_php_versions"))
        .and(body_partial_json(json!({"server_id": 1, "php": "php-fpm"})))
        .respond_with(ok(response))
        .expect(1)
        .mount(&server)
        .await;

    discover_php_versions(&*client, ServerId::new(1), &PhpHandler::default())
        .await
        .unwrap()
}

fn assert_labels_round_trip(catalog: &panel::PhpCatalog) {
    assert!(!catalog.is_empty());
    for label in catalog.labels() {
        let id = catalog.to_id(label).unwrap();
        assert!(!id.is_unset(), "{label} mapped to id 0");
        assert_eq!(catalog.to_label(id), Some(label));
    }
}

#[tokio::test]
async fn discovers_php_versions_from_keyed_object() {
    let catalog = discover(json!({
        "11": "PHP 8.4:/etc/init.d/php8.4-fpm",
        "7": "PHP 8.2:/etc/init.d/php8.2-fpm"
    }))
    .await;

    assert_eq!(catalog.to_id("8.4").unwrap(), PhpId::new(11));
    assert_eq!(catalog.to_label(PhpId::new(7)), Some("8.2"));
    assert_labels_round_trip(&catalog);
}

#[tokio::test]
async fn discovers_php_versions_from_plain_list() {
    let catalog = discover(json!([
        "PHP 7.4:/etc/init.d/php7.4-fpm",
        "PHP 8.2:/etc/init.d/php8.2-fpm",
        "PHP 8.4:/etc/init.d/php8.4-fpm"
    ]))
    .await;

    assert_eq!(catalog.labels(), vec!["7.4", "8.2", "8.4"]);
    assert_eq!(catalog.to_id("7.4").unwrap(), PhpId::new(1));
    assert_labels_round_trip(&catalog);
}
