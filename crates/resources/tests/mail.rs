//! Integration tests for mail domains and mailboxes.

mod common;

use common::{context, FakeApi};
use panel::{MailDomainId, MailUserId, ServerId};
use pretty_assertions::assert_eq;
use resources::{MailDomain, MailDomainSpec, MailInbox, MailInboxSpec, MailInboxState};
use serde_json::json;

fn mail_domain(id: u64, server: u64) -> serde_json::Value {
    json!([{
        "domain_id": id.to_string(),
        "server_id": server.to_string(),
        "domain": "example.com",
        "active": "y",
        "local_delivery": "y"
    }])
}

// ── Mail domains ────────────────────────────────────────────────────────────

#[tokio::test]
async fn mail_domain_create_unwraps_get_response() {
    let api = FakeApi::new();
    api.respond("mail_domain_add", json!("3"))
        .respond("mail_domain_get", mail_domain(3, 1));
    let domains = MailDomain::new(context(&api));

    let state = domains.create(&MailDomainSpec::new("example.com")).await.unwrap();

    let params = &api.calls_to("mail_domain_add")[0]["params"];
    assert_eq!(params["active"], json!("y"));
    assert_eq!(params["local_delivery"], json!("y"));
    assert_eq!(params["server_id"], json!(1));
    assert_eq!(state.id, MailDomainId::new(3));
    assert!(state.local_delivery);
}

#[tokio::test]
async fn mail_domain_disabled_flags_are_sent_explicitly() {
    let api = FakeApi::new();
    api.respond("mail_domain_update", json!(1))
        .respond("mail_domain_get", mail_domain(3, 1));
    let domains = MailDomain::new(context(&api));
    let spec = MailDomainSpec {
        active: false,
        local_delivery: false,
        ..MailDomainSpec::new("example.com")
    };
    let previous = resources::MailDomainState {
        id: MailDomainId::new(3),
        ..Default::default()
    };

    domains.update(&spec, &previous).await.unwrap();

    let params = &api.calls_to("mail_domain_update")[0]["params"];
    assert_eq!(params["active"], json!("n"));
    assert_eq!(params["local_delivery"], json!("n"));
}

// ── Mailboxes ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn mailbox_inherits_server_from_mail_domain() {
    let api = FakeApi::new();
    api.respond("mail_domain_get", mail_domain(3, 5))
        .respond("mail_user_add", json!(12))
        .respond(
            "mail_user_get",
            json!([{
                "mailuser_id": "12",
                "server_id": "5",
                "maildomain_id": "3",
                "email": "info@example.com",
                "login": "info@example.com",
                "password": "$1$hash",
                "maildir": "/var/vmail/example.com/info",
                "quota": "1073741824",
                "cc": "",
                "sender_cc": "archive@example.com",
                "move_junk": "n",
                "purge_trash_days": "30",
                "purge_junk_days": "0"
            }]),
        );
    let inboxes = MailInbox::new(context(&api));
    let spec = MailInboxSpec {
        quota: Some(1_073_741_824),
        forward_outgoing_to: Some("archive@example.com".into()),
        purge_trash_days: 30,
        ..MailInboxSpec::new(MailDomainId::new(3), "info@example.com", "s3cret")
    };

    let state = inboxes.create(&spec).await.unwrap();

    let params = &api.calls_to("mail_user_add")[0]["params"];
    assert_eq!(params["server_id"], json!(5));
    assert_eq!(params["maildomain_id"], json!(3));
    assert_eq!(params["login"], json!("info@example.com"));
    assert_eq!(params["sender_cc"], json!("archive@example.com"));
    assert_eq!(params["purge_trash_days"], json!("30"));
    assert_eq!(params["move_junk"], json!("n"));
    assert_eq!(state.id, MailUserId::new(12));
    assert_eq!(state.server_id, Some(ServerId::new(5)));
    assert_eq!(state.password, "s3cret");
    assert_eq!(state.forward_incoming_to, None);
    assert_eq!(state.purge_trash_days, 30);
}

#[tokio::test]
async fn mailbox_with_explicit_server_skips_mail_domain_lookup() {
    let api = FakeApi::new();
    api.respond("mail_user_update", json!(1)).respond(
        "mail_user_get",
        json!([{"mailuser_id": 12, "server_id": 9, "email": "info@example.com"}]),
    );
    let inboxes = MailInbox::new(context(&api));
    let spec = MailInboxSpec {
        server_id: Some(ServerId::new(9)),
        ..MailInboxSpec::new(MailDomainId::new(3), "info@example.com", "s3cret")
    };
    let previous = MailInboxState {
        id: MailUserId::new(12),
        ..Default::default()
    };

    inboxes.update(&spec, &previous).await.unwrap();

    assert!(api.calls_to("mail_domain_get").is_empty());
    assert_eq!(api.calls_to("mail_user_update")[0]["primary_id"], json!(12));
}

#[tokio::test]
async fn mailbox_read_of_empty_payload_is_not_found() {
    let api = FakeApi::new();
    api.respond("mail_user_get", json!({}));
    let inboxes = MailInbox::new(context(&api));
    let state = MailInboxState {
        id: MailUserId::new(12),
        ..Default::default()
    };

    assert!(inboxes.read(&state).await.unwrap_err().is_not_found());
}
