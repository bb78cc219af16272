// SPDX-License-Identifier: MIT

use super::*;
use serde_json::json;
use wk_core::host::FakeHostWindow;
use wk_core::SystemClock;
use wk_transport::ChannelTransport;

fn harness() -> (Arc<MessageBus<SystemClock>>, BusDispatcher<SystemClock>) {
    let bus = Arc::new(MessageBus::new(Arc::new(ChannelTransport::new()), SystemClock));
    let dispatcher = BusDispatcher::new(bus.clone());
    (bus, dispatcher)
}

#[tokio::test]
async fn get_replies_with_a_get_response_carrying_the_same_request_id() {
    let (bus, dispatcher) = harness();
    let window = WindowId::new();
    let host = Arc::new(FakeHostWindow::new());
    bus.register_window(window.clone(), host.clone());
    bus.set_data("theme", json!("dark"), None, false).await.unwrap();

    dispatcher
        .dispatch(window, BusMessage::Get { key: "theme".into(), request_id: "req-1".into() })
        .await;

    let sent = host.sent_messages();
    assert_eq!(sent.len(), 1);
    let reply: BusMessage = serde_json::from_slice(&sent[0].data).unwrap();
    match reply {
        BusMessage::GetResponse { request_id, value } => {
            assert_eq!(request_id, "req-1");
            assert_eq!(value, Some(json!("dark")));
        }
        other => panic!("unexpected reply: {other:?}"),
    }
}

#[tokio::test]
async fn set_then_delete_round_trip_through_the_store() {
    let (bus, dispatcher) = harness();
    let window = WindowId::new();

    dispatcher.dispatch(window.clone(), BusMessage::Set { key: "theme".into(), value: json!("dark") }).await;
    assert_eq!(bus.get("theme"), Some(json!("dark")));

    dispatcher.dispatch(window, BusMessage::Delete { key: "theme".into() }).await;
    assert_eq!(bus.get("theme"), None);
}

#[tokio::test]
async fn subscribe_then_unsubscribe_toggles_bus_subscriptions() {
    let (bus, dispatcher) = harness();
    let window = WindowId::new();

    dispatcher.dispatch(window.clone(), BusMessage::Subscribe { key: "theme".into() }).await;
    assert!(bus.subscriptions.has_subscribers("theme"));

    dispatcher.dispatch(window, BusMessage::Unsubscribe { key: "theme".into() }).await;
    assert!(!bus.subscriptions.has_subscribers("theme"));
}

#[tokio::test]
async fn transaction_start_commit_applies_buffered_writes() {
    let (bus, dispatcher) = harness();
    let window = WindowId::new();

    dispatcher.dispatch(window.clone(), BusMessage::TransactionStart).await;
    dispatcher.dispatch(window.clone(), BusMessage::Set { key: "theme".into(), value: json!("dark") }).await;
    assert_eq!(bus.get("theme"), None);

    dispatcher.dispatch(window, BusMessage::Commit).await;
    assert_eq!(bus.get("theme"), Some(json!("dark")));
}

#[tokio::test]
async fn transaction_rollback_discards_buffered_writes() {
    let (bus, dispatcher) = harness();
    let window = WindowId::new();

    dispatcher.dispatch(window.clone(), BusMessage::TransactionStart).await;
    dispatcher.dispatch(window.clone(), BusMessage::Set { key: "theme".into(), value: json!("dark") }).await;
    dispatcher.dispatch(window, BusMessage::Rollback).await;

    assert_eq!(bus.get("theme"), None);
}

#[tokio::test]
async fn send_to_group_uses_the_configured_resolver() {
    let (bus, dispatcher) = harness();
    let member = WindowId::new();
    let non_member = WindowId::new();
    let member_host = Arc::new(FakeHostWindow::new());
    let non_member_host = Arc::new(FakeHostWindow::new());
    bus.register_window(member.clone(), member_host.clone());
    bus.register_window(non_member.clone(), non_member_host.clone());

    dispatcher.set_group_resolver(Arc::new(move |_group| vec![member.clone()]));
    dispatcher
        .dispatch(WindowId::new(), BusMessage::SendToGroup { group: "toolbars".into(), payload: json!({"ping": true}) })
        .await;

    assert_eq!(member_host.sent_messages().len(), 1);
    assert!(non_member_host.sent_messages().is_empty());
}

#[tokio::test]
async fn send_to_group_without_a_resolver_is_a_no_op() {
    let (bus, dispatcher) = harness();
    let window = WindowId::new();
    let host = Arc::new(FakeHostWindow::new());
    bus.register_window(window, host.clone());

    dispatcher
        .dispatch(WindowId::new(), BusMessage::SendToGroup { group: "toolbars".into(), payload: json!(null) })
        .await;

    assert!(host.sent_messages().is_empty());
}
