// SPDX-License-Identifier: MIT

use super::*;
use wk_core::FakeHostWindow;

fn setup() -> (WindowOperator, WindowId, FakeHostWindow) {
    let registry = WindowRegistry::new();
    let fake = FakeHostWindow::new();
    let id = WindowId::new();
    registry.register(id.clone(), "main", Arc::new(fake.clone()));
    (WindowOperator::new(registry), id, fake)
}

#[test]
fn show_and_hide_affect_a_live_window() {
    let (operator, id, fake) = setup();
    operator.show(&id);
    assert!(fake.is_visible());
    operator.hide(&id);
    assert!(!fake.is_visible());
}

#[test]
fn operations_on_a_destroyed_window_are_silent_noops() {
    let (operator, id, fake) = setup();
    fake.destroy();
    operator.show(&id);
    assert!(!fake.is_visible());
}

#[test]
fn operations_on_an_unknown_id_are_silent_noops() {
    let (operator, _id, _fake) = setup();
    operator.show(&WindowId::new());
}

#[tokio::test]
async fn send_to_unknown_window_errors() {
    let (operator, _id, _fake) = setup();
    let err = operator.send(&WindowId::new(), "ping", vec![]).await.unwrap_err();
    assert_eq!(err.category, wk_core::ErrorCategory::Transport);
}

#[tokio::test]
async fn send_to_live_window_succeeds() {
    let (operator, id, fake) = setup();
    operator.send(&id, "ping", vec![1]).await.unwrap();
    assert_eq!(fake.sent_messages().len(), 1);
}

#[test]
fn toggle_fullscreen_flips_state() {
    let (operator, id, fake) = setup();
    assert!(!fake.is_fullscreen());
    operator.toggle_fullscreen(&id);
    assert!(fake.is_fullscreen());
    operator.toggle_fullscreen(&id);
    assert!(!fake.is_fullscreen());
}
