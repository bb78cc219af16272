// SPDX-License-Identifier: MIT

use super::*;

#[test]
fn subscribe_then_unsubscribe_clears_the_key() {
    let manager = SubscriptionManager::new();
    let window = WindowId::new();
    manager.subscribe(window.clone(), "theme");
    assert!(manager.has_subscribers("theme"));

    manager.unsubscribe(&window, "theme");
    assert!(!manager.has_subscribers("theme"));
}

#[test]
fn remove_window_drops_it_from_every_key() {
    let manager = SubscriptionManager::new();
    let window = WindowId::new();
    manager.subscribe(window.clone(), "a");
    manager.subscribe(window.clone(), "b");

    manager.remove_window(&window);

    assert!(!manager.has_subscribers("a"));
    assert!(!manager.has_subscribers("b"));
}

#[test]
fn subscribers_lists_only_that_keys_windows() {
    let manager = SubscriptionManager::new();
    let a = WindowId::new();
    let b = WindowId::new();
    manager.subscribe(a.clone(), "theme");
    manager.subscribe(b, "other");

    assert_eq!(manager.subscribers("theme"), vec![a]);
}

#[test]
fn warn_threshold_fires_once_per_key() {
    let manager = SubscriptionManager::new();
    for _ in 0..150 {
        manager.subscribe(WindowId::new(), "busy");
    }
    assert!(manager.has_subscribers("busy"));
}
