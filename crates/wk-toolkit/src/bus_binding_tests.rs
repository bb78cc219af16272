// SPDX-License-Identifier: MIT

use super::*;
use wk_core::host::{FakeDisplayProvider, FakeHostWindow};
use wk_core::SystemClock;
use wk_registry::{WindowStateManager, WindowStoreConfig};
use wk_transport::ChannelTransport;

struct Harness {
    store: Arc<WindowStore<SystemClock>>,
    bus: Arc<MessageBus<SystemClock>>,
    plugin: BusBindingPlugin<SystemClock>,
    _dir: tempfile::TempDir,
}

fn harness() -> Harness {
    let dir = tempfile::tempdir().unwrap();
    let keeper_config = wk_storage::StateKeeperConfig { path: dir.path().join("state.json"), ..Default::default() };
    let keeper = wk_storage::StateKeeper::open(keeper_config, SystemClock);
    let registry = wk_registry::WindowRegistry::new();
    let state = WindowStateManager::new(registry.clone(), keeper, Arc::new(FakeDisplayProvider::default()));
    let store = Arc::new(WindowStore::with_in_memory_context(registry, state, WindowStoreConfig::default()));
    let bus = Arc::new(MessageBus::new(Arc::new(ChannelTransport::new()), SystemClock));
    let plugin = BusBindingPlugin::new(store.clone(), bus.clone());
    Harness { store, bus, plugin, _dir: dir }
}

#[tokio::test]
async fn did_create_registers_the_window_with_the_bus() {
    let harness = harness();
    let id = WindowId::new();
    harness.store.add(id.clone(), "main", Arc::new(FakeHostWindow::new())).unwrap();

    harness.plugin.on_did_create(&id).await.unwrap();

    harness.bus.send_to_window(&id, b"hi".to_vec()).await.unwrap();
}

#[tokio::test]
async fn will_destroy_unregisters_the_window_from_the_bus() {
    let harness = harness();
    let id = WindowId::new();
    harness.store.add(id.clone(), "main", Arc::new(FakeHostWindow::new())).unwrap();
    harness.plugin.on_did_create(&id).await.unwrap();

    harness.plugin.on_will_destroy(&id).await.unwrap();

    assert!(harness.bus.send_to_window(&id, b"hi".to_vec()).await.is_err());
}

#[tokio::test]
async fn bus_event_sink_forwards_emitted_events_to_registered_windows() {
    let harness = harness();
    let id = WindowId::new();
    let host = Arc::new(FakeHostWindow::new());
    harness.bus.register_window(id.clone(), host.clone());

    let sink = BusEventSink::new(harness.bus.clone());
    sink.emit(wk_core::WindowEvent::WindowDestroyed { id }).await;

    assert_eq!(host.sent_messages().len(), 1);
}
