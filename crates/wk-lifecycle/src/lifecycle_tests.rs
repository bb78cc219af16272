// SPDX-License-Identifier: MIT

use super::*;
use async_trait::async_trait;
use std::sync::Mutex as StdMutex;
use wk_core::host::FakeHostWindow;
use wk_core::{FakeDisplayProvider, FakeWindowFactory, SystemClock};
use wk_registry::{InMemoryContextPersistence, WindowStateManager, WindowStoreConfig};
use wk_storage::{StateKeeper, StateKeeperConfig};
use wk_wire::WindowStateRecord;

/// Builds real `FakeHostWindow`s like `FakeWindowFactory`, but keeps a handle
/// to every window (and the config it was built from) so tests can inspect
/// them afterward.
#[derive(Default)]
struct RecordingWindowFactory {
    built: StdMutex<Vec<(WindowConfig, Arc<FakeHostWindow>)>>,
}

impl RecordingWindowFactory {
    fn last(&self) -> Arc<FakeHostWindow> {
        self.built.lock().unwrap().last().unwrap().1.clone()
    }

    fn last_config(&self) -> WindowConfig {
        self.built.lock().unwrap().last().unwrap().0.clone()
    }
}

impl WindowFactory for RecordingWindowFactory {
    fn create(&self, config: &WindowConfig) -> Arc<dyn wk_core::HostWindow> {
        let window = Arc::new(FakeHostWindow::new());
        self.built.lock().unwrap().push((config.clone(), window.clone()));
        window
    }
}

fn harness(dir: &std::path::Path) -> WindowLifecycle {
    let registry = wk_registry::WindowRegistry::new();
    let keeper_config = StateKeeperConfig { path: dir.join("state.json"), ..Default::default() };
    let keeper = StateKeeper::open(keeper_config, SystemClock);
    let displays = Arc::new(FakeDisplayProvider::default());
    let state = WindowStateManager::new(registry.clone(), keeper, displays);
    let context = Arc::new(InMemoryContextPersistence::new());
    let store = Arc::new(WindowStore::new(registry, state, context, WindowStoreConfig::default()));
    let factory = Arc::new(FakeWindowFactory);
    let plugins = Arc::new(PluginExecutor::new());
    WindowLifecycle::new(store, factory, plugins, SystemClock)
}

/// Like `harness`, but takes a pre-built `StateKeeper` (so a test can seed
/// persisted geometry before the lifecycle reads it) and a caller-supplied
/// window factory.
fn harness_with(keeper: StateKeeper, factory: Arc<RecordingWindowFactory>) -> WindowLifecycle {
    let registry = wk_registry::WindowRegistry::new();
    let displays = Arc::new(FakeDisplayProvider::default());
    let state = WindowStateManager::new(registry.clone(), keeper, displays);
    let context = Arc::new(InMemoryContextPersistence::new());
    let store = Arc::new(WindowStore::new(registry, state, context, WindowStoreConfig::default()));
    let plugins = Arc::new(PluginExecutor::new());
    WindowLifecycle::new(store, factory, plugins, SystemClock)
}

#[tokio::test]
async fn create_registers_a_window_and_returns_an_id() {
    let dir = tempfile::tempdir().unwrap();
    let lifecycle = harness(dir.path());
    let id = lifecycle.create(WindowConfig { name: Some("main".into()), width: 800, height: 600, ..Default::default() }).await.unwrap();
    assert!(lifecycle.store.registry.get_by_id(&id).is_some());
}

#[tokio::test]
async fn create_is_idempotent_by_name() {
    let dir = tempfile::tempdir().unwrap();
    let lifecycle = harness(dir.path());
    let config = WindowConfig { name: Some("main".into()), width: 800, height: 600, ..Default::default() };
    let first = lifecycle.create(config.clone()).await.unwrap();
    let second = lifecycle.create(config).await.unwrap();
    assert_eq!(first, second);
    assert_eq!(lifecycle.store.registry.count(), 1);
}

#[tokio::test]
async fn create_rejects_a_blank_name() {
    let dir = tempfile::tempdir().unwrap();
    let lifecycle = harness(dir.path());
    let err = lifecycle.create(WindowConfig { name: Some("  ".into()), ..Default::default() }).await.unwrap_err();
    assert_eq!(err.category, wk_core::ErrorCategory::Validation);
}

struct CancellingPlugin;

#[async_trait]
impl crate::plugin::Plugin for CancellingPlugin {
    fn name(&self) -> &str {
        "canceller"
    }

    async fn on_will_create(&self, _config: &WindowConfig) -> crate::plugin::HookOutcome {
        crate::plugin::HookOutcome::Cancelled
    }
}

#[tokio::test]
async fn create_fails_when_a_plugin_cancels() {
    let dir = tempfile::tempdir().unwrap();
    let registry = wk_registry::WindowRegistry::new();
    let keeper_config = StateKeeperConfig { path: dir.path().join("state.json"), ..Default::default() };
    let keeper = StateKeeper::open(keeper_config, SystemClock);
    let displays = Arc::new(FakeDisplayProvider::default());
    let state = WindowStateManager::new(registry.clone(), keeper, displays);
    let context = Arc::new(InMemoryContextPersistence::new());
    let store = Arc::new(WindowStore::new(registry, state, context, WindowStoreConfig::default()));
    let factory = Arc::new(FakeWindowFactory);
    let plugins = Arc::new(PluginExecutor::new());
    plugins.register_plugin(Arc::new(CancellingPlugin));
    let lifecycle = WindowLifecycle::new(store, factory, plugins, SystemClock);

    let err = lifecycle.create(WindowConfig::default()).await.unwrap_err();
    assert_eq!(err.category, wk_core::ErrorCategory::Window);
}

#[tokio::test]
async fn destroy_unregisters_the_window() {
    let dir = tempfile::tempdir().unwrap();
    let lifecycle = harness(dir.path());
    let id = lifecycle.create(WindowConfig { name: Some("main".into()), ..Default::default() }).await.unwrap();

    lifecycle.destroy(&id).await.unwrap();

    assert!(lifecycle.store.registry.get_by_id(&id).is_none());
}

#[tokio::test]
async fn destroy_unknown_window_fails_with_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let lifecycle = harness(dir.path());
    let err = lifecycle.destroy(&WindowId::new()).await.unwrap_err();
    assert_eq!(err.category, wk_core::ErrorCategory::NotFound);
}

#[tokio::test]
async fn recreating_a_live_window_pushes_it_to_the_focus_stack() {
    let dir = tempfile::tempdir().unwrap();
    let lifecycle = harness(dir.path());
    let config = WindowConfig { name: Some("settings".into()), ..Default::default() };
    let id = lifecycle.create(config.clone()).await.unwrap();

    let second = lifecycle.create(config).await.unwrap();

    assert_eq!(id, second);
    assert_eq!(lifecycle.store.focused_window(), Some(id));
}

#[tokio::test]
async fn create_loads_the_configured_url_when_no_custom_loader_is_set() {
    let dir = tempfile::tempdir().unwrap();
    let keeper = StateKeeper::open(StateKeeperConfig { path: dir.path().join("state.json"), ..Default::default() }, SystemClock);
    let factory = Arc::new(RecordingWindowFactory::default());
    let lifecycle = harness_with(keeper, factory.clone());

    lifecycle.create(WindowConfig { content: ContentSource::Url("https://example.com".into()), ..Default::default() }).await.unwrap();

    assert_eq!(factory.last().loaded_content(), Some(wk_core::host::LoadedContent::Url("https://example.com".into())));
}

struct RecordingContentLoader {
    calls: Arc<StdMutex<u32>>,
}

#[async_trait]
impl ContentLoader for RecordingContentLoader {
    async fn load(&self, window: &Arc<dyn wk_core::HostWindow>, _config: &WindowConfig) -> Result<(), KitError> {
        *self.calls.lock().unwrap() += 1;
        window.load_url("custom://loader").await
    }
}

#[tokio::test]
async fn create_prefers_the_custom_content_loader_over_config_content() {
    let dir = tempfile::tempdir().unwrap();
    let keeper = StateKeeper::open(StateKeeperConfig { path: dir.path().join("state.json"), ..Default::default() }, SystemClock);
    let factory = Arc::new(RecordingWindowFactory::default());
    let calls = Arc::new(StdMutex::new(0));
    let lifecycle = harness_with(keeper, factory.clone()).with_content_loader(Arc::new(RecordingContentLoader { calls: calls.clone() }));

    lifecycle.create(WindowConfig { content: ContentSource::Url("https://example.com".into()), ..Default::default() }).await.unwrap();

    assert_eq!(*calls.lock().unwrap(), 1);
    assert_eq!(factory.last().loaded_content(), Some(wk_core::host::LoadedContent::Url("custom://loader".into())));
}

#[tokio::test]
async fn create_restores_persisted_position_and_maximized_state() {
    let dir = tempfile::tempdir().unwrap();
    let keeper = StateKeeper::open(StateKeeperConfig { path: dir.path().join("state.json"), ..Default::default() }, SystemClock);
    keeper.save_state(
        "main",
        WindowStateRecord { x: Some(100), y: Some(50), width: 800, height: 600, is_maximized: true, ..Default::default() },
    );
    let factory = Arc::new(RecordingWindowFactory::default());
    let lifecycle = harness_with(keeper, factory.clone());

    lifecycle
        .create(WindowConfig { name: Some("main".into()), width: 400, height: 300, persistent: true, ..Default::default() })
        .await
        .unwrap();

    let restored_config = factory.last_config();
    assert_eq!(restored_config.x, Some(100));
    assert_eq!(restored_config.y, Some(50));
    assert_eq!(restored_config.width, 800);
    assert!(factory.last().is_maximized());
}

struct RecordingEventSink {
    events: Arc<StdMutex<Vec<WindowEvent>>>,
}

#[async_trait]
impl EventSink for RecordingEventSink {
    async fn emit(&self, event: WindowEvent) {
        self.events.lock().unwrap().push(event);
    }
}

#[tokio::test]
async fn create_and_destroy_emit_the_expected_lifecycle_events() {
    let dir = tempfile::tempdir().unwrap();
    let keeper = StateKeeper::open(StateKeeperConfig { path: dir.path().join("state.json"), ..Default::default() }, SystemClock);
    let factory = Arc::new(RecordingWindowFactory::default());
    let events = Arc::new(StdMutex::new(Vec::new()));
    let lifecycle = harness_with(keeper, factory).with_event_sink(Arc::new(RecordingEventSink { events: events.clone() }));

    let id = lifecycle.create(WindowConfig { name: Some("main".into()), ..Default::default() }).await.unwrap();
    lifecycle.destroy(&id).await.unwrap();

    let recorded = events.lock().unwrap().clone();
    assert_eq!(
        recorded,
        vec![
            WindowEvent::WindowCreated { id: id.clone(), name: "main".to_string() },
            WindowEvent::WindowWillBeDestroyed { id: id.clone() },
            WindowEvent::WindowDestroyed { id },
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn a_crash_reason_of_crashed_emits_and_then_reloads_after_the_fixed_delay() {
    let dir = tempfile::tempdir().unwrap();
    let keeper = StateKeeper::open(StateKeeperConfig { path: dir.path().join("state.json"), ..Default::default() }, SystemClock);
    let factory = Arc::new(RecordingWindowFactory::default());
    let events = Arc::new(StdMutex::new(Vec::new()));
    let lifecycle = harness_with(keeper, factory.clone()).with_event_sink(Arc::new(RecordingEventSink { events: events.clone() }));

    lifecycle.create(WindowConfig { name: Some("main".into()), ..Default::default() }).await.unwrap();
    let window = factory.last();

    window.simulate_crash(wk_core::CrashReason::Crashed, None);
    tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    assert_eq!(window.reload_count(), 0);
    assert!(events.lock().unwrap().iter().any(|e| matches!(e, WindowEvent::WindowCrash { .. })));

    tokio::time::advance(CRASH_RELOAD_DELAY).await;
    tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    assert_eq!(window.reload_count(), 1);
}

#[tokio::test]
async fn an_unresponsive_renderer_emits_without_reloading() {
    let dir = tempfile::tempdir().unwrap();
    let keeper = StateKeeper::open(StateKeeperConfig { path: dir.path().join("state.json"), ..Default::default() }, SystemClock);
    let factory = Arc::new(RecordingWindowFactory::default());
    let events = Arc::new(StdMutex::new(Vec::new()));
    let lifecycle = harness_with(keeper, factory.clone()).with_event_sink(Arc::new(RecordingEventSink { events: events.clone() }));

    lifecycle.create(WindowConfig { name: Some("main".into()), ..Default::default() }).await.unwrap();
    let window = factory.last();

    window.simulate_unresponsive();
    tokio::time::sleep(std::time::Duration::from_millis(10)).await;

    assert!(events.lock().unwrap().iter().any(|e| matches!(e, WindowEvent::WindowUnresponsive { .. })));
    assert_eq!(window.reload_count(), 0);
}
