// SPDX-License-Identifier: MIT

//! Create/destroy orchestration: validates config, runs plugin hooks,
//! resolves name collisions, restores persisted geometry, and measures
//! creation latency.

use std::sync::Arc;
use std::time::Duration;
use wk_core::{
    Clock, ContentLoader, ContentSource, CrashReason, EventSink, HostWindow, KitError, NoopEventSink, WindowConfig, WindowEvent,
    WindowFactory, WindowId,
};
use wk_registry::WindowStore;

use crate::executor::PluginExecutor;

const SLOW_CREATE_WARN: Duration = Duration::from_secs(2);
const CRASH_RELOAD_DELAY: Duration = Duration::from_secs(1);

pub struct WindowLifecycle<C: Clock = wk_core::SystemClock> {
    store: Arc<WindowStore<C>>,
    factory: Arc<dyn WindowFactory>,
    plugins: Arc<PluginExecutor>,
    clock: C,
    events: Arc<dyn EventSink>,
    content_loader: Option<Arc<dyn ContentLoader>>,
}

impl<C: Clock> WindowLifecycle<C> {
    pub fn new(store: Arc<WindowStore<C>>, factory: Arc<dyn WindowFactory>, plugins: Arc<PluginExecutor>, clock: C) -> Self {
        Self { store, factory, plugins, clock, events: Arc::new(NoopEventSink), content_loader: None }
    }

    /// Delivers `window-created`/`window-destroyed`/`window-crash`/etc to
    /// `sink` instead of dropping them. See the "cyclic references" design
    /// note: the lifecycle emits, whatever consumes stays decoupled from it.
    pub fn with_event_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.events = sink;
        self
    }

    /// Overrides per-window content resolution (`WindowConfig.content`'s own
    /// `loadUrl`/`loadFile`) with a host-supplied loader.
    pub fn with_content_loader(mut self, loader: Arc<dyn ContentLoader>) -> Self {
        self.content_loader = Some(loader);
        self
    }

    fn validate(config: &WindowConfig) -> Result<(), KitError> {
        if let Some(name) = &config.name {
            if name.trim().is_empty() {
                return Err(KitError::validation("window name must not be empty"));
            }
        }
        Ok(())
    }

    /// Creates a window, or returns the id of an existing live window with
    /// the same name (creation is idempotent by name).
    pub async fn create(&self, mut config: WindowConfig) -> Result<WindowId, KitError> {
        Self::validate(&config)?;

        let started = self.clock.now();

        let Some(gated_config) = self.plugins.will_create(config.clone()).await else {
            return Err(KitError::window("creation cancelled by plugin"));
        };
        config = gated_config;

        if let Some(name) = &config.name {
            if let Some(existing_id) = self.store.registry.get_id_by_name(name) {
                if let Some(window) = self.store.registry.get_by_id(&existing_id) {
                    if !window.is_destroyed() {
                        self.store.operator.focus(&existing_id);
                        self.store.operator.restore(&existing_id);
                        self.store.focus(&existing_id);
                        return Ok(existing_id);
                    }
                }
            }
        }

        let mut restored_maximized = false;
        let mut restored_full_screen = false;
        if config.persistent {
            if let Some(name) = &config.name {
                let restored = self.store.state.restore(name, config.width, config.height);
                config.width = restored.width;
                config.height = restored.height;
                config.x = restored.x;
                config.y = restored.y;
                restored_maximized = restored.is_maximized;
                restored_full_screen = restored.is_full_screen;
            }
        }

        let window = self.factory.create(&config);
        let id = WindowId::new();
        let name = config.name.clone().unwrap_or_else(|| id.to_string());
        self.store.add(id.clone(), name.clone(), window.clone())?;
        for group in &config.groups {
            self.store.registry.add_to_group(&id, group.clone());
        }

        if restored_maximized {
            window.maximize();
        }
        if restored_full_screen {
            window.set_fullscreen(true);
        }

        if config.development {
            window.open_dev_tools();
        }

        if config.persistent {
            self.store.state.manage(id.clone(), &name);
        }

        self.wire_crash_handlers(id.clone(), window.clone());
        self.load_content(&window, &config).await;

        self.plugins.did_create(&id).await;
        self.events.emit(WindowEvent::WindowCreated { id: id.clone(), name }).await;

        let elapsed = self.clock.now().saturating_duration_since(started);
        if elapsed > SLOW_CREATE_WARN {
            tracing::warn!(%id, elapsed_ms = elapsed.as_millis() as u64, "window creation took longer than expected");
        }

        Ok(id)
    }

    /// Custom loader wins when set; otherwise falls back to `config.content`.
    /// Failures are logged, not propagated: a window with no content loaded
    /// is still a usable window.
    async fn load_content(&self, window: &Arc<dyn HostWindow>, config: &WindowConfig) {
        if let Some(loader) = &self.content_loader {
            if let Err(err) = loader.load(window, config).await {
                tracing::warn!(error = %err, "custom content loader failed");
            }
            return;
        }
        let result = match &config.content {
            ContentSource::Url(url) => Some(window.load_url(url).await),
            ContentSource::File(path) => Some(window.load_file(path).await),
            ContentSource::None => None,
        };
        if let Some(Err(err)) = result {
            tracing::warn!(error = %err, "failed to load window content");
        }
    }

    /// Registers crash/unresponsive callbacks that emit events and, for a
    /// renderer-process-gone crash, reload the window after a fixed delay.
    fn wire_crash_handlers(&self, id: WindowId, window: Arc<dyn HostWindow>) {
        let events = self.events.clone();
        let crash_window = window.clone();
        let crash_id = id.clone();
        window.on_crash(Arc::new(move |reason, exit_code| {
            let events = events.clone();
            let window = crash_window.clone();
            let id = crash_id.clone();
            tokio::spawn(async move {
                events.emit(WindowEvent::WindowCrash { id, reason, exit_code }).await;
                if matches!(reason, CrashReason::Crashed | CrashReason::Oom) {
                    tokio::time::sleep(CRASH_RELOAD_DELAY).await;
                    if !window.is_destroyed() {
                        window.reload();
                    }
                }
            });
        }));

        let events = self.events.clone();
        window.on_unresponsive(Arc::new(move || {
            let events = events.clone();
            let id = id.clone();
            tokio::spawn(async move {
                events.emit(WindowEvent::WindowUnresponsive { id }).await;
            });
        }));
    }

    pub async fn destroy(&self, id: &WindowId) -> Result<(), KitError> {
        if self.store.registry.get_by_id(id).is_none() {
            return Err(KitError::not_found(format!("unknown window {id}")));
        }

        self.plugins.will_destroy(id).await;
        self.events.emit(WindowEvent::WindowWillBeDestroyed { id: id.clone() }).await;

        if let Some(window) = self.store.registry.get_by_id(id) {
            window.close();
            if !window.is_destroyed() {
                window.destroy();
            }
        }

        self.store.remove(id).await?;
        self.plugins.did_destroy(id).await;
        self.events.emit(WindowEvent::WindowDestroyed { id: id.clone() }).await;
        Ok(())
    }

    /// The delay the host should wait before reloading a window whose
    /// renderer process went away (reasons `crashed`/`oom`).
    pub fn crash_reload_delay() -> Duration {
        CRASH_RELOAD_DELAY
    }
}

#[cfg(test)]
#[path = "lifecycle_tests.rs"]
mod tests;
