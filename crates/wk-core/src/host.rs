// SPDX-License-Identifier: MIT

//! The narrow boundary to the desktop runtime this kit deliberately treats
//! as out of scope: a window primitive, a way to build one, a way to learn
//! the current displays, and the two duplex byte carriers used by the
//! router and the bus transport. Production embedding supplies real
//! desktop-runtime-backed implementations; tests use the in-memory fakes
//! behind the `test-support` feature.

use crate::error::KitError;
use crate::event::CrashReason;
use crate::geometry::DisplayBounds;
use crate::id::SenderId;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Where a newly created window should load its content from.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ContentSource {
    #[default]
    None,
    Url(String),
    File(PathBuf),
}

/// Construction parameters for a new window.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WindowConfig {
    pub name: Option<String>,
    pub width: u32,
    pub height: u32,
    /// Restored/requested position. `None` lets the host runtime pick one.
    pub x: Option<i32>,
    pub y: Option<i32>,
    pub persistent: bool,
    pub development: bool,
    pub groups: Vec<String>,
    pub content: ContentSource,
}

/// A per-window content loader supplied by the host, taking priority over
/// `WindowConfig.content`'s own `loadUrl`/`loadFile` resolution. Called
/// exactly once per newly created window.
#[async_trait]
pub trait ContentLoader: Send + Sync + 'static {
    async fn load(&self, window: &Arc<dyn HostWindow>, config: &WindowConfig) -> Result<(), KitError>;
}

/// A host desktop window. Every operation is expected to no-op silently if
/// the window is already destroyed; implementors, not callers, enforce that.
#[async_trait]
pub trait HostWindow: Send + Sync + 'static {
    fn is_destroyed(&self) -> bool;
    fn show(&self);
    fn hide(&self);
    fn minimize(&self);
    fn restore(&self);
    fn maximize(&self);
    fn unmaximize(&self);
    fn is_maximized(&self) -> bool;
    fn set_fullscreen(&self, enabled: bool);
    fn is_fullscreen(&self) -> bool;
    fn focus(&self);
    fn close(&self);
    fn destroy(&self);
    fn bounds(&self) -> DisplayBounds;
    fn open_dev_tools(&self);
    fn close_dev_tools(&self);
    fn is_dev_tools_opened(&self) -> bool;

    /// Send a message to this window's renderer on a named channel.
    async fn send(&self, channel: &str, data: Vec<u8>) -> Result<(), KitError>;

    /// Hand the renderer-side end of a linked port pair to this window on
    /// a dedicated channel (the Port transport strategy's injection step).
    fn inject_port(&self, channel: &str, port: Arc<dyn PortPair>);

    /// Loads a remote URL into this window's content area.
    async fn load_url(&self, url: &str) -> Result<(), KitError>;

    /// Loads a local file into this window's content area.
    async fn load_file(&self, path: &Path) -> Result<(), KitError>;

    /// Reloads the currently loaded content, e.g. after a crash.
    fn reload(&self);

    /// Registers the callback invoked when the renderer process behind this
    /// window goes away. Replaces any previously registered callback.
    fn on_crash(&self, handler: Arc<dyn Fn(CrashReason, Option<i32>) + Send + Sync>);

    /// Registers the callback invoked when the renderer becomes
    /// unresponsive. Replaces any previously registered callback.
    fn on_unresponsive(&self, handler: Arc<dyn Fn() + Send + Sync>);
}

/// Constructs a `HostWindow` from a `WindowConfig`.
pub trait WindowFactory: Send + Sync + 'static {
    fn create(&self, config: &WindowConfig) -> Arc<dyn HostWindow>;
}

/// Enumerates the current display set.
pub trait DisplayProvider: Send + Sync + 'static {
    fn displays(&self) -> Vec<DisplayBounds>;
}

/// The router's single named duplex channel: many senders multiplexed onto
/// one carrier, identified by `SenderId` on receipt.
#[async_trait]
pub trait RawChannel: Send + Sync + 'static {
    async fn send(&self, sender_id: SenderId, data: Vec<u8>) -> Result<(), KitError>;

    /// Registers the callback invoked for every inbound frame. Replaces any
    /// previously registered callback.
    fn on_message(&self, handler: Arc<dyn Fn(SenderId, Vec<u8>) + Send + Sync>);
}

/// One endpoint of a linked port pair, the bus Transport's Port strategy
/// primitive. A post to a closed port is a no-op, not an error.
pub trait PortPair: Send + Sync + 'static {
    fn post(&self, data: Vec<u8>) -> Result<(), KitError>;
    fn is_closed(&self) -> bool;
    fn close(&self);
}

/// Creates linked port pairs: `(main_side, renderer_side)`.
pub trait PortFactory: Send + Sync + 'static {
    fn create_pair(&self) -> (Arc<dyn PortPair>, Arc<dyn PortPair>);
}

#[cfg(any(test, feature = "test-support"))]
mod fake {
    use super::*;
    use parking_lot::Mutex;

    #[derive(Debug, Clone, PartialEq)]
    pub struct SentMessage {
        pub channel: String,
        pub data: Vec<u8>,
    }

    /// What `load_url`/`load_file` last loaded into a `FakeHostWindow`.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum LoadedContent {
        Url(String),
        File(PathBuf),
    }

    type CrashHandler = Arc<dyn Fn(CrashReason, Option<i32>) + Send + Sync>;
    type UnresponsiveHandler = Arc<dyn Fn() + Send + Sync>;

    struct FakeHostWindowState {
        destroyed: bool,
        visible: bool,
        minimized: bool,
        maximized: bool,
        fullscreen: bool,
        dev_tools_open: bool,
        bounds: DisplayBounds,
        sent: Vec<SentMessage>,
        injected_ports: Vec<String>,
        loaded: Option<LoadedContent>,
        reload_count: u32,
        crash_handler: Option<CrashHandler>,
        unresponsive_handler: Option<UnresponsiveHandler>,
    }

    /// In-memory `HostWindow` for tests. Every mutator just flips a flag and
    /// records the call; nothing here talks to a real GUI toolkit.
    #[derive(Clone)]
    pub struct FakeHostWindow {
        state: Arc<Mutex<FakeHostWindowState>>,
    }

    impl FakeHostWindow {
        pub fn new() -> Self {
            Self {
                state: Arc::new(Mutex::new(FakeHostWindowState {
                    destroyed: false,
                    visible: false,
                    minimized: false,
                    maximized: false,
                    fullscreen: false,
                    dev_tools_open: false,
                    bounds: DisplayBounds { x: 0, y: 0, width: 800, height: 600 },
                    sent: Vec::new(),
                    injected_ports: Vec::new(),
                    loaded: None,
                    reload_count: 0,
                    crash_handler: None,
                    unresponsive_handler: None,
                })),
            }
        }

        pub fn with_bounds(bounds: DisplayBounds) -> Self {
            let window = Self::new();
            window.state.lock().bounds = bounds;
            window
        }

        pub fn sent_messages(&self) -> Vec<SentMessage> {
            self.state.lock().sent.clone()
        }

        pub fn is_visible(&self) -> bool {
            self.state.lock().visible
        }

        pub fn is_minimized(&self) -> bool {
            self.state.lock().minimized
        }

        pub fn is_maximized(&self) -> bool {
            self.state.lock().maximized
        }

        pub fn injected_port_channels(&self) -> Vec<String> {
            self.state.lock().injected_ports.clone()
        }

        pub fn loaded_content(&self) -> Option<LoadedContent> {
            self.state.lock().loaded.clone()
        }

        pub fn reload_count(&self) -> u32 {
            self.state.lock().reload_count
        }

        /// Simulate the host runtime tearing this window down from outside
        /// (e.g. the user closed it), without going through `destroy()`.
        pub fn simulate_destroyed(&self) {
            self.state.lock().destroyed = true;
        }

        /// Simulate the renderer process behind this window going away.
        pub fn simulate_crash(&self, reason: CrashReason, exit_code: Option<i32>) {
            let handler = self.state.lock().crash_handler.clone();
            if let Some(handler) = handler {
                handler(reason, exit_code);
            }
        }

        /// Simulate the renderer becoming unresponsive.
        pub fn simulate_unresponsive(&self) {
            let handler = self.state.lock().unresponsive_handler.clone();
            if let Some(handler) = handler {
                handler();
            }
        }
    }

    impl Default for FakeHostWindow {
        fn default() -> Self {
            Self::new()
        }
    }

    #[async_trait]
    impl HostWindow for FakeHostWindow {
        fn is_destroyed(&self) -> bool {
            self.state.lock().destroyed
        }

        fn show(&self) {
            self.state.lock().visible = true;
        }

        fn hide(&self) {
            self.state.lock().visible = false;
        }

        fn minimize(&self) {
            self.state.lock().minimized = true;
        }

        fn restore(&self) {
            let mut state = self.state.lock();
            state.minimized = false;
            state.maximized = false;
        }

        fn maximize(&self) {
            self.state.lock().maximized = true;
        }

        fn unmaximize(&self) {
            self.state.lock().maximized = false;
        }

        fn is_maximized(&self) -> bool {
            self.state.lock().maximized
        }

        fn set_fullscreen(&self, enabled: bool) {
            self.state.lock().fullscreen = enabled;
        }

        fn is_fullscreen(&self) -> bool {
            self.state.lock().fullscreen
        }

        fn focus(&self) {}

        fn close(&self) {
            self.state.lock().destroyed = true;
        }

        fn destroy(&self) {
            self.state.lock().destroyed = true;
        }

        fn bounds(&self) -> DisplayBounds {
            self.state.lock().bounds
        }

        fn open_dev_tools(&self) {
            self.state.lock().dev_tools_open = true;
        }

        fn close_dev_tools(&self) {
            self.state.lock().dev_tools_open = false;
        }

        fn is_dev_tools_opened(&self) -> bool {
            self.state.lock().dev_tools_open
        }

        async fn send(&self, channel: &str, data: Vec<u8>) -> Result<(), KitError> {
            if self.is_destroyed() {
                return Err(KitError::window("cannot send to a destroyed window"));
            }
            self.state.lock().sent.push(SentMessage { channel: channel.to_string(), data });
            Ok(())
        }

        fn inject_port(&self, channel: &str, _port: Arc<dyn PortPair>) {
            self.state.lock().injected_ports.push(channel.to_string());
        }

        async fn load_url(&self, url: &str) -> Result<(), KitError> {
            if self.is_destroyed() {
                return Err(KitError::window("cannot load content into a destroyed window"));
            }
            self.state.lock().loaded = Some(LoadedContent::Url(url.to_string()));
            Ok(())
        }

        async fn load_file(&self, path: &std::path::Path) -> Result<(), KitError> {
            if self.is_destroyed() {
                return Err(KitError::window("cannot load content into a destroyed window"));
            }
            self.state.lock().loaded = Some(LoadedContent::File(path.to_path_buf()));
            Ok(())
        }

        fn reload(&self) {
            self.state.lock().reload_count += 1;
        }

        fn on_crash(&self, handler: Arc<dyn Fn(CrashReason, Option<i32>) + Send + Sync>) {
            self.state.lock().crash_handler = Some(handler);
        }

        fn on_unresponsive(&self, handler: Arc<dyn Fn() + Send + Sync>) {
            self.state.lock().unresponsive_handler = Some(handler);
        }
    }

    /// Builds `FakeHostWindow`s, ignoring the requested config's content.
    #[derive(Clone, Default)]
    pub struct FakeWindowFactory;

    impl WindowFactory for FakeWindowFactory {
        fn create(&self, _config: &WindowConfig) -> Arc<dyn HostWindow> {
            Arc::new(FakeHostWindow::new())
        }
    }

    /// A fixed, settable display set.
    #[derive(Clone)]
    pub struct FakeDisplayProvider {
        displays: Arc<Mutex<Vec<DisplayBounds>>>,
    }

    impl FakeDisplayProvider {
        pub fn new(displays: Vec<DisplayBounds>) -> Self {
            Self { displays: Arc::new(Mutex::new(displays)) }
        }

        pub fn set_displays(&self, displays: Vec<DisplayBounds>) {
            *self.displays.lock() = displays;
        }
    }

    impl Default for FakeDisplayProvider {
        fn default() -> Self {
            Self::new(vec![DisplayBounds { x: 0, y: 0, width: 1920, height: 1080 }])
        }
    }

    impl DisplayProvider for FakeDisplayProvider {
        fn displays(&self) -> Vec<DisplayBounds> {
            self.displays.lock().clone()
        }
    }

    type MessageHandler = Arc<dyn Fn(SenderId, Vec<u8>) + Send + Sync>;

    struct FakeRawChannelState {
        sent: Vec<(SenderId, Vec<u8>)>,
        handler: Option<MessageHandler>,
    }

    /// In-memory `RawChannel`: `deliver` simulates an inbound frame from a
    /// renderer; `sent_frames` inspects what the router wrote back.
    #[derive(Clone)]
    pub struct FakeRawChannel {
        state: Arc<Mutex<FakeRawChannelState>>,
    }

    impl FakeRawChannel {
        pub fn new() -> Self {
            Self { state: Arc::new(Mutex::new(FakeRawChannelState { sent: Vec::new(), handler: None })) }
        }

        pub fn deliver(&self, sender_id: SenderId, data: Vec<u8>) {
            let handler = self.state.lock().handler.clone();
            if let Some(handler) = handler {
                handler(sender_id, data);
            }
        }

        pub fn sent_frames(&self) -> Vec<(SenderId, Vec<u8>)> {
            self.state.lock().sent.clone()
        }
    }

    impl Default for FakeRawChannel {
        fn default() -> Self {
            Self::new()
        }
    }

    #[async_trait]
    impl RawChannel for FakeRawChannel {
        async fn send(&self, sender_id: SenderId, data: Vec<u8>) -> Result<(), KitError> {
            self.state.lock().sent.push((sender_id, data));
            Ok(())
        }

        fn on_message(&self, handler: MessageHandler) {
            self.state.lock().handler = Some(handler);
        }
    }

    struct FakePortPairState {
        closed: bool,
        posted: Vec<Vec<u8>>,
    }

    /// In-memory `PortPair` endpoint. `peer()` gives the other end so tests
    /// can assert on what crossed the link, mirroring a real linked pair.
    #[derive(Clone)]
    pub struct FakePortPair {
        state: Arc<Mutex<FakePortPairState>>,
        peer: Arc<Mutex<Option<Arc<FakePortPair>>>>,
    }

    impl FakePortPair {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                state: Arc::new(Mutex::new(FakePortPairState { closed: false, posted: Vec::new() })),
                peer: Arc::new(Mutex::new(None)),
            })
        }

        pub fn received(&self) -> Vec<Vec<u8>> {
            self.state.lock().posted.clone()
        }
    }

    impl PortPair for FakePortPair {
        fn post(&self, data: Vec<u8>) -> Result<(), KitError> {
            if self.state.lock().closed {
                return Ok(());
            }
            if let Some(peer) = self.peer.lock().as_ref() {
                peer.state.lock().posted.push(data);
            }
            Ok(())
        }

        fn is_closed(&self) -> bool {
            self.state.lock().closed
        }

        fn close(&self) {
            self.state.lock().closed = true;
        }
    }

    /// Creates linked `FakePortPair`s whose `post` calls deliver directly
    /// to the opposite end, synchronously.
    #[derive(Clone, Default)]
    pub struct FakePortFactory;

    impl FakePortFactory {
        /// Like `create_pair`, but keeps the concrete type so tests can
        /// inspect `received()` on either end.
        pub fn create_concrete_pair() -> (Arc<FakePortPair>, Arc<FakePortPair>) {
            let a = FakePortPair::new();
            let b = FakePortPair::new();
            *a.peer.lock() = Some(b.clone());
            *b.peer.lock() = Some(a.clone());
            (a, b)
        }
    }

    impl PortFactory for FakePortFactory {
        fn create_pair(&self) -> (Arc<dyn PortPair>, Arc<dyn PortPair>) {
            let (a, b) = Self::create_concrete_pair();
            (a, b)
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::{
    FakeDisplayProvider, FakeHostWindow, FakePortFactory, FakePortPair, FakeRawChannel, FakeWindowFactory,
    LoadedContent, SentMessage,
};

#[cfg(test)]
#[path = "host_tests.rs"]
mod tests;
