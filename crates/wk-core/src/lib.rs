// SPDX-License-Identifier: MIT

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! wk-core: shared identifiers, clock, error taxonomy, and lifecycle events
//! for the window kit.

pub mod macros;

pub mod clock;
pub mod error;
pub mod event;
pub mod geometry;
pub mod host;
pub mod id;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use clock::{Clock, FakeClock, SystemClock};
pub use error::{ErrorCategory, KitError};
pub use event::{CrashReason, EventSink, NoopEventSink, WindowEvent};
pub use geometry::DisplayBounds;
pub use host::{ContentLoader, ContentSource, DisplayProvider, HostWindow, PortFactory, PortPair, RawChannel, WindowConfig, WindowFactory};
pub use id::{SenderId, WindowId};

#[cfg(any(test, feature = "test-support"))]
pub use host::{
    FakeDisplayProvider, FakeHostWindow, FakePortFactory, FakePortPair, FakeRawChannel, FakeWindowFactory,
};
