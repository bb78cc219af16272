// SPDX-License-Identifier: MIT

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! wk-wire: wire shapes for the router channel, the bus transport, and the
//! persisted window-state file.

pub mod bus_message;
pub mod envelope;
pub mod window_state;

pub use bus_message::BusMessage;
pub use envelope::{IpcRequest, IpcResponse};
pub use window_state::{DisplayBounds, WindowStateFile, WindowStateRecord};
