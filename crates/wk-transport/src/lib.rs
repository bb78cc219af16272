// SPDX-License-Identifier: MIT

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! wk-transport: the bus's pluggable duplex carrier between main and a
//! specific window, behind the Port and Channel strategies.

mod transport;

pub use transport::{select_transport, ChannelTransport, OnMessage, PortTransport, Transport};
