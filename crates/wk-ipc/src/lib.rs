// SPDX-License-Identifier: MIT

//! Typed request router: a handler registry with schema validation and rate
//! limiting, dispatched over a raw duplex channel.

pub mod dispatcher;
pub mod handler;
pub mod rate_limit;
pub mod router;

pub use dispatcher::MessageDispatcher;
pub use handler::IpcHandler;
pub use rate_limit::{RateLimitConfig, RateLimiter};
pub use router::{IpcRouter, RouterConfig};
