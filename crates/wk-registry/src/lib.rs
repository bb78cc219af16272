// SPDX-License-Identifier: MIT

//! Bidirectional window registry, guarded host-window operations, geometry
//! persistence, and the window store facade that composes them.

pub mod context;
pub mod operator;
pub mod registry;
pub mod state_manager;
pub mod store;

pub use context::{ContextPersistence, InMemoryContextPersistence};
pub use operator::WindowOperator;
pub use registry::WindowRegistry;
pub use state_manager::{GeometryEvent, WindowStateManager};
pub use store::{WindowStore, WindowStoreConfig};
