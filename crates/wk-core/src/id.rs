// SPDX-License-Identifier: MIT

//! Opaque identifier types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Define a newtype id wrapper around an opaque UUID string.
///
/// Generates `new()` (random v4 UUID), `from_string()`, `as_str()`, `Display`,
/// `From<String>`, `From<&str>`, `PartialEq<str>`, `PartialEq<&str>`,
/// `Borrow<str>` and `Deref` implementations.
#[macro_export]
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        pub struct $name:ident;
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            /// Generate a new random id (UUID v4, textual form).
            pub fn new() -> Self {
                Self(uuid::Uuid::new_v4().to_string())
            }

            /// Build an id from an existing opaque string (deserialization, tests, wire).
            pub fn from_string(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self::from_string(s)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self::from_string(s)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl PartialEq<str> for $name {
            fn eq(&self, other: &str) -> bool {
                self.0 == other
            }
        }

        impl PartialEq<&str> for $name {
            fn eq(&self, other: &&str) -> bool {
                self.0 == *other
            }
        }

        impl std::borrow::Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }

        impl std::ops::Deref for $name {
            type Target = str;

            fn deref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_id! {
    /// Identifies a single managed window. Unrelated to its `name`, which is
    /// the caller-chosen unique handle (see `WindowRegistry`).
    pub struct WindowId;
}

/// Stable integer identifying the originator of a router request.
///
/// Supplied by the host runtime (e.g. a renderer process id); opaque to the
/// router beyond its use as a rate-limit and permission key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SenderId(pub i64);

impl SenderId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }
}

impl fmt::Display for SenderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for SenderId {
    fn from(v: i64) -> Self {
        Self(v)
    }
}

#[cfg(test)]
#[path = "id_tests.rs"]
mod tests;
