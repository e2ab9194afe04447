//! A minimal service registry.
//!
//! Identifiers are bound to factories that run once ([`Lifetime::Singleton`])
//! or on every resolution ([`Lifetime::Transient`]). Bindings can be locked
//! against unbind and rebind, and the whole binding map can be saved with
//! [`Registry::snapshot`] and brought back with [`Registry::restore`].

pub mod binding;
pub mod config;
pub mod error;
pub mod id;
pub mod registry;
pub mod shared;
pub mod token;

pub use binding::{BindOptions, Binding, Instance, Lifetime};
pub use config::RegistryConfig;
pub use error::{BoxError, Operation, RegistryError, Result};
pub use id::ServiceId;
pub use registry::Registry;
pub use shared::SharedRegistry;
pub use token::Token;
