//! `shoplist-core` — domain building blocks shared by the product list.
//!
//! Pure domain primitives only: identifiers, the error type, and the traits the
//! list store is modelled with. No IO, no UI.

pub mod aggregate;
pub mod entity;
pub mod error;
pub mod event;
pub mod id;

pub use aggregate::{Aggregate, AggregateRoot};
pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use event::Event;
pub use id::AggregateId;
