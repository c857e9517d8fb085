//! Domain models
//!
//! Boundary input is validated when creating these types.
//! Invalid input returns ValidationError, not panic.

pub mod event;
pub mod slug;
pub mod validation;

pub use event::Event;
pub use slug::Slug;
pub use validation::ValidationError;
