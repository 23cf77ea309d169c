//! # Feature: Deadline Tasks
//!
//! Registration, storage and listing of deadline tasks.
//!
//! - **Version**: 1.1.0
//! - **Since**: 1.0.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.1.0: Typed registration errors, legacy task file compatibility
//! - 1.0.0: Initial release

pub mod error;
pub mod model;
pub mod query;
pub mod registration;
pub mod store;

pub use error::{DeliveryError, RegistrationError};
pub use model::{StoredTime, Task};
pub use query::{render_task_list, TaskQuery};
pub use registration::{confirmation_message, RegistrationRequest, TaskRegistrar};
pub use store::TaskStore;
