//! Entity models split into domain-specific modules.

pub mod common;
pub mod favorite;
pub mod message;
pub mod pet;
pub mod user;

pub use common::*;
pub use favorite::*;
pub use message::*;
pub use pet::*;
pub use user::*;
