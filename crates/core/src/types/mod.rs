//! Value types shared by the record schemas.

pub mod email;
pub mod id;

pub use email::{Email, EmailError};
pub use id::*;
