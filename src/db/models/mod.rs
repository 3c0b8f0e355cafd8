//! Database models split into separate files and re-exported at
//! `crate::db::models`.

pub mod event;
pub mod user;

pub use self::event::*;
pub use self::user::*;
