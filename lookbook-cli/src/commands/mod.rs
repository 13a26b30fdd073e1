//! Command implementations.

pub mod bootstrap;
pub mod encode;
pub mod list;
pub mod recommend;
pub mod scan;
