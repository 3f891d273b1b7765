//! Route modules for the Lector server

pub mod health;
pub mod process;
pub mod quota;
