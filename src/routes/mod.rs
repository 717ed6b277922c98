//! Route modules for Formular Server

pub mod fill;
pub mod health;
pub mod schema;
