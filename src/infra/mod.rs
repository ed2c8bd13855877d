//! Infrastructure layer - External systems integration

pub mod db;

pub use db::Database;
