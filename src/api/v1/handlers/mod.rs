pub mod context;
pub mod data;
pub mod files;
pub mod health;
