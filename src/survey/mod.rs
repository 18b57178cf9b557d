pub mod answers;
pub mod catalog;
pub mod controller;
pub mod engine;
pub mod error;
pub mod order;
pub mod repository;
pub mod types;
