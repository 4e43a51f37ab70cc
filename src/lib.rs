pub mod aggregate;
pub mod badges;
pub mod budget;
pub mod classify;
pub mod config;
pub mod day_key;
pub mod engine;
pub mod hydration;
pub mod models;
pub mod records;
pub mod tips;

pub use config::EngineConfig;
pub use engine::{DashboardSnapshot, NutritionEngine};
pub use models::*;
