pub mod clock;
pub mod config;
pub mod db;
pub mod engine;
pub mod error;
pub mod models;
pub mod services;

pub use engine::{EngineSettings, EngineState, HomeView, Personalizer};
pub use error::{AppError, AppResult};
