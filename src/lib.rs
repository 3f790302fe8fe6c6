pub mod aggregate;
pub mod app;
pub mod catalog;
pub mod config;
pub mod errors;
pub mod goal;
pub mod handlers;
pub mod models;
pub mod reminder;
pub mod state;
pub mod storage;

pub use app::router;
pub use config::Config;
pub use goal::hydration_goal;
pub use state::AppState;
pub use storage::load_data;
