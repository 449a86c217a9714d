pub mod app;
pub mod attendance;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod lifecycle;
pub mod models;
pub mod routines;
pub mod state;
pub mod stats;
pub mod storage;
pub mod ui;

pub use app::router;
pub use config::AppConfig;
pub use state::AppState;
pub use storage::RecordStore;
