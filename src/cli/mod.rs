pub mod app;
pub mod commands;
pub mod config;
pub mod context;
pub mod dispatch;
pub mod env;
pub mod extract;
pub mod plan;
pub mod probe;
pub mod runtime;
pub mod session;

pub use app::run;
