pub mod config;
pub mod coordinator;
pub mod metrics;
pub mod monitor;
pub mod notification;
pub mod presenter;
pub mod scheduler;

pub mod error;
pub mod logger;
pub mod time;
