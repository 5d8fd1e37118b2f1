pub mod model;

pub use model::{NotificationRequest, Priority, Style};
