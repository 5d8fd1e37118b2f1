pub mod console;
pub mod presenter;
pub mod sink;

pub use console::ConsoleSink;
pub use presenter::Presenter;
pub use sink::{NotificationSink, Presentation, SinkHandle};
