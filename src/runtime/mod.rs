mod events;
mod scope;

pub use events::{EventLog, Level, Notice, Source};
pub use scope::ActivationScope;
