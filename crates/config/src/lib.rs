mod settings;

pub use settings::{OperatorDefaults, Settings};
