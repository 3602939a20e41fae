pub mod inputs;
pub mod logger;
pub mod setup;
