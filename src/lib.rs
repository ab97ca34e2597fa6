pub mod config;
pub mod engine;
pub mod http;
pub mod room;
pub mod telemetry;
pub mod util;
pub mod ws;
