pub mod config;
pub mod logging;
pub mod network;
pub mod pipeline;
pub mod storage;
