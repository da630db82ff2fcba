pub mod config;
pub mod error;
pub mod http;
pub mod image;
pub mod resize;
pub mod storage;
pub mod upload;
