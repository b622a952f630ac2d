pub mod bootstrap;
pub mod config;
pub mod security;
pub mod storage;
