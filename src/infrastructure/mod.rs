pub mod activity_log;
pub mod config;
pub mod csv;
pub mod llm_clients;
pub mod python_runner;
pub mod response;
pub mod storage;
