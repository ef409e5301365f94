pub mod error;
pub mod llm_config;
pub mod prompt;
pub mod session;

// Target-column inference types
pub mod csv;

// Analysis result contract and display interpretation
pub mod robustness;
