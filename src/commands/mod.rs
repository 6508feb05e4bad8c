// Deployment
pub mod run;

// Inspection
pub mod check_env;
pub mod plan;

// Utilities
pub mod secret_key;
