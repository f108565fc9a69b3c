pub mod agents;
pub mod backend;
pub mod config;
pub mod connectivity;
pub mod constants;
pub mod markup;
pub mod message;
pub mod providers;
pub mod session;
