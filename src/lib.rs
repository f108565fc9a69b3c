//! Wayfarer is a terminal chat client for a multi-agent travel assistant
//! backend.
//!
//! The crate is organized around a small set of collaborating layers:
//! - [`core`] owns the chat session state machine, the backend client,
//!   connectivity probing, the agent registry and provider status tracking.
//! - [`api`] defines the JSON payloads exchanged with the backend.
//! - [`ui`] renders messages, agents and provider status as terminal lines.
//! - [`cli`] parses arguments and runs the interactive chat and one-shot
//!   commands.
//!
//! The binary (`src/main.rs`) routes through [`crate::cli::main`].

pub mod api;
pub mod cli;
pub mod core;
pub mod ui;
pub mod utils;
