//! Agent-based model of AI technology adoption in a healthcare workforce.
//!
//! The [`engine::Engine`] owns the worker population and advances it one
//! discrete time step per [`engine::Engine::step`] call, recording a row of
//! aggregate workforce metrics before each advancement. Drivers construct a
//! validated [`config::Config`], step the engine, and read the history back.

pub mod analysis;
pub mod config;
pub mod engine;
pub mod manager;
pub mod model;
pub mod stats;
