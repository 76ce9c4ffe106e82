pub mod config;
pub mod ds;
pub mod engine;
pub mod eval;
pub mod next_in_chain;
pub mod plugin;
pub mod std_lib;
