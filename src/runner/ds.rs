pub mod class;
pub mod error;
pub mod hooks;
pub mod instance;
pub mod lazy_cache;
pub mod mangle;
pub mod slot;
pub mod value;
