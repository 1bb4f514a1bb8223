pub mod bits;
pub mod config;
pub mod error;
pub mod patterns;
pub mod scheme;

pub use config::EngineConfig;
pub use error::{FprepError, Result};
pub use patterns::template_for;
pub use scheme::{ForcedPattern, Scheme, SchemeKey, SchemeResult, POWERS_OF_FIVE};
