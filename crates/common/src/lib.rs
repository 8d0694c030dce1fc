pub mod error;
pub mod telemetry;

pub use error::{CadenceError, CadenceResult};
pub use telemetry::init_tracing;
