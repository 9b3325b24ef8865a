pub mod buffer;
pub mod engine;
pub mod error;
pub mod result;
pub mod schedule;

// Re-export the core types to provide a clean public API.
pub use buffer::{BridgeBufferPolicy, BufferPolicy};
pub use engine::{ProjectionEngine, FIRE_MULTIPLE, RATIO_CAP};
pub use error::ProjectionError;
pub use result::{FireCalculationResult, YearlyState};
pub use schedule::{annual_amount_at, apply_overrides, build_annual_rows};
