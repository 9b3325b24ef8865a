pub mod cashflow;
pub mod enums;
pub mod error;
pub mod profile;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use cashflow::{AnnualProjectionRow, IncomeExpenseItem, Override, MAX_ITEM_AGE};
pub use enums::{Category, FlowKind, Frequency, LiquidityTier, TimeUnit};
pub use error::CoreError;
pub use profile::{AssetClass, Portfolio, UserProfile, ALLOCATION_TOLERANCE};
pub use settings::SimulationSettings;
