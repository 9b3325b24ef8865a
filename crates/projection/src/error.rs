use core_types::CoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProjectionError {
    #[error("Invalid configuration: {0}")]
    Core(#[from] CoreError),

    #[error("No annual projection rows were supplied")]
    EmptyRows,

    #[error("Projection rows must hold one row per age in ascending order: {0}")]
    NonContiguousRows(String),

    #[error("Projection rows end at age {last} but the profile's life expectancy is {expected}")]
    HorizonMismatch { last: u32, expected: u32 },

    #[error("Current age {current} already exceeds the life expectancy {horizon}")]
    HorizonExhausted { current: u32, horizon: u32 },

    #[error("Expected FIRE age {fire_age} lies outside the projected ages [{first}, {last}]")]
    FireAgeOutOfRange { fire_age: u32, first: u32, last: u32 },

    #[error("Override targets unknown item '{item_id}' or age {age} outside the projection")]
    UnknownOverrideTarget { item_id: String, age: u32 },
}
