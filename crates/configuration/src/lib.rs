use crate::error::ConfigError;

// Declare the modules that make up this crate.
pub mod document;
pub mod error;

// Re-export the core types to provide a clean public API.
pub use document::{InputDocument, ResolvedInputs};

/// Loads the input document from a configuration file.
///
/// This function is the primary entry point for this crate. It reads the
/// file, deserializes it into the strongly-typed [`InputDocument`], and
/// returns it; sections the file omits keep their documented defaults.
pub fn load_config(path: &str) -> Result<InputDocument, ConfigError> {
    let builder = config::Config::builder()
        .add_source(config::File::with_name(path))
        .build()?;

    let document = builder.try_deserialize::<InputDocument>()?;
    Ok(document)
}
