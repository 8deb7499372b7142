//! flatconf-core: flattens profile-aware YAML configuration into properties files
//!
//! Reads `bootstrap.yml`, `application.yml` and `application-<profile>.yml`,
//! merges them into one property set per profile and optionally substitutes
//! `${KEY}` placeholders from per-profile JSON environment files.
//!
//! # Example
//!
//! ```rust
//! use flatconf_core::{merge, property_set, Profile, ProfiledProperties};
//!
//! let merged = merge(&[
//!     ProfiledProperties::new(Profile::Default, property_set! { "x" => 1, "y" => 2 }),
//!     ProfiledProperties::new(Profile::named("prod"), property_set! { "y" => 3 }),
//! ]);
//!
//! assert_eq!(merged["prod"].properties, property_set! { "x" => 1, "y" => 3 });
//! ```

pub mod env;
pub mod error;
pub mod flatten;
pub mod loader;
pub mod merge;
pub mod property;
pub mod value;
pub mod writer;

mod config;
mod pipeline;

pub use config::{Conventions, PipelineOptions};
pub use env::{Environment, EnvironmentMap};
pub use error::{Error, ErrorKind, Result};
pub use flatten::flatten;
pub use loader::Loader;
pub use merge::merge;
pub use pipeline::{Pipeline, PipelineReport};
pub use property::{Profile, ProfileMap, ProfiledProperties, PropertySet, PropertyValue};
pub use value::Value;
