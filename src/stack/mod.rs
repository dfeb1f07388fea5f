//! Technology catalog: classification enums, records and the registry.
//!
//! The registry maps canonical names and their spelling variations to
//! [`TechnologyRecord`]s. Lookups go through [`normalize_name`], so
//! `"Node.js"`, `"nodejs"` and `"node js"` all resolve to the same record.
//!
//! # Example
//!
//! ```
//! use stacklens::stack::{Category, TechnologyRegistry};
//!
//! let registry = TechnologyRegistry::with_defaults();
//! let record = registry.lookup("Tailwind CSS").unwrap();
//! assert_eq!(record.name, "tailwind");
//! assert_eq!(record.category, Category::Frontend);
//! ```

#[macro_use]
pub mod kind_enum_macro;

pub mod kind;
pub mod record;
pub mod registry;
pub mod seed;

pub use kind::{Category, TechType};
pub use record::{Ecosystem, Popularity, TechnologyRecord};
pub use registry::{normalize_name, RegistryError, TechnologyRegistry};
