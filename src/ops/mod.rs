//! High-level operations.
//!
//! This module contains the implementation of berth commands.

pub mod clean;
pub mod create;
pub mod inspect;
pub mod list;
pub mod resolve;

pub use clean::{clean, CleanOptions};
pub use create::{create, CreateOptions, CreateResult};
pub use inspect::{format_report, inspect, preview_toolchain, InspectReport};
pub use list::{list_recipes, RecipeSummary};
pub use resolve::{lookup_recipe, package_id, resolve_options};
