//! berth - package recipes for native C/C++ libraries
//!
//! Each recipe translates a declared set of build options into CMake
//! variables, fetches pinned upstream sources, drives the build and stages
//! headers and binaries into a package layout downstream projects consume.

pub mod builder;
pub mod core;
pub mod ops;
pub mod recipes;
pub mod sources;
pub mod util;

pub use core::{Options, OptionsSchema, Os, Settings};
pub use recipes::{Recipe, RecipeRegistry};
pub use util::context::GlobalContext;
