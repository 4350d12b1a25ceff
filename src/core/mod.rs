//! Core data types: settings, options, source records and package layout.

pub mod layout;
pub mod options;
pub mod package_info;
pub mod settings;
pub mod source_table;
pub mod translate;

pub use layout::Layout;
pub use options::{OptionError, OptionSpec, Options, OptionsSchema};
pub use package_info::CppInfo;
pub use settings::{Arch, BuildType, Compiler, Os, Settings};
pub use source_table::{SourceDescriptor, SourceTable};
pub use translate::{translate, ConfigVars, VarMapping};
