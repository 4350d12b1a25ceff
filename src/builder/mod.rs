//! Driving the external build system.

pub mod cmake;

pub use cmake::{CMake, CMakeToolchain};

/// How CMake is invoked, independent of any recipe.
#[derive(Debug, Clone, Default)]
pub struct BuildOptions {
    /// CMake generator (`-G`)
    pub generator: Option<String>,
    /// Parallel jobs for `cmake --build`
    pub jobs: Option<usize>,
    /// Stream tool output instead of capturing it
    pub stream_output: bool,
}
