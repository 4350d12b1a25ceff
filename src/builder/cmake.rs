//! CMake driver: toolchain file generation and configure/build/install.

use std::path::{Path, PathBuf};

use anyhow::{bail, Result};

use crate::builder::BuildOptions;
use crate::core::layout::Layout;
use crate::core::settings::{BuildType, Settings};
use crate::core::translate::ConfigVars;
use crate::util::fs::write_string;
use crate::util::process::{find_cmake, ProcessBuilder};

/// Name of the generated toolchain file inside the generators folder.
pub const TOOLCHAIN_FILE: &str = "berth_toolchain.cmake";

/// Variables a recipe hands to CMake, rendered as a toolchain file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CMakeToolchain {
    variables: ConfigVars,
}

impl CMakeToolchain {
    pub fn new(variables: ConfigVars) -> Self {
        CMakeToolchain { variables }
    }

    pub fn variables(&self) -> &ConfigVars {
        &self.variables
    }

    /// Render the toolchain file contents.
    pub fn render(&self) -> String {
        let mut out = String::from("# Generated by berth. Do not edit.\n\n");
        for (name, value) in self.variables.iter() {
            out.push_str(&format!(
                "set({} \"{}\" CACHE STRING \"Variable {} defined by berth\" FORCE)\n",
                name,
                escape_cmake(value),
                name
            ));
        }
        out
    }

    /// Write the toolchain file into `generators_folder` and return its path.
    pub fn generate(&self, generators_folder: &Path) -> Result<PathBuf> {
        let path = generators_folder.join(TOOLCHAIN_FILE);
        write_string(&path, &self.render())?;
        tracing::debug!(
            "wrote {} variables to {}",
            self.variables.len(),
            path.display()
        );
        Ok(path)
    }
}

fn escape_cmake(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Runs CMake against a recipe's layout.
pub struct CMake {
    program: PathBuf,
    source_dir: PathBuf,
    build_dir: PathBuf,
    toolchain_file: PathBuf,
    install_prefix: PathBuf,
    build_type: BuildType,
    generator: Option<String>,
    jobs: Option<usize>,
    stream: bool,
}

impl CMake {
    /// Locate CMake on PATH and bind it to `layout`.
    pub fn new(layout: &Layout, settings: &Settings, opts: &BuildOptions) -> Result<Self> {
        let Some(program) = find_cmake() else {
            bail!(
                "CMake not found\n\
                 \n\
                 CMake is required to build this recipe.\n\
                 Install CMake and ensure it's in your PATH."
            );
        };
        Ok(Self::with_program(program, layout, settings, opts))
    }

    /// Bind an explicit CMake executable.
    pub fn with_program(
        program: PathBuf,
        layout: &Layout,
        settings: &Settings,
        opts: &BuildOptions,
    ) -> Self {
        CMake {
            program,
            source_dir: layout.source_folder.clone(),
            build_dir: layout.build_folder.clone(),
            toolchain_file: layout.generators_folder.join(TOOLCHAIN_FILE),
            install_prefix: layout.package_folder.clone(),
            build_type: settings.build_type,
            generator: opts.generator.clone(),
            jobs: opts.jobs,
            stream: opts.stream_output,
        }
    }

    pub fn configure_args(&self, cli_args: &[&str]) -> Vec<String> {
        let mut args = vec![
            "-S".to_string(),
            self.source_dir.display().to_string(),
            "-B".to_string(),
            self.build_dir.display().to_string(),
        ];
        if let Some(ref generator) = self.generator {
            args.push("-G".to_string());
            args.push(generator.clone());
        }
        args.push(format!(
            "-DCMAKE_TOOLCHAIN_FILE={}",
            self.toolchain_file.display()
        ));
        args.push(format!("-DCMAKE_BUILD_TYPE={}", self.build_type));
        args.push(format!(
            "-DCMAKE_INSTALL_PREFIX={}",
            self.install_prefix.display()
        ));
        args.extend(cli_args.iter().map(|a| a.to_string()));
        args
    }

    pub fn build_args(&self) -> Vec<String> {
        let mut args = vec![
            "--build".to_string(),
            self.build_dir.display().to_string(),
            "--config".to_string(),
            self.build_type.to_string(),
            "--parallel".to_string(),
        ];
        if let Some(jobs) = self.jobs {
            args.push(jobs.to_string());
        }
        args
    }

    pub fn install_args(&self) -> Vec<String> {
        vec![
            "--install".to_string(),
            self.build_dir.display().to_string(),
            "--config".to_string(),
            self.build_type.to_string(),
            "--prefix".to_string(),
            self.install_prefix.display().to_string(),
        ]
    }

    /// Run CMake configuration.
    pub fn configure(&self, cli_args: &[&str]) -> Result<()> {
        tracing::info!("configuring {}", self.source_dir.display());
        self.run(self.configure_args(cli_args))
    }

    /// Run CMake build.
    pub fn build(&self) -> Result<()> {
        tracing::info!("building {}", self.build_dir.display());
        self.run(self.build_args())
    }

    /// Run CMake install into the package folder.
    pub fn install(&self) -> Result<()> {
        tracing::info!("installing into {}", self.install_prefix.display());
        self.run(self.install_args())
    }

    fn run(&self, args: Vec<String>) -> Result<()> {
        ProcessBuilder::new(&self.program)
            .args(args)
            .run(self.stream)
    }
}
