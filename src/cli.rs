//! Command line definition for the `hpp2pxd` binary
//!
//! Kept in the library so tests can drive [`Cli::try_parse_from`] directly.

use crate::driver::StubOptions;
use clap::{ArgAction, Parser};
use log::LevelFilter;
use std::path::PathBuf;

/// Generate Cython .pxd declaration stubs from C++ headers.
///
/// Every header gets one stub exposing its free functions, variables and the
/// public members of its classes. Stubs go to the current directory unless
/// both --cpp-home and --cython-home are given, in which case the C++ tree
/// layout is mirrored under the Cython home.
#[derive(Parser, Debug)]
#[command(name = "hpp2pxd", version, about, long_about = None)]
#[command(after_help = "\
EXAMPLES:
  hpp2pxd src/geo/shapes.hpp                   Write ./shapes.pxd
  hpp2pxd src --cpp-home src --cython-home pyx Mirror every src/**/*.hpp under pyx/
  RUST_LOG=debug hpp2pxd shapes.hpp            Trace every parsed declaration")]
pub struct Cli {
    /// Header files, or directories searched recursively for *.hpp
    #[arg(required = true, value_name = "PATH")]
    pub paths: Vec<PathBuf>,

    /// Root of the C++ source tree
    #[arg(long, value_name = "DIR")]
    pub cpp_home: Option<PathBuf>,

    /// Root of the generated stub tree
    #[arg(long, value_name = "DIR")]
    pub cython_home: Option<PathBuf>,

    /// Write stubs with empty extern blocks
    #[arg(long)]
    pub no_content: bool,

    /// More logging (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, conflicts_with = "quiet")]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    pub fn options(&self) -> StubOptions {
        StubOptions {
            cpp_home: self.cpp_home.clone(),
            cython_home: self.cython_home.clone(),
            show_content: !self.no_content,
        }
    }

    /// Log level before `RUST_LOG` is applied
    pub fn log_level(&self) -> LevelFilter {
        if self.quiet {
            return LevelFilter::Error;
        }
        match self.verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }

    /// Exactly one of the two homes was given
    pub fn has_partial_homes(&self) -> bool {
        self.cpp_home.is_some() != self.cython_home.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["hpp2pxd", "a.hpp"]).unwrap();
        assert_eq!(cli.paths, vec![PathBuf::from("a.hpp")]);
        assert_eq!(cli.log_level(), LevelFilter::Info);
        let opts = cli.options();
        assert!(opts.show_content);
        assert!(opts.cpp_home.is_none());
        assert!(!cli.has_partial_homes());
    }

    #[test]
    fn test_all_flags() {
        let cli = Cli::try_parse_from([
            "hpp2pxd",
            "src",
            "include/extra.hpp",
            "--cpp-home",
            "src",
            "--cython-home",
            "pyx",
            "--no-content",
            "-vv",
        ])
        .unwrap();
        assert_eq!(cli.paths.len(), 2);
        assert_eq!(cli.log_level(), LevelFilter::Trace);
        let opts = cli.options();
        assert!(!opts.show_content);
        assert_eq!(opts.cython_home, Some(PathBuf::from("pyx")));
    }

    #[test]
    fn test_quiet() {
        let cli = Cli::try_parse_from(["hpp2pxd", "-q", "a.hpp", "--cpp-home", "src"]).unwrap();
        assert_eq!(cli.log_level(), LevelFilter::Error);
        assert!(cli.has_partial_homes());
    }

    #[test]
    fn test_rejects_missing_paths_and_conflicting_verbosity() {
        assert!(Cli::try_parse_from(["hpp2pxd"]).is_err());
        assert!(Cli::try_parse_from(["hpp2pxd", "-v", "-q", "a.hpp"]).is_err());
    }
}
