//! Per-header stub generation
//!
//! A [`StubJob`] fixes every path involved in converting one header: the
//! header itself, its sibling `.cpp` file, and where the `.pxd` stub goes.
//! [`generate_stub`] runs the whole pipeline for one job and [`run_batch`]
//! runs many jobs in parallel. Headers are independent of one another, so a
//! failing header never affects the others.

use crate::includes::find_includes;
use crate::parser::error::ParseError;
use crate::parser::parse::parse_header;
use crate::stub::StubWriter;
use log::{debug, info};
use rayon::prelude::*;
use rustc_hash::FxHashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StubError {
    #[error("failed to read {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write {}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{} is not inside the C++ home {}", header.display(), home.display())]
    PathOutsideHome { header: PathBuf, home: PathBuf },

    #[error("failed to parse {}", header.display())]
    Parse {
        header: PathBuf,
        #[source]
        source: ParseError,
    },

    #[error("invalid search pattern `{pattern}`")]
    Pattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    #[error(transparent)]
    Glob(#[from] glob::GlobError),
}

/// Options shared by every header of a run
#[derive(Debug, Clone)]
pub struct StubOptions {
    /// Root of the C++ source tree
    pub cpp_home: Option<PathBuf>,
    /// Root of the stub tree mirroring `cpp_home`
    pub cython_home: Option<PathBuf>,
    /// Emit parsed declarations; when false every extern block is `pass`
    pub show_content: bool,
}

impl Default for StubOptions {
    fn default() -> Self {
        Self {
            cpp_home: None,
            cython_home: None,
            show_content: true,
        }
    }
}

/// Paths involved in converting one header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StubJob {
    pub header_file: PathBuf,
    pub cpp_file: PathBuf,
    /// Output folder, also the anchor for include module names
    pub stub_dir: PathBuf,
    pub stub_file: PathBuf,
}

impl StubJob {
    pub fn new(header: &Path, opts: &StubOptions) -> Result<Self, StubError> {
        let stub_dir = match (&opts.cpp_home, &opts.cython_home) {
            (Some(cpp_home), Some(cython_home)) => {
                let parent = header.parent().unwrap_or(Path::new(""));
                let relative = parent.strip_prefix(cpp_home).map_err(|_| StubError::PathOutsideHome {
                    header: header.to_path_buf(),
                    home: cpp_home.clone(),
                })?;
                cython_home.join(relative)
            }
            _ => PathBuf::from("."),
        };

        let mut stub_name = header.file_stem().unwrap_or_default().to_os_string();
        stub_name.push(".pxd");
        let stub_file = stub_dir.join(stub_name);

        let job = Self {
            header_file: header.to_path_buf(),
            cpp_file: header.with_extension("cpp"),
            stub_dir,
            stub_file,
        };
        debug!(
            "header {} (source {}) -> {}",
            job.header_file.display(),
            job.cpp_file.display(),
            job.stub_file.display()
        );
        Ok(job)
    }
}

/// What one successful run produced
#[derive(Debug, Clone)]
pub struct StubSummary {
    pub stub_file: PathBuf,
    pub namespace: Option<String>,
    pub includes: Vec<String>,
    pub declarations: usize,
    /// Declarations left out of the stub
    pub warnings: Vec<ParseError>,
}

/// Parse one header and write its stub.
///
/// Nothing is written when the header fails to parse.
pub fn generate_stub(job: &StubJob, opts: &StubOptions) -> Result<StubSummary, StubError> {
    let header_text = read(&job.header_file)?;
    let exclude = job
        .header_file
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let parse_error = |source| StubError::Parse {
        header: job.header_file.clone(),
        source,
    };

    let source = job.cpp_file.is_file().then_some(job.cpp_file.as_path());
    let mut includes: FxHashSet<String> = FxHashSet::default();
    includes.extend(find_includes(&header_text, &exclude, &job.stub_dir).map_err(parse_error)?);
    if let Some(cpp_file) = source {
        let cpp_text = read(cpp_file)?;
        includes.extend(find_includes(&cpp_text, &exclude, &job.stub_dir).map_err(parse_error)?);
    }
    let mut includes: Vec<String> = includes.into_iter().collect();
    includes.sort();

    let parsed = parse_header(&header_text).map_err(parse_error)?;
    info!(
        "{}: namespace {:?}, {} includes, {} declarations",
        job.header_file.display(),
        parsed.namespace,
        includes.len(),
        parsed.declarations.len()
    );

    let stub = StubWriter::new(&job.header_file)
        .source(source)
        .includes(&includes)
        .namespace(parsed.namespace.as_deref())
        .show_content(opts.show_content)
        .render(&parsed.declarations);

    fs::create_dir_all(&job.stub_dir).map_err(|source| StubError::Write {
        path: job.stub_dir.clone(),
        source,
    })?;
    fs::write(&job.stub_file, stub).map_err(|source| StubError::Write {
        path: job.stub_file.clone(),
        source,
    })?;
    info!("wrote {}", job.stub_file.display());

    Ok(StubSummary {
        stub_file: job.stub_file.clone(),
        namespace: parsed.namespace,
        includes,
        declarations: parsed.declarations.len(),
        warnings: parsed.warnings,
    })
}

/// Expand the command line paths into header files.
///
/// Files are taken as given; directories are searched recursively for
/// `*.hpp`. The result is sorted and free of duplicates.
pub fn collect_headers(paths: &[PathBuf]) -> Result<Vec<PathBuf>, StubError> {
    let mut headers = Vec::new();
    for path in paths {
        if !path.is_dir() {
            headers.push(path.clone());
            continue;
        }

        let escaped = glob::Pattern::escape(&path.to_string_lossy());
        let pattern = format!("{}/**/*.hpp", escaped.trim_end_matches('/'));
        let entries = glob::glob(&pattern).map_err(|source| StubError::Pattern {
            pattern: pattern.clone(),
            source,
        })?;
        for entry in entries {
            let entry = entry?;
            if entry.is_file() {
                headers.push(entry);
            }
        }
    }

    headers.sort();
    headers.dedup();
    Ok(headers)
}

/// Generate stubs for every header in parallel, one result per header in
/// input order
pub fn run_batch(headers: &[PathBuf], opts: &StubOptions) -> Vec<Result<StubSummary, StubError>> {
    headers
        .par_iter()
        .map(|header| {
            let job = StubJob::new(header, opts)?;
            generate_stub(&job, opts)
        })
        .collect()
}

fn read(path: &Path) -> Result<String, StubError> {
    fs::read_to_string(path).map_err(|source| StubError::Read {
        path: path.to_path_buf(),
        source,
    })
}
