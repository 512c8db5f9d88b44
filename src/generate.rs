//! Reading documents and writing pages.
//!
//! ## Single File
//!
//! `convert_file` turns one markup document into one HTML file. The output
//! path defaults to the input with its extension replaced by `.html`.
//!
//! ## Batch
//!
//! `convert_manifest` converts every page of the configured manifest found in
//! the source directory:
//!
//! ```text
//! site/
//! ├── MENU
//! ├── index.jemdoc       → index.html
//! ├── index_cn.jemdoc    → index_cn.html
//! ├── research.jemdoc    → research.html
//! └── ...                  (missing pages are skipped)
//! ```
//!
//! Documents are converted in parallel with [rayon](https://docs.rs/rayon).
//! Every conversion reads the menu file itself, so no state is shared
//! between tasks. A document that fails is reported in its outcome and the
//! rest of the batch carries on.

use crate::config::SiteConfig;
use crate::menu;
use crate::naming;
use crate::page;
use rayon::prelude::*;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("Failed to read {path}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("Failed to read menu {path}: {source}")]
    Menu { path: PathBuf, source: io::Error },
    #[error("Failed to write {path}: {source}")]
    Write { path: PathBuf, source: io::Error },
}

/// What happened to one document.
#[derive(Debug)]
pub enum ConvertOutcome {
    Converted { input: PathBuf, output: PathBuf },
    /// The input does not exist.
    Skipped { input: PathBuf },
    Failed {
        input: PathBuf,
        error: GenerateError,
    },
}

/// Inputs shared by every conversion of a run.
#[derive(Debug, Clone)]
pub struct ConvertContext<'a> {
    pub config: &'a SiteConfig,
    /// Location of the menu description file.
    pub menu_path: PathBuf,
    /// Title for documents without a `# ` line.
    pub default_title: String,
}

impl<'a> ConvertContext<'a> {
    /// Context for a site rooted at `source`, as configured.
    pub fn new(source: &Path, config: &'a SiteConfig) -> Self {
        Self {
            config,
            menu_path: source.join(&config.menu_file),
            default_title: config.default_title.clone(),
        }
    }
}

/// Convert `input` into `output`.
///
/// A missing input is `Ok(Skipped)`. Any other read failure, an unreadable
/// menu, or a failed write is an error.
pub fn convert_file(
    input: &Path,
    output: &Path,
    ctx: &ConvertContext,
) -> Result<ConvertOutcome, GenerateError> {
    let doc = match fs::read_to_string(input) {
        Ok(doc) => doc,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Ok(ConvertOutcome::Skipped {
                input: input.to_path_buf(),
            });
        }
        Err(source) => {
            return Err(GenerateError::Read {
                path: input.to_path_buf(),
                source,
            });
        }
    };

    let entries = menu::load_menu(&ctx.menu_path).map_err(|source| GenerateError::Menu {
        path: ctx.menu_path.clone(),
        source,
    })?;

    let html = page::render_page(&doc, &ctx.default_title, output, &entries, ctx.config);
    write_page(output, &html)?;

    Ok(ConvertOutcome::Converted {
        input: input.to_path_buf(),
        output: output.to_path_buf(),
    })
}

fn write_page(output: &Path, html: &str) -> Result<(), GenerateError> {
    let write_err = |source| GenerateError::Write {
        path: output.to_path_buf(),
        source,
    };
    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(write_err)?;
    }
    fs::write(output, html).map_err(write_err)
}

/// Site directory of a single input: the directory holding it.
pub fn site_dir(input: &Path) -> PathBuf {
    match input.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Input files of the manifest, in manifest order.
pub fn manifest_inputs(source: &Path, config: &SiteConfig) -> Vec<PathBuf> {
    naming::manifest_file_names(
        &config.pages.names,
        &config.locale.secondary_suffix,
        &config.extension,
    )
    .into_iter()
    .map(|name| source.join(name))
    .collect()
}

/// Convert every manifest page under `source`. Outcomes are in manifest
/// order regardless of which conversion finished first.
pub fn convert_manifest(source: &Path, config: &SiteConfig) -> Vec<ConvertOutcome> {
    let ctx = ConvertContext::new(source, config);
    manifest_inputs(source, config)
        .par_iter()
        .map(|input| {
            let output = naming::html_output_path(input);
            convert_file(input, &output, &ctx).unwrap_or_else(|error| ConvertOutcome::Failed {
                input: input.clone(),
                error,
            })
        })
        .collect()
}
