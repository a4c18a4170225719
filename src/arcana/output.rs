//! Data script rendering and the read → extract → write pipeline.
//!
//! The artifact is a single variable declaration the front-end includes as
//! a plain script:
//!
//! ```text
//! // Автоматически сгенерированный файл с расшифровками арканов
//! const arcanaDescriptionsData = { ... };
//! ```

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::config::ExtractorConfig;
use crate::error::{ArcanaError, Result};

use super::descriptions::ArcanaDescriptions;
use super::extractor::{extract_descriptions, ExtractionStats};

/// First line of every generated file.
pub const GENERATED_HEADER: &str = "// Автоматически сгенерированный файл с расшифровками арканов";

/// Render the mapping as a front-end data script.
///
/// JSON is pretty-printed with two-space indentation and non-ASCII text is
/// kept verbatim. Output depends only on `descriptions`, so equal inputs
/// render byte-identical scripts.
pub fn render_data_script(descriptions: &ArcanaDescriptions, variable_name: &str) -> Result<String> {
    let json = serde_json::to_string_pretty(descriptions)?;
    Ok(format!("{}\nconst {} = {};\n", GENERATED_HEADER, variable_name, json))
}

/// Per-arcana line of the run summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArcanaSummary {
    pub id: String,
    pub spheres: Vec<String>,
}

/// What a completed run produced.
#[derive(Debug, Clone)]
pub struct ExtractionSummary {
    pub output: PathBuf,
    pub arcana_count: usize,
    pub sphere_count: usize,
    pub output_chars: usize,
    pub stats: ExtractionStats,
    pub arcanas: Vec<ArcanaSummary>,
}

impl ExtractionSummary {
    fn new(descriptions: &ArcanaDescriptions, stats: ExtractionStats, output: PathBuf, script: &str) -> Self {
        let mut arcanas: Vec<ArcanaSummary> = descriptions
            .iter()
            .map(|(id, spheres)| ArcanaSummary {
                id: id.to_string(),
                spheres: spheres.keys().cloned().collect(),
            })
            .collect();
        // Numeric order for display; non-numeric ids sort last
        arcanas.sort_by_key(|a| a.id.parse::<u64>().unwrap_or(u64::MAX));

        Self {
            output,
            arcana_count: descriptions.len(),
            sphere_count: descriptions.sphere_count(),
            output_chars: script.chars().count(),
            stats,
            arcanas,
        }
    }

    /// Human-readable report, one arcana per line.
    pub fn report(&self) -> String {
        let mut lines = vec![
            format!("Processed {} arcanas, {} spheres", self.arcana_count, self.sphere_count),
            format!("Output: {} ({} chars)", self.output.display(), self.output_chars),
        ];
        for arcana in &self.arcanas {
            let mut spheres = arcana.spheres.clone();
            spheres.sort_unstable();
            lines.push(format!(
                "Arcana {}: {} spheres - {}",
                arcana.id,
                arcana.spheres.len(),
                spheres.join(", ")
            ));
        }
        lines.join("\n")
    }
}

/// Read the input document, extract descriptions and write the data script.
///
/// The script is rendered completely, written to a temporary file next to the
/// output and renamed over it. A failed run leaves any previous output
/// untouched.
pub fn run_extraction(config: &ExtractorConfig) -> Result<ExtractionSummary> {
    tracing::info!("Parsing {}", config.input.display());
    let document = fs::read_to_string(&config.input).map_err(|source| ArcanaError::Read {
        path: config.input.clone(),
        source,
    })?;
    tracing::info!("Input size: {} chars", document.chars().count());

    let outcome = extract_descriptions(&document);
    tracing::info!(
        "Found {} blocks ({} without arcana header), {} sphere sections",
        outcome.stats.blocks,
        outcome.stats.blocks_without_id,
        outcome.stats.sections
    );
    if outcome.stats.unrecognized_sections > 0 || outcome.stats.empty_sections > 0 {
        tracing::info!(
            "Dropped {} unrecognized and {} empty sections",
            outcome.stats.unrecognized_sections,
            outcome.stats.empty_sections
        );
    }

    let script = render_data_script(&outcome.descriptions, &config.variable_name)?;

    if let Some(parent) = config.output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| ArcanaError::Write {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    write_atomically(&config.output, &script)?;

    let summary = ExtractionSummary::new(&outcome.descriptions, outcome.stats, config.output.clone(), &script);
    tracing::info!(
        "Wrote {} arcanas ({} spheres) to {}",
        summary.arcana_count,
        summary.sphere_count,
        summary.output.display()
    );
    Ok(summary)
}

/// Replace `path` with `contents` via a sibling temp file and a rename.
fn write_atomically(path: &Path, contents: &str) -> Result<()> {
    let write_error = |source: io::Error| ArcanaError::Write {
        path: path.to_path_buf(),
        source,
    };
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut file = NamedTempFile::new_in(dir).map_err(write_error)?;
    if let Some(permissions) = output_permissions(path) {
        file.as_file().set_permissions(permissions).map_err(write_error)?;
    }
    file.write_all(contents.as_bytes()).map_err(write_error)?;
    file.as_file().sync_all().map_err(write_error)?;
    // On failure the temp file is dropped, which deletes it
    file.persist(path).map_err(|e| write_error(e.error))?;
    Ok(())
}

/// Existing output keeps its mode; new files get 0644.
fn output_permissions(path: &Path) -> Option<fs::Permissions> {
    match fs::metadata(path) {
        Ok(meta) if meta.is_file() => Some(meta.permissions()),
        _ => default_permissions(),
    }
}

#[cfg(unix)]
fn default_permissions() -> Option<fs::Permissions> {
    use std::os::unix::fs::PermissionsExt;
    Some(fs::Permissions::from_mode(0o644))
}

#[cfg(not(unix))]
fn default_permissions() -> Option<fs::Permissions> {
    None
}
