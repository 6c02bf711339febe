pub mod config;
mod error;
mod fonts;
pub mod model;
pub mod pdf;
pub mod xlsx;

pub use config::ManifestConfig;
pub use error::Error;
pub use fonts::Font;
pub use model::OrderRecord;

use std::path::Path;
use std::time::Instant;

/// A finished manifest: the PDF bytes plus what a caller needs to offer it
/// for download.
#[derive(Clone, Debug, PartialEq)]
pub struct ManifestOutput {
    pub bytes: Vec<u8>,
    pub file_name: String,
    /// Physical pages, the signature page included.
    pub page_count: usize,
}

/// Lay out `records` without serializing them, for inspecting the frames.
pub fn layout_manifest(
    records: &[OrderRecord],
    config: &ManifestConfig,
) -> Result<pdf::ManifestLayout, Error> {
    pdf::layout(records, config)
}

pub fn render_manifest(records: &[OrderRecord], config: &ManifestConfig) -> Result<ManifestOutput, Error> {
    let laid_out = pdf::layout(records, config)?;
    let bytes = pdf::write_pdf(&laid_out, config)?;
    Ok(ManifestOutput {
        bytes,
        file_name: config.file_name(),
        page_count: laid_out.page_count(),
    })
}

pub fn generate_manifest_from_bytes(input: &[u8], config: &ManifestConfig) -> Result<ManifestOutput, Error> {
    let t0 = Instant::now();
    config.validate()?;

    let records = xlsx::parse_bytes(input)?;
    let t_parse = t0.elapsed();

    let output = render_manifest(&records, config)?;
    let t_total = t0.elapsed();

    log::info!(
        "Timing: parse={:.1}ms, render={:.1}ms, total={:.1}ms ({} orders, {} pages, {} bytes)",
        t_parse.as_secs_f64() * 1000.0,
        (t_total - t_parse).as_secs_f64() * 1000.0,
        t_total.as_secs_f64() * 1000.0,
        records.len(),
        output.page_count,
        output.bytes.len(),
    );

    Ok(output)
}

pub fn generate_manifest(input: &Path, output: &Path, config: &ManifestConfig) -> Result<ManifestOutput, Error> {
    let t0 = Instant::now();
    config.validate()?;

    let records = xlsx::parse(input)?;
    let t_parse = t0.elapsed();

    let manifest = render_manifest(&records, config)?;
    let t_render = t0.elapsed();

    std::fs::write(output, &manifest.bytes).map_err(Error::Io)?;
    let t_total = t0.elapsed();

    log::info!(
        "Timing: parse={:.1}ms, render={:.1}ms, write={:.1}ms, total={:.1}ms (output {} bytes)",
        t_parse.as_secs_f64() * 1000.0,
        (t_render - t_parse).as_secs_f64() * 1000.0,
        (t_total - t_render).as_secs_f64() * 1000.0,
        t_total.as_secs_f64() * 1000.0,
        manifest.bytes.len(),
    );

    Ok(manifest)
}
