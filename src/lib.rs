use js_sys::{Array, Uint8Array};
use log::{debug, info};
use rayon::prelude::*;
use wasm_bindgen::prelude::*;

use std::path::{Path, PathBuf};

pub mod correlate;
pub mod discover;
pub mod error;
pub mod extract;
pub mod graph;
pub mod normalize;
pub mod tunables;

pub use correlate::{PairScores, correlation};
pub use discover::{natural_cmp, natural_key};
pub use error::GraphError;
pub use extract::{ColorFeatures, analyze, extract_bytes};
pub use graph::{Node, assemble, to_json};
pub use tunables::{Tunables, validate_min_link};

#[cfg(not(target_arch = "wasm32"))]
pub use discover::discover_images;
#[cfg(not(target_arch = "wasm32"))]
pub use extract::extract_file;
#[cfg(not(target_arch = "wasm32"))]
pub use graph::write_graph;

// ------------------------------------------------------------
// Pipeline
// ------------------------------------------------------------

/// Correlate already-extracted features and assemble the node list.
///
/// `features` must be in natural order. Correlation does not depend on the
/// node scales, so both are derived from the same immutable feature slice.
pub fn build_graph(features: &[ColorFeatures], tunables: &Tunables, min_link: Option<f64>) -> Vec<Node> {
    let scores = PairScores::compute(features, tunables);
    debug!("computed {} pair scores", features.len() * features.len().saturating_sub(1) / 2);
    assemble(features, &scores, min_link)
}

/// Run the whole pipeline on in-memory images.
///
/// Inputs are `(file name, encoded bytes)` pairs in any order; they are put in
/// natural order by file name before ids are assigned. Any image that fails to
/// decode aborts the build.
pub fn build_from_memory(
    mut inputs: Vec<(String, Vec<u8>)>,
    tunables: &Tunables,
    min_link: Option<f64>,
) -> Result<Vec<Node>, GraphError> {
    tunables.validate()?;
    validate_min_link(min_link)?;
    if inputs.is_empty() {
        return Err(GraphError::NoInputImages { dir: PathBuf::from("<memory>") });
    }

    inputs.sort_by(|(a, _), (b, _)| natural_cmp(Path::new(a), Path::new(b)));

    let results: Vec<_> = inputs
        .par_iter()
        .map(|(name, bytes)| {
            extract_bytes(bytes, tunables).map_err(|source| GraphError::UnreadableImage {
                path: PathBuf::from(name),
                source,
            })
        })
        .collect();
    let features = results.into_iter().collect::<Result<Vec<_>, _>>()?;

    Ok(build_graph(&features, tunables, min_link))
}

/// Run the whole pipeline on the PNG files in `dir`.
///
/// Configuration is checked before the directory is touched. The first
/// unreadable image (in natural order) aborts the build.
#[cfg(not(target_arch = "wasm32"))]
pub fn build_from_dir(dir: &Path, tunables: &Tunables, min_link: Option<f64>) -> Result<Vec<Node>, GraphError> {
    use std::time::Instant;

    tunables.validate()?;
    validate_min_link(min_link)?;

    let files = discover_images(dir)?;
    if files.is_empty() {
        return Err(GraphError::NoInputImages { dir: dir.to_path_buf() });
    }
    info!("found {} images in {}", files.len(), dir.display());

    let start = Instant::now();
    let results: Vec<_> = files
        .par_iter()
        .map(|path| -> Result<ColorFeatures, GraphError> {
            let features = extract_file(path, tunables).map_err(|source| GraphError::UnreadableImage {
                path: path.clone(),
                source,
            })?;
            debug!(
                "{}: average {:?}, hue {:.1}, long side {}",
                path.display(),
                features.average,
                features.hue,
                features.long_side
            );
            Ok(features)
        })
        .collect();
    let features = results.into_iter().collect::<Result<Vec<_>, _>>()?;
    info!("extracted colour features in {:.2}s", start.elapsed().as_secs_f32());

    let start = Instant::now();
    let nodes = build_graph(&features, tunables, min_link);
    info!("correlated {} images in {:.2}s", nodes.len(), start.elapsed().as_secs_f32());

    Ok(nodes)
}

// ------------------------------------------------------------
// wasm entry point
// ------------------------------------------------------------

/// Build the portfolio table in the browser.
///
/// `names` and `images` are parallel arrays of file names and `Uint8Array`
/// image bytes. Returns the same JSON document the CLI writes.
#[wasm_bindgen]
pub fn build_portfolio(names: Array, images: Array, min_link: Option<f64>) -> Result<String, JsValue> {
    if names.length() != images.length() {
        return Err(JsValue::from_str("names and images must have the same length"));
    }

    let mut inputs = Vec::with_capacity(names.length() as usize);
    for (name, bytes) in names.iter().zip(images.iter()) {
        let name = name
            .as_string()
            .ok_or_else(|| JsValue::from_str("Image names must be strings"))?;
        inputs.push((name, Uint8Array::new(&bytes).to_vec()));
    }

    let nodes = build_from_memory(inputs, &Tunables::default(), min_link)
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    to_json(&nodes).map_err(|e| JsValue::from_str(&format!("JSON encode error: {e}")))
}
