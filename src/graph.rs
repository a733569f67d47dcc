use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::{ColorFeatures, PairScores, normalize::scale_factors};

/// One image in the output graph.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    pub scale: f64,
    pub colour: String,
    /// Neighbour id → score, in ascending rank order.
    pub correlations: IndexMap<String, f64>,
}

/// Id of the item at `index` in the sorted input.
#[inline(always)]
pub fn node_id(index: usize) -> String {
    (index + 1).to_string()
}

/// Merge features, scales and pair scores into the final node list.
///
/// `features` must already be in natural order; ids are assigned from it.
pub fn assemble(features: &[ColorFeatures], scores: &PairScores, min_link: Option<f64>) -> Vec<Node> {
    let long_sides: Vec<u32> = features.iter().map(|f| f.long_side).collect();
    let scales = scale_factors(&long_sides);

    features
        .iter()
        .zip(scales)
        .enumerate()
        .map(|(i, (f, scale))| Node {
            id: node_id(i),
            scale,
            colour: f.display_color(),
            correlations: scores
                .neighbours(i, min_link)
                .map(|(j, score)| (node_id(j), score))
                .collect(),
        })
        .collect()
}

/// Pretty-printed JSON array of nodes.
pub fn to_json(nodes: &[Node]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(nodes)
}

/// Mode of a freshly created output file.
#[cfg(all(unix, not(target_arch = "wasm32")))]
const OUTPUT_MODE: u32 = 0o644;

/// Atomically replace `path` with the JSON table.
///
/// An existing target keeps its permission bits; a new one gets `0644`.
#[cfg(not(target_arch = "wasm32"))]
pub fn write_graph(path: &std::path::Path, nodes: &[Node]) -> Result<(), crate::GraphError> {
    use std::io::Write;
    use std::path::Path;

    use tempfile::NamedTempFile;

    let fail = |source: std::io::Error| crate::GraphError::OutputWriteFailure {
        path: path.to_path_buf(),
        source,
    };

    let json = to_json(nodes).map_err(|e| fail(e.into()))?;

    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent).map_err(fail)?;

    // Written next to the target so the rename stays on one filesystem.
    let mut tmp = NamedTempFile::new_in(parent).map_err(fail)?;
    // Temp files are owner-only; the published table must stay world-readable.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;

        let mode = std::fs::metadata(path)
            .map(|m| m.permissions().mode() & 0o7777)
            .unwrap_or(OUTPUT_MODE);
        tmp.as_file()
            .set_permissions(std::fs::Permissions::from_mode(mode))
            .map_err(fail)?;
    }
    tmp.write_all(json.as_bytes()).map_err(fail)?;
    tmp.as_file().sync_all().map_err(fail)?;
    tmp.persist(path).map_err(|e| fail(e.error))?;
    Ok(())
}
