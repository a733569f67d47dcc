use palette::{Lab, white_point::D65};
use rayon::prelude::*;

use crate::{ColorFeatures, Tunables};

#[inline(always)]
fn gauss(x: f64, sigma: f64) -> f64 {
    (-(x * x) / (sigma * sigma)).exp()
}

/// CIE76 colour difference.
pub fn delta_e76(a: &Lab<D65, f64>, b: &Lab<D65, f64>) -> f64 {
    let dl = a.l - b.l;
    let da = a.a - b.a;
    let db = a.b - b.b;
    (dl * dl + da * da + db * db).sqrt()
}

/// Shortest distance between two hues around the wheel, in `[0, 180]`.
pub fn hue_distance(h1: f64, h2: f64) -> f64 {
    let d = (h1 - h2).abs() % 360.0;
    if d > 180.0 { 360.0 - d } else { d }
}

/// Similarity term: 1 for identical colours, decaying with ΔE.
pub fn similarity(a: &ColorFeatures, b: &ColorFeatures, tunables: &Tunables) -> f64 {
    gauss(delta_e76(&a.lab, &b.lab), tunables.sigma_e)
}

/// Complement term: 1 when hues sit exactly opposite each other.
pub fn complement(a: &ColorFeatures, b: &ColorFeatures, tunables: &Tunables) -> f64 {
    gauss(hue_distance(a.hue, b.hue) - 180.0, tunables.sigma_h)
}

/// Combined correlation score in `[0, 1]`.
pub fn correlation(a: &ColorFeatures, b: &ColorFeatures, tunables: &Tunables) -> f64 {
    let sim = similarity(a, b, tunables);
    let comp = complement(a, b, tunables);
    (tunables.w_sim * sim + tunables.w_comp * comp).clamp(0.0, 1.0)
}

/// Scores for every unordered pair, stored as the upper triangle.
///
/// Row `i` holds the scores of `(i, j)` for `j > i`. Each score is computed
/// exactly once, so lookups from either side return the same bits.
#[derive(Clone, Debug)]
pub struct PairScores {
    rows: Vec<Vec<f64>>,
}

impl PairScores {
    pub fn compute(features: &[ColorFeatures], tunables: &Tunables) -> Self {
        let rows = (0..features.len())
            .into_par_iter()
            .map(|i| {
                features[i + 1..]
                    .iter()
                    .map(|other| correlation(&features[i], other, tunables))
                    .collect::<Vec<f64>>()
            })
            .collect();
        Self { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Score of the pair `{a, b}`; `None` for self pairs or out-of-range indices.
    pub fn get(&self, a: usize, b: usize) -> Option<f64> {
        let (lo, hi) = match a.cmp(&b) {
            std::cmp::Ordering::Less => (a, b),
            std::cmp::Ordering::Greater => (b, a),
            std::cmp::Ordering::Equal => return None,
        };
        self.rows.get(lo)?.get(hi - lo - 1).copied()
    }

    /// Neighbours of `item` in ascending index order, skipping scores below
    /// `min_link`.
    pub fn neighbours(
        &self,
        item: usize,
        min_link: Option<f64>,
    ) -> impl Iterator<Item = (usize, f64)> + '_ {
        (0..self.len())
            .filter_map(move |other| self.get(item, other).map(|score| (other, score)))
            .filter(move |&(_, score)| min_link.is_none_or(|min| score >= min))
    }
}
