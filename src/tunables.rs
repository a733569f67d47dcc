use crate::GraphError;

/// ΔE (LAB) falloff; smaller means stricter similarity.
pub const SIGMA_E: f64 = 25.0;
/// Hue complement falloff, in degrees.
pub const SIGMA_H: f64 = 35.0;
/// Weight of the similarity term.
pub const W_SIM: f64 = 1.0;
/// Weight of the complement term.
pub const W_COMP: f64 = 0.5;
/// Images whose long side exceeds this are downscaled before averaging.
pub const MAX_ANALYSIS_SIDE: u32 = 1024;

/// Constants that shape every output value.
///
/// Threaded by reference into extraction and correlation so that a run is a
/// pure function of its inputs and this value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tunables {
    pub sigma_e: f64,
    pub sigma_h: f64,
    pub w_sim: f64,
    pub w_comp: f64,
    pub max_analysis_side: u32,
}

impl Default for Tunables {
    fn default() -> Self {
        Self {
            sigma_e: SIGMA_E,
            sigma_h: SIGMA_H,
            w_sim: W_SIM,
            w_comp: W_COMP,
            max_analysis_side: MAX_ANALYSIS_SIDE,
        }
    }
}

impl Tunables {
    pub fn validate(&self) -> Result<(), GraphError> {
        for (name, sigma) in [("sigma-e", self.sigma_e), ("sigma-h", self.sigma_h)] {
            if !sigma.is_finite() || sigma <= 0.0 {
                return Err(GraphError::InvalidConfiguration(format!(
                    "{name} must be a positive number, got {sigma}"
                )));
            }
        }
        for (name, weight) in [("w-sim", self.w_sim), ("w-comp", self.w_comp)] {
            if !weight.is_finite() {
                return Err(GraphError::InvalidConfiguration(format!(
                    "{name} must be finite, got {weight}"
                )));
            }
        }
        if self.max_analysis_side == 0 {
            return Err(GraphError::InvalidConfiguration(
                "max-analysis-side must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

/// Check an optional minimum-correlation threshold.
///
/// Any number is accepted: values at or below 0 keep every edge and values
/// above 1 drop them all. Only NaN, which compares false against every score,
/// is rejected.
pub fn validate_min_link(min_link: Option<f64>) -> Result<(), GraphError> {
    match min_link {
        Some(v) if v.is_nan() => Err(GraphError::InvalidConfiguration(
            "min-link must be a number, got NaN".into(),
        )),
        _ => Ok(()),
    }
}
