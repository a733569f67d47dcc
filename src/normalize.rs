/// Node scale relative to the largest image, in `[0.5, 1.0]`.
#[inline(always)]
pub fn scale_from_long_side(long_side: u32, max_long_side: u32) -> f64 {
    if max_long_side == 0 {
        return 0.5;
    }
    let ratio = (f64::from(long_side) / f64::from(max_long_side)).clamp(0.0, 1.0);
    0.5 + 0.5 * ratio
}

/// Scale factor for every item, in input order.
pub fn scale_factors(long_sides: &[u32]) -> Vec<f64> {
    let max_long_side = long_sides.iter().copied().max().unwrap_or(0);
    long_sides
        .iter()
        .map(|&side| scale_from_long_side(side, max_long_side))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn largest_gets_full_scale() {
        let scales = scale_factors(&[100, 400, 200]);
        assert_eq!(scales, vec![0.625, 1.0, 0.75]);
    }

    #[test]
    fn bounds() {
        assert_eq!(scale_from_long_side(0, 1024), 0.5);
        assert_eq!(scale_from_long_side(1024, 1024), 1.0);
        assert_eq!(scale_from_long_side(2048, 1024), 1.0);
        assert_eq!(scale_from_long_side(0, 0), 0.5);
    }

    #[test]
    fn monotonic() {
        let sides = [1, 5, 17, 300, 301, 1024];
        let scales = scale_factors(&sides);
        assert!(scales.windows(2).all(|w| w[0] <= w[1]));
        assert!(scales.iter().all(|s| (0.5..=1.0).contains(s)));
    }

    #[test]
    fn empty_input() {
        assert!(scale_factors(&[]).is_empty());
    }
}
