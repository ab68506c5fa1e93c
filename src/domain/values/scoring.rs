//! Pure scoring math for niches and clusters.
//!
//! All inputs are already-normalized fractions (0.15, not "15%") — string
//! percentage parsing belongs to the upstream spreadsheet parser. Every
//! function here guards its own division-by-zero cases and returns a defined
//! fallback (typically 0) instead of propagating an error.

/// Volume above which a niche is treated as already established rather
/// than emerging.
const ESTABLISHED_VOLUME: f64 = 500_000.0;

/// Generic opportunity score: `volume * growth / competition`, clamped to
/// [0,100] and rounded. Zero or negative competition yields 0.
pub fn opportunity_score(volume: f64, growth: f64, competition: f64) -> u8 {
    if competition <= 0.0 {
        return 0;
    }
    let raw = (volume * growth) / competition;
    raw.clamp(0.0, 100.0).round() as u8
}

/// Refined whole-niche opportunity score. Each factor is normalized to [0,1]
/// before combining multiplicatively, so any factor at zero drives the score
/// to zero — a niche with no growth or no competing products is not
/// "opportunistic" regardless of volume.
pub fn niche_opportunity_score(volume: f64, growth_rate: f64, competing_products: usize) -> u8 {
    // log-compresses volume, saturating near 1,000,000
    let normalized_volume = (volume.max(10.0).log10() / 6.0).clamp(0.0, 1.0);
    // maps -50%..+100% growth onto 0..1
    let normalized_growth = ((growth_rate + 0.5) / 1.5).clamp(0.0, 1.0);
    let normalized_products = (competing_products as f64 / 50.0).clamp(0.0, 1.0);

    let score = normalized_volume * normalized_growth * normalized_products * 100.0;
    score.clamp(0.0, 100.0).round() as u8
}

/// Emergence score in [0,1]: flags a niche that is newly trending rather
/// than already saturated. Always 0 above 500k volume.
pub fn emergence_score(volume: f64, growth_90d: f64, growth_180d: f64) -> f64 {
    if volume > ESTABLISHED_VOLUME {
        return 0.0;
    }
    let volume_factor = (1.0 - volume / ESTABLISHED_VOLUME).max(0.0);
    let growth_factor = (growth_90d / 2.0).clamp(0.0, 1.0);
    // recent growth outpacing longer-term growth is weighted up
    let acceleration_factor = if growth_90d > growth_180d { 1.2 } else { 1.0 };

    (volume_factor * growth_factor * acceleration_factor).min(1.0)
}

/// Seasonality index in [0,1]: flags volume spikes concentrated in the most
/// recent quarter. 0 when total volume is 0.
pub fn seasonality_index(
    growth_90d: f64,
    growth_180d: f64,
    volume_90d: f64,
    total_volume: f64,
) -> f64 {
    if total_volume == 0.0 {
        return 0.0;
    }
    let spike_detection = (growth_90d - growth_180d).max(0.0);
    // flags when >=25% of yearly volume falls in the most recent quarter
    let recent_concentration = ((volume_90d / total_volume) * 4.0).min(1.0);

    (spike_detection * 0.7 + recent_concentration * 0.3).min(1.0)
}

/// Volume-weighted mean click share over (click_share, volume) pairs.
/// Defined as 0 when total volume is 0.
pub fn weighted_click_share(shares: &[(f64, f64)]) -> f64 {
    let total_volume: f64 = shares.iter().map(|(_, v)| v).sum();
    if total_volume == 0.0 {
        return 0.0;
    }
    shares.iter().map(|(s, v)| s * v).sum::<f64>() / total_volume
}

/// Arithmetic mean over the values that are actually present. The
/// denominator is the count of records carrying the field — missing values
/// are ignored, not treated as zero.
pub fn mean_present(values: impl Iterator<Item = Option<f64>>) -> Option<f64> {
    let mut sum = 0.0;
    let mut count = 0usize;
    for v in values.flatten() {
        sum += v;
        count += 1;
    }
    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}

/// Log-compressed volume normalization shared by the refined opportunity
/// score and insight confidence weighting.
pub fn normalized_volume(volume: f64) -> f64 {
    (volume.max(10.0).log10() / 6.0).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opportunity_score_zero_competition() {
        assert_eq!(opportunity_score(10_000.0, 0.5, 0.0), 0);
    }

    #[test]
    fn test_opportunity_score_clamps_to_100() {
        assert_eq!(opportunity_score(1_000_000.0, 1.0, 1.0), 100);
    }

    #[test]
    fn test_niche_score_zero_when_any_factor_zero() {
        // growth of -0.5 normalizes to 0
        assert_eq!(niche_opportunity_score(100_000.0, -0.5, 30), 0);
        // no competing products
        assert_eq!(niche_opportunity_score(100_000.0, 0.8, 0), 0);
    }

    #[test]
    fn test_niche_score_monotone_in_volume() {
        let low = niche_opportunity_score(1_000.0, 0.5, 25);
        let high = niche_opportunity_score(100_000.0, 0.5, 25);
        assert!(high >= low);
    }

    #[test]
    fn test_niche_score_monotone_in_growth() {
        let low = niche_opportunity_score(50_000.0, 0.1, 25);
        let high = niche_opportunity_score(50_000.0, 0.9, 25);
        assert!(high >= low);
    }

    #[test]
    fn test_niche_score_monotone_in_products() {
        let low = niche_opportunity_score(50_000.0, 0.5, 5);
        let high = niche_opportunity_score(50_000.0, 0.5, 45);
        assert!(high >= low);
    }

    #[test]
    fn test_emergence_zero_above_established_volume() {
        assert_eq!(emergence_score(500_001.0, 5.0, 0.1), 0.0);
        assert_eq!(emergence_score(2_000_000.0, -1.0, 3.0), 0.0);
    }

    #[test]
    fn test_emergence_acceleration_boost() {
        let accelerating = emergence_score(100_000.0, 0.6, 0.2);
        let steady = emergence_score(100_000.0, 0.6, 0.8);
        assert!(accelerating > steady);
    }

    #[test]
    fn test_emergence_capped_at_one() {
        let score = emergence_score(1_000.0, 10.0, 0.0);
        assert!(score <= 1.0);
    }

    #[test]
    fn test_seasonality_zero_total_volume() {
        assert_eq!(seasonality_index(1.0, 0.0, 100.0, 0.0), 0.0);
    }

    #[test]
    fn test_seasonality_recent_concentration() {
        // half the yearly volume in the last quarter, no growth spike
        let score = seasonality_index(0.0, 0.0, 500.0, 1000.0);
        assert!((score - 0.3).abs() < 1e-9);
    }

    #[test]
    fn test_weighted_click_share_bounds() {
        let shares = vec![(0.2, 1000.0), (0.8, 3000.0)];
        let wcs = weighted_click_share(&shares);
        assert!((0.0..=1.0).contains(&wcs));
        assert!((wcs - 0.65).abs() < 1e-9);
    }

    #[test]
    fn test_weighted_click_share_zero_volume() {
        assert_eq!(weighted_click_share(&[(0.5, 0.0)]), 0.0);
    }

    #[test]
    fn test_mean_present_ignores_missing() {
        let mean = mean_present(vec![Some(4.0), None, Some(2.0)].into_iter());
        assert_eq!(mean, Some(3.0));
        assert_eq!(mean_present(vec![None, None].into_iter()), None);
    }
}
