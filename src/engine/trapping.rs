//! Empirical sediment-trapping curve for detention ponds.

/// Sediment-trapping efficiency of a pond for one event, in [0, 1].
///
/// `trapped_runoff` is the volume the pond actually retains
/// (`min(max_capacity, total_runoff)`). When the pond fully contains the
/// event the efficiency is exactly 1.0; otherwise it follows an empirical
/// curve over the ratio of available capacity to incoming runoff volume,
/// clamped to [0, 100] percent before conversion to a fraction.
///
/// The denominator is the total incoming runoff *before* subtracting the
/// trapped volume.
pub(crate) fn trapping_efficiency(
    available_capacity: f64,
    total_runoff: f64,
    trapped_runoff: f64,
) -> f64 {
    if total_runoff - trapped_runoff == 0.0 {
        return 1.0;
    }

    let capacity_ratio = available_capacity / total_runoff;
    let percent = -22.0 + (119.0 * capacity_ratio) / (0.012 + 1.02 * capacity_ratio);
    percent.clamp(0.0, 100.0) / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_containment_is_perfectly_efficient() {
        assert_eq!(trapping_efficiency(10.0, 5.0, 5.0), 1.0);
    }

    #[test]
    fn zero_available_capacity_traps_nothing() {
        // capacity ratio 0 puts the raw curve at -22%, clamped to zero
        assert_eq!(trapping_efficiency(0.0, 10.0, 0.0), 0.0);
    }

    #[test]
    fn efficiency_stays_within_unit_interval() {
        for avail in [0.0f64, 0.1, 1.0, 5.0, 50.0, 1e6] {
            for total in [0.5, 1.0, 10.0, 1e4] {
                let trapped = avail.min(total) * 0.5;
                let eff = trapping_efficiency(avail, total, trapped);
                assert!((0.0..=1.0).contains(&eff), "avail={avail} total={total} eff={eff}");
            }
        }
    }

    #[test]
    fn large_capacity_ratio_approaches_curve_ceiling() {
        // r -> inf limit of the raw curve is -22 + 119/1.02 ~ 94.667%
        let eff = trapping_efficiency(1e9, 1.0, 0.5);
        assert!((eff - 0.946_67).abs() < 1e-3);
        assert!(eff < 1.0);
    }

    #[test]
    fn efficiency_grows_with_available_capacity() {
        let low = trapping_efficiency(0.5, 10.0, 0.5);
        let high = trapping_efficiency(5.0, 10.0, 5.0);
        assert!(low < high);
    }
}
