//! Property tests for flux conversion and stress-period averaging

use proptest::prelude::*;

use recharge_coupler::core::{CouplerError, Grid, Mask};
use recharge_coupler::coupling::{
    cumulative_to_flux, daily_series, period_values, write_source_to_periods, SourceSeries,
};
use recharge_coupler::modflow::StressPeriod;

fn periods(durations: &[usize]) -> Vec<StressPeriod> {
    durations
        .iter()
        .enumerate()
        .map(|(index, days)| StressPeriod {
            index,
            length: *days as f64,
        })
        .collect()
}

proptest! {
    #[test]
    fn flux_is_one_shorter_and_negated(cumulative in prop::collection::vec(-1.0e3f64..1.0e3, 2..200)) {
        let flux = cumulative_to_flux(&cumulative);
        prop_assert_eq!(flux.len(), cumulative.len() - 1);
        for (i, f) in flux.iter().enumerate() {
            prop_assert_eq!(*f, -(cumulative[i + 1] - cumulative[i]));
        }
    }

    #[test]
    fn spin_up_boundary(cumulative in prop::collection::vec(-1.0e3f64..1.0e3, 2..100)) {
        let n = cumulative.len() - 1;
        let fails = daily_series(&cumulative, n, "m");
        let is_spin_up_error = matches!(fails, Err(CouplerError::InsufficientSpinUpData { .. }));
        prop_assert!(is_spin_up_error);
        let last = daily_series(&cumulative, n - 1, "m").unwrap();
        prop_assert_eq!(last.len(), 1);
    }

    #[test]
    fn periods_fit_only_with_a_spare_day(
        durations in prop::collection::vec(1usize..10, 1..8),
        spare in 0usize..3,
    ) {
        let total: usize = durations.iter().sum();
        let series = SourceSeries::Daily(vec![1.0; total + spare]);
        let result = period_values(&series, &periods(&durations), "m");
        if spare >= 1 {
            prop_assert_eq!(result.unwrap(), vec![1.0; durations.len()]);
        } else {
            let overrun_on_last = matches!(
                result,
                Err(CouplerError::StressPeriodOverrun { period, .. }) if period == durations.len() - 1
            );
            prop_assert!(overrun_on_last);
        }
    }

    #[test]
    fn constant_fills_every_masked_cell(
        cells in prop::collection::vec(prop::bool::ANY, 12),
        value in -1.0f64..1.0,
        n_periods in 1usize..5,
    ) {
        let shape = Grid::from_vec(3, 4, cells.iter().map(|c| if *c { 1.0 } else { 0.0 }).collect()).unwrap();
        let mask = Mask::from_shape(&shape);
        let mut recharge = vec![Grid::filled(3, 4, -9.0); n_periods];

        write_source_to_periods(
            &mut recharge,
            &periods(&vec![30; n_periods]),
            &mask,
            &SourceSeries::Constant(value),
            "constant",
        )
        .unwrap();

        for grid in &recharge {
            for (cell, included) in grid.values().iter().zip(&cells) {
                let expected = if *included { value } else { -9.0 };
                prop_assert_eq!(*cell, expected);
            }
        }
    }
}
