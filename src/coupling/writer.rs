//! Stress-period averaging and masked writes into recharge grids

use crate::core::error::{CouplerError, Result};
use crate::core::grid::{Grid, Mask};
use crate::core::types::Day;
use crate::coupling::series::SourceSeries;
use crate::modflow::StressPeriod;

/// Representative flux for one stress period starting at `start`
///
/// A daily series must satisfy `start < len` and `start + duration < len`.
/// The second bound is strict, so the last day of the series can never
/// close a window. A zero-length period takes the value at `start`
/// rather than averaging an empty window.
pub fn period_value(
    series: &SourceSeries,
    period: &StressPeriod,
    start: Day,
    source: &str,
) -> Result<f64> {
    let values = match series {
        SourceSeries::Constant(value) => return Ok(*value),
        SourceSeries::Daily(values) => values,
    };

    let overrun = || CouplerError::StressPeriodOverrun {
        period: period.index,
        model: source.to_string(),
    };
    let end = start
        .checked_add(period.duration_days())
        .ok_or_else(overrun)?;
    if start >= values.len() || end >= values.len() {
        return Err(overrun());
    }

    if end == start {
        return Ok(values[start]);
    }

    let window = &values[start..end];
    Ok(window.iter().sum::<f64>() / window.len() as f64)
}

/// Representative flux for every stress period, in order
pub fn period_values(
    series: &SourceSeries,
    periods: &[StressPeriod],
    source: &str,
) -> Result<Vec<f64>> {
    let mut period_start: Day = 0;
    let mut values = Vec::with_capacity(periods.len());
    for period in periods {
        let value = period_value(series, period, period_start, source)?;
        let period_end = period_start.saturating_add(period.duration_days());
        tracing::debug!(
            "{}: stress period {} days {}..{} -> {}",
            source,
            period.index + 1,
            period_start,
            period_end,
            value
        );
        values.push(value);
        period_start = period_end;
    }
    Ok(values)
}

/// Write one value per stress period into the masked cells of its grid
pub fn apply_to_recharge(recharge: &mut [Grid<f64>], mask: &Mask, values: &[f64]) -> Result<()> {
    if recharge.len() != values.len() {
        return Err(CouplerError::PeriodCountMismatch {
            periods: values.len(),
            arrays: recharge.len(),
        });
    }
    for (grid, value) in recharge.iter_mut().zip(values) {
        if grid.dims() != mask.dims() {
            let ((rows, cols), (found_rows, found_cols)) = (grid.dims(), mask.dims());
            return Err(CouplerError::MaskDimensionMismatch {
                rows,
                cols,
                found_rows,
                found_cols,
            });
        }
        grid.fill_masked(mask, *value);
    }
    Ok(())
}

/// Average `series` over `periods` and write it under `mask`
pub fn write_source_to_periods(
    recharge: &mut [Grid<f64>],
    periods: &[StressPeriod],
    mask: &Mask,
    series: &SourceSeries,
    source: &str,
) -> Result<()> {
    let values = period_values(series, periods, source)?;
    apply_to_recharge(recharge, mask, &values)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn periods(durations: &[f64]) -> Vec<StressPeriod> {
        durations
            .iter()
            .enumerate()
            .map(|(index, length)| StressPeriod {
                index,
                length: *length,
            })
            .collect()
    }

    fn mask(rows: Vec<Vec<f64>>) -> Mask {
        Mask::from_shape(&Grid::from_rows(rows).unwrap())
    }

    #[test]
    fn test_first_window_mean() {
        let series = SourceSeries::Daily(vec![2.0, 4.0, 6.0, 8.0]);
        let p = periods(&[2.0, 2.0]);
        assert_eq!(period_value(&series, &p[0], 0, "loam").unwrap(), 3.0);
    }

    #[test]
    fn test_strict_upper_bound_rejects_exact_fit() {
        // 2 + 2 days would end exactly at the series length
        let series = SourceSeries::Daily(vec![2.0, 4.0, 6.0, 8.0]);
        let err = period_values(&series, &periods(&[2.0, 2.0]), "loam").unwrap_err();
        match err {
            CouplerError::StressPeriodOverrun { period, model } => {
                assert_eq!(period, 1);
                assert_eq!(model, "loam");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_one_spare_day_is_enough() {
        let series = SourceSeries::Daily(vec![2.0, 4.0, 6.0, 8.0, 10.0]);
        let values = period_values(&series, &periods(&[2.0, 2.0]), "loam").unwrap();
        assert_eq!(values, vec![3.0, 7.0]);
    }

    #[test]
    fn test_fractional_lengths_truncate() {
        let series = SourceSeries::Daily(vec![1.0, 3.0, 5.0, 7.0, 9.0]);
        let values = period_values(&series, &periods(&[1.9, 2.2]), "loam").unwrap();
        assert_eq!(values, vec![1.0, 4.0]);
    }

    #[test]
    fn test_zero_length_period_uses_cursor_day() {
        let series = SourceSeries::Daily(vec![1.0, 3.0, 5.0]);
        let values = period_values(&series, &periods(&[0.0, 1.0, 0.0]), "loam").unwrap();
        assert_eq!(values, vec![1.0, 1.0, 3.0]);
    }

    #[test]
    fn test_constant_skips_validation() {
        let series = SourceSeries::Constant(5.0);
        let values = period_values(&series, &periods(&[365.0, 365.0, 365.0]), "c").unwrap();
        assert_eq!(values, vec![5.0; 3]);
    }

    #[test]
    fn test_huge_period_on_constant_does_not_overflow() {
        let series = SourceSeries::Constant(5.0);
        let values = period_values(&series, &periods(&[1e19, 1e30, 1e19]), "c").unwrap();
        assert_eq!(values, vec![5.0; 3]);
    }

    #[test]
    fn test_huge_period_on_series_is_overrun() {
        let series = SourceSeries::Daily(vec![1.0; 5]);
        let err = period_values(&series, &periods(&[1.0, 1e30]), "loam").unwrap_err();
        assert!(matches!(
            err,
            CouplerError::StressPeriodOverrun { period: 1, .. }
        ));
    }

    #[test]
    fn test_huge_start_cursor_is_overrun() {
        let series = SourceSeries::Daily(vec![1.0; 5]);
        let p = periods(&[2.0]);
        let err = period_value(&series, &p[0], usize::MAX, "loam").unwrap_err();
        assert!(matches!(
            err,
            CouplerError::StressPeriodOverrun { period: 0, .. }
        ));
    }

    #[test]
    fn test_mask_with_other_dimensions_is_rejected() {
        let m = mask(vec![vec![1.0, 1.0, 1.0]]);
        let mut recharge = vec![Grid::filled(2, 2, 0.0)];
        let err = write_source_to_periods(
            &mut recharge,
            &periods(&[30.0]),
            &m,
            &SourceSeries::Constant(1.0),
            "c",
        )
        .unwrap_err();
        assert!(matches!(
            err,
            CouplerError::MaskDimensionMismatch {
                rows: 2,
                cols: 2,
                found_rows: 1,
                found_cols: 3
            }
        ));
        assert_eq!(recharge[0].values(), &[0.0; 4]);
    }

    #[test]
    fn test_apply_only_touches_masked_cells() {
        let m = mask(vec![vec![1.0, 0.0], vec![2.0, 1.0]]);
        let mut recharge = vec![Grid::filled(2, 2, -1.0), Grid::filled(2, 2, -2.0)];
        apply_to_recharge(&mut recharge, &m, &[0.5, 0.75]).unwrap();
        assert_eq!(recharge[0].values(), &[0.5, -1.0, -1.0, 0.5]);
        assert_eq!(recharge[1].values(), &[0.75, -2.0, -2.0, 0.75]);
    }

    #[test]
    fn test_period_count_mismatch() {
        let m = mask(vec![vec![1.0]]);
        let mut recharge = vec![Grid::filled(1, 1, 0.0)];
        let err = apply_to_recharge(&mut recharge, &m, &[1.0, 2.0]).unwrap_err();
        assert!(matches!(
            err,
            CouplerError::PeriodCountMismatch {
                periods: 2,
                arrays: 1
            }
        ));
    }
}
