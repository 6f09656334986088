use crate::models::SeriesPoint;

/// Percent change from `base` to `current`.
///
/// `None` when `base` is zero or the result is not finite.
///
/// # Examples
///
/// ```
/// use macrodash_data::derived::yoy_percent;
///
/// assert_eq!(yoy_percent(110.0, 100.0), Some(10.0));
/// assert_eq!(yoy_percent(110.0, 0.0), None);
/// ```
pub fn yoy_percent(current: f64, base: f64) -> Option<f64> {
    if base == 0.0 {
        return None;
    }
    let pct = (current - base) / base * 100.0;
    pct.is_finite().then_some(pct)
}

/// Percent change between each pair of consecutive points, labelled with the later period.
///
/// Input must be ascending and free of nulls. Pairs without a defined change are skipped.
pub fn consecutive_yoy(series: &[SeriesPoint]) -> Vec<SeriesPoint> {
    series
        .windows(2)
        .filter_map(|pair| {
            let pct = yoy_percent(pair[1].value, pair[0].value)?;
            Some(SeriesPoint::new(pair[1].period.clone(), pct))
        })
        .collect()
}
