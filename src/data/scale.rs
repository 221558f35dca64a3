use super::aggregate::Series;

/// Approximate tick count used when rounding a domain outward.
const TICK_COUNT: f64 = 10.0;

/// A closed plotting interval `[min, max]` with `min < max`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Domain {
    pub min: f64,
    pub max: f64,
}

/// Plot bounds on both axes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartBounds {
    pub x: Domain,
    pub y: Domain,
}

impl ChartBounds {
    /// Extents of all points across `series`, padded and niced.
    /// `None` when there are no points.
    pub fn from_series(series: &[Series]) -> Option<Self> {
        let points = series.iter().flat_map(|s| s.values.iter());
        let x = extent(points.clone().map(|p| p.timestamp))?;
        let y = extent(points.map(|p| p.value))?;
        Some(ChartBounds {
            x: nice_domain(x.0, x.1),
            y: nice_domain(y.0, y.1),
        })
    }
}

fn extent(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    values.fold(None, |acc, v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })
}

/// Tick step for `[start, stop]` rounded to 1, 2 or 5 times a power of ten.
fn tick_step(start: f64, stop: f64) -> f64 {
    let raw = (stop - start) / TICK_COUNT;
    let power = raw.log10().floor();
    let magnitude = 10f64.powf(power);
    let error = raw / magnitude;
    let factor = if error >= 50f64.sqrt() {
        10.0
    } else if error >= 10f64.sqrt() {
        5.0
    } else if error >= 2f64.sqrt() {
        2.0
    } else {
        1.0
    };
    factor * magnitude
}

/// Round `[min, max]` outward to tick boundaries.
///
/// A zero-width domain is first padded by 10% of its magnitude (or by 1 at
/// zero) so the result always has `min < max`.
pub fn nice_domain(min: f64, max: f64) -> Domain {
    let (mut lo, mut hi) = if min <= max { (min, max) } else { (max, min) };
    if hi - lo <= f64::EPSILON * lo.abs().max(1.0) {
        let pad = if lo == 0.0 { 1.0 } else { lo.abs() * 0.1 };
        lo -= pad;
        hi += pad;
    }

    let mut prev_step = None;
    for _ in 0..10 {
        let step = tick_step(lo, hi);
        if !step.is_finite() || step <= 0.0 || Some(step) == prev_step {
            break;
        }
        lo = (lo / step).floor() * step;
        hi = (hi / step).ceil() * step;
        prev_step = Some(step);
    }
    Domain { min: lo, max: hi }
}
