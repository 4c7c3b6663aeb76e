//! Series building: telemetry bundle -> per-driver (distance, value) lines.
//!
//! Every driver is plotted against its own distance samples. The axis label
//! set comes from the reference driver only, so other drivers' points may fall
//! between labels; the plot x-axis is continuous, not categorical.

use crate::telemetry::{ActiveDriverSet, DriverCode, DriverRecord, Metric, TelemetryBundle};

/// One driver's line for one metric
#[derive(Clone, Debug, PartialEq)]
pub struct DriverSeries {
    pub driver: DriverCode,
    /// Position in the active driver set (colour index and draw order)
    pub slot: usize,
    /// `[distance, value]` pairs, empty when the driver or metric is missing
    pub points: Vec<[f64; 2]>,
}

impl DriverSeries {
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Value at a sample index
    pub fn value_at(&self, index: usize) -> Option<f64> {
        self.points.get(index).map(|p| p[1])
    }
}

/// Build one series per active driver for `metric`, in set order.
///
/// Drivers absent from the bundle, or lacking the metric, get an empty series.
pub fn build_series(
    bundle: &TelemetryBundle,
    active: &ActiveDriverSet,
    metric: Metric,
) -> Vec<DriverSeries> {
    active
        .iter()
        .enumerate()
        .map(|(slot, code)| DriverSeries {
            driver: code.clone(),
            slot,
            points: bundle
                .get(code.as_str())
                .map(|record| driver_points(code, record, metric))
                .unwrap_or_default(),
        })
        .collect()
}

/// Pair a driver's own distance samples with the metric at the same index
pub fn driver_points(code: &DriverCode, record: &DriverRecord, metric: Metric) -> Vec<[f64; 2]> {
    let (Some(distance), Some(values)) = (record.distance(), record.metric(metric)) else {
        return Vec::new();
    };

    if distance.len() != values.len() {
        tracing::warn!(
            "Skipping {} for {}: {} samples against {} distance samples",
            metric,
            code,
            values.len(),
            distance.len()
        );
        return Vec::new();
    }

    distance
        .iter()
        .zip(values.iter())
        .map(|(&x, &y)| [x, y])
        .collect()
}

// ============================================================================
// Reference driver
// ============================================================================

/// Which driver's distance trace drives axis labels and sector boundaries
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum ReferencePolicy {
    /// First driver in the active set that has a distance trace.
    ///
    /// Drivers absent from the bundle are skipped, so axis labels and sector
    /// lines still render when the first requested driver has no data.
    #[default]
    FirstActive,
    /// A specific driver, falling back to [`ReferencePolicy::FirstActive`]
    /// when that driver is not active or has no trace
    Driver(DriverCode),
}

impl ReferencePolicy {
    pub fn resolve<'a>(
        &self,
        active: &'a ActiveDriverSet,
        bundle: &'a TelemetryBundle,
    ) -> Option<(&'a DriverCode, &'a DriverRecord)> {
        let mut candidates = active
            .present_in(bundle)
            .filter(|(_, _, record)| record.distance().is_some_and(|d| !d.is_empty()))
            .map(|(_, code, record)| (code, record));

        match self {
            ReferencePolicy::FirstActive => candidates.next(),
            ReferencePolicy::Driver(wanted) => {
                let mut first = None;
                for (code, record) in candidates {
                    if code == wanted {
                        return Some((code, record));
                    }
                    first.get_or_insert((code, record));
                }
                first
            }
        }
    }
}

/// Axis label set: the reference distance samples rounded to whole metres
pub fn axis_labels(distance: &[f64]) -> Vec<i64> {
    distance.iter().map(|d| d.round() as i64).collect()
}

/// Index of the sample nearest to `x` in a non-decreasing distance trace
pub fn nearest_index(distance: &[f64], x: f64) -> Option<usize> {
    if distance.is_empty() {
        return None;
    }

    let mut low = 0;
    let mut high = distance.len() - 1;
    while low < high {
        let mid = (low + high) / 2;
        if distance[mid] < x {
            low = mid + 1;
        } else {
            high = mid;
        }
    }

    // Check if low or low-1 is closer
    if low > 0 && (distance[low] - x).abs() > (distance[low - 1] - x).abs() {
        Some(low - 1)
    } else {
        Some(low)
    }
}

/// LTTB (Largest Triangle Three Buckets) downsampling algorithm
/// Reduces data points while preserving visual shape
pub fn downsample_lttb(points: &[[f64; 2]], target_points: usize) -> Vec<[f64; 2]> {
    let n = points.len();

    if n <= target_points || target_points < 3 {
        return points.to_vec();
    }

    let mut result = Vec::with_capacity(target_points);

    // Always include first point
    result.push(points[0]);

    let bucket_size = (n - 2) as f64 / (target_points - 2) as f64;
    let mut a_index = 0usize;

    for i in 0..(target_points - 2) {
        let bucket_start = ((i as f64 + 1.0) * bucket_size).floor() as usize + 1;
        let bucket_end = ((((i + 2) as f64) * bucket_size).floor() as usize + 1).min(n - 1);

        // Average of the next bucket is the third triangle vertex
        let next_start = bucket_end;
        let next_end = ((((i + 3) as f64) * bucket_size).floor() as usize + 1).min(n);

        let [avg_x, avg_y] = if next_start < next_end {
            let count = (next_end - next_start) as f64;
            let (sum_x, sum_y) = points[next_start..next_end]
                .iter()
                .fold((0.0, 0.0), |(sx, sy), p| (sx + p[0], sy + p[1]));
            [sum_x / count, sum_y / count]
        } else {
            points[n - 1]
        };

        let [a_x, a_y] = points[a_index];
        let mut max_area = -1.0f64;
        let mut max_index = bucket_start;

        for (j, p) in points.iter().enumerate().take(bucket_end).skip(bucket_start) {
            let area = ((a_x - avg_x) * (p[1] - a_y) - (a_x - p[0]) * (avg_y - a_y)).abs();
            if area > max_area {
                max_area = area;
                max_index = j;
            }
        }

        result.push(points[max_index]);
        a_index = max_index;
    }

    // Always include last point
    result.push(points[n - 1]);

    result
}
