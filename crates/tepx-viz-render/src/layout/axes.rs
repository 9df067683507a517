/// Linear axis with tick generation and data→pixel mapping.
#[derive(Debug, Clone)]
pub struct Axis {
    pub min: f64,
    pub max: f64,
    pub label: String,
    pub tick_positions: Vec<f64>,
    pub tick_labels: Vec<String>,
    pub minor_ticks: Vec<f64>,
}

impl Axis {
    /// Auto-scale with "nice number" limits and ticks.
    pub fn auto_linear(data_min: f64, data_max: f64, target_ticks: usize) -> Self {
        let (nice_min, nice_max, step) = nice_range(data_min, data_max, target_ticks);
        Self::with_ticks(nice_min, nice_max, step)
    }

    /// Like [`Axis::auto_linear`] after widening the data range by `frac` on both sides.
    pub fn padded(data_min: f64, data_max: f64, frac: f64, target_ticks: usize) -> Self {
        let pad = (data_max - data_min).abs() * frac;
        Self::auto_linear(data_min - pad, data_max + pad, target_ticks)
    }

    /// Exact limits (e.g. histogram edges) with nice ticks inside them.
    pub fn exact(min: f64, max: f64, target_ticks: usize) -> Self {
        let (_, _, step) = nice_range(min, max, target_ticks);
        let mut axis =
            Self::with_ticks((min / step).ceil() * step, (max / step).floor() * step, step);
        axis.min = min;
        axis.max = max;
        axis
    }

    fn with_ticks(first: f64, last: f64, step: f64) -> Self {
        let mut ticks = Vec::new();
        let mut labels = Vec::new();
        let mut k = 0usize;
        loop {
            let v = first + k as f64 * step;
            if v > last + step * 0.01 {
                break;
            }
            ticks.push(v);
            labels.push(format_tick(v, step));
            k += 1;
        }

        // Minor ticks: 5 subdivisions per major.
        let minor_step = step / 5.0;
        let minor = (0..(ticks.len().saturating_sub(1) * 5))
            .map(|j| first + j as f64 * minor_step)
            .filter(|mv| !ticks.iter().any(|t| (t - mv).abs() < minor_step * 0.01))
            .collect();

        Self {
            min: first,
            max: last,
            label: String::new(),
            tick_positions: ticks,
            tick_labels: labels,
            minor_ticks: minor,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Map a data value to pixel coordinate.
    pub fn data_to_pixel(&self, value: f64, px_min: f64, px_max: f64) -> f64 {
        let span = self.max - self.min;
        if span.abs() < f64::EPSILON {
            return (px_min + px_max) / 2.0;
        }
        px_min + (value - self.min) / span * (px_max - px_min)
    }
}

/// "Nice numbers" algorithm for pleasant tick spacing.
fn nice_range(data_min: f64, data_max: f64, target_ticks: usize) -> (f64, f64, f64) {
    if !data_min.is_finite() || !data_max.is_finite() {
        return (0.0, 1.0, 0.2);
    }
    if (data_max - data_min).abs() < 1e-15 {
        return (data_min - 1.0, data_max + 1.0, 1.0);
    }
    let (lo, hi) = if data_min < data_max { (data_min, data_max) } else { (data_max, data_min) };
    let rough_step = (hi - lo) / (target_ticks.max(2) - 1) as f64;
    let step = nice_step(rough_step);
    ((lo / step).floor() * step, (hi / step).ceil() * step, step)
}

fn nice_step(rough: f64) -> f64 {
    let exp = rough.abs().log10().floor();
    let frac = rough / 10.0_f64.powf(exp);
    let nice_frac = if frac <= 1.5 {
        1.0
    } else if frac <= 3.5 {
        2.0
    } else if frac <= 7.5 {
        5.0
    } else {
        10.0
    };
    nice_frac * 10.0_f64.powf(exp)
}

fn format_tick(value: f64, step: f64) -> String {
    let decimals = if step >= 1.0 { 0 } else { (-step.log10() - 1e-9).ceil() as usize };
    // Avoid "-0".
    let v = if value.abs() < step * 0.01 { 0.0 } else { value };
    format!("{v:.decimals$}")
}
