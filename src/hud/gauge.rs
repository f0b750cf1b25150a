//! Gauges: horizontal bars for resource levels and speed.
//!
//! Gauges render to plain strings; the scene decides where they go.

/// Visual style for a gauge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GaugeStyle {
    /// Classic solid bar: ████████░░░░
    #[default]
    Solid,
    /// ASCII style: ========....
    Ascii,
}

impl GaugeStyle {
    /// The filled and empty characters for this style.
    const fn chars(self) -> (char, char) {
        match self {
            Self::Solid => ('█', '░'),
            Self::Ascii => ('=', '.'),
        }
    }
}

/// What the gauge's trailing readout shows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Readout {
    /// The fraction as a percentage: ` 87%`.
    Percent,
    /// The raw value against a maximum, with a unit: ` 1.23 m/s`.
    Value {
        /// Value that fills the bar.
        max: f64,
        /// Unit suffix.
        unit: &'static str,
    },
}

/// A labelled horizontal bar.
#[derive(Debug, Clone, PartialEq)]
pub struct Gauge {
    /// Leading icon.
    pub icon: &'static str,
    /// Label shown before the bar.
    pub label: &'static str,
    /// Bar width in cells.
    pub width: usize,
    /// Bar characters.
    pub style: GaugeStyle,
    /// Trailing readout.
    pub readout: Readout,
}

impl Gauge {
    /// A percentage gauge.
    pub const fn percent(icon: &'static str, label: &'static str, width: usize) -> Self {
        Self {
            icon,
            label,
            width,
            style: GaugeStyle::Solid,
            readout: Readout::Percent,
        }
    }

    /// A value gauge filled at `max`.
    pub const fn value(
        icon: &'static str,
        label: &'static str,
        width: usize,
        max: f64,
        unit: &'static str,
    ) -> Self {
        Self {
            icon,
            label,
            width,
            style: GaugeStyle::Solid,
            readout: Readout::Value { max, unit },
        }
    }

    /// Use a different bar style.
    #[must_use]
    pub const fn with_style(mut self, style: GaugeStyle) -> Self {
        self.style = style;
        self
    }

    /// Render the gauge for `value`.
    #[allow(clippy::cast_possible_truncation)]
    #[allow(clippy::cast_sign_loss)]
    pub fn render(&self, value: f64) -> String {
        let fraction = match self.readout {
            Readout::Percent => value,
            Readout::Value { max, .. } if max > 0.0 => value / max,
            Readout::Value { .. } => 0.0,
        };
        let fraction = if fraction.is_nan() { 0.0 } else { fraction.clamp(0.0, 1.0) };
        let filled = ((fraction * self.width as f64).round() as usize).min(self.width);
        let (full, empty) = self.style.chars();

        let mut out = format!("{} {}: ", self.icon, self.label);
        out.extend(std::iter::repeat(full).take(filled));
        out.extend(std::iter::repeat(empty).take(self.width - filled));
        match self.readout {
            Readout::Percent => {
                out.push_str(&format!(" {:>3}%", (fraction * 100.0) as u32));
            }
            Readout::Value { unit, .. } => {
                out.push_str(&format!(" {value:4.2} {unit}"));
            }
        }
        out
    }
}
