use plotters::style::RGBColor;

/// Display bucket for a crime rate (per 1,000 residents).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorBucket {
    Critical,
    High,
    Medium,
    Low,
}

impl ColorBucket {
    /// Highest bucket first, the order legends are drawn in.
    pub const ALL: [ColorBucket; 4] = [
        ColorBucket::Critical,
        ColorBucket::High,
        ColorBucket::Medium,
        ColorBucket::Low,
    ];

    pub fn hex(self) -> &'static str {
        match self {
            ColorBucket::Critical => "#d73027",
            ColorBucket::High => "#fc8d59",
            ColorBucket::Medium => "#fee090",
            ColorBucket::Low => "#91cf60",
        }
    }

    pub fn color(self) -> RGBColor {
        hex_to_rgb(self.hex())
    }

    pub fn label(self) -> &'static str {
        match self {
            ColorBucket::Critical => "Critical (≥70)",
            ColorBucket::High => "High (≥50)",
            ColorBucket::Medium => "Medium (≥30)",
            ColorBucket::Low => "Low (<30)",
        }
    }
}

impl std::fmt::Display for ColorBucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ColorBucket::Critical => write!(f, "CRITICAL"),
            ColorBucket::High => write!(f, "HIGH"),
            ColorBucket::Medium => write!(f, "MEDIUM"),
            ColorBucket::Low => write!(f, "LOW"),
        }
    }
}

/// Lower bounds are inclusive; NaN falls through to `Low`.
pub fn classify(rate: f64) -> ColorBucket {
    if rate >= 70.0 {
        ColorBucket::Critical
    } else if rate >= 50.0 {
        ColorBucket::High
    } else if rate >= 30.0 {
        ColorBucket::Medium
    } else {
        ColorBucket::Low
    }
}

pub fn hex_to_rgb(hex: &str) -> RGBColor {
    let hex = hex.trim_start_matches('#');
    let channel = |range: std::ops::Range<usize>| {
        hex.get(range)
            .and_then(|s| u8::from_str_radix(s, 16).ok())
            .unwrap_or(0)
    };
    RGBColor(channel(0..2), channel(2..4), channel(4..6))
}
