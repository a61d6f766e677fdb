#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
}

impl LinearFit {
    pub fn at(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

struct Moments {
    sxx: f64,
    syy: f64,
    sxy: f64,
    mean_x: f64,
    mean_y: f64,
}

fn moments(xs: &[f64], ys: &[f64]) -> Option<Moments> {
    if xs.len() != ys.len() || xs.len() < 2 {
        return None;
    }
    let n = xs.len() as f64;
    let mean_x = xs.iter().sum::<f64>() / n;
    let mean_y = ys.iter().sum::<f64>() / n;

    let (mut sxx, mut syy, mut sxy) = (0.0, 0.0, 0.0);
    for (x, y) in xs.iter().zip(ys) {
        let dx = x - mean_x;
        let dy = y - mean_y;
        sxx += dx * dx;
        syy += dy * dy;
        sxy += dx * dy;
    }

    Some(Moments { sxx, syy, sxy, mean_x, mean_y })
}

/// Pearson correlation coefficient. `None` when undefined (length mismatch,
/// fewer than two points, or a constant series).
pub fn pearson(xs: &[f64], ys: &[f64]) -> Option<f64> {
    let m = moments(xs, ys)?;
    if m.sxx == 0.0 || m.syy == 0.0 {
        return None;
    }
    Some(m.sxy / (m.sxx * m.syy).sqrt())
}

/// Ordinary least squares fit of `ys` on `xs`.
pub fn linear_fit(xs: &[f64], ys: &[f64]) -> Option<LinearFit> {
    let m = moments(xs, ys)?;
    if m.sxx == 0.0 {
        return None;
    }
    let slope = m.sxy / m.sxx;
    Some(LinearFit { slope, intercept: m.mean_y - slope * m.mean_x })
}
