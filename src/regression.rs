use serde::Serialize;

pub const FEATURE_COUNT: usize = 3;

pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = ["total_balls", "wickets_lost", "innings"];

const MAX_SWEEPS: usize = 64;

type Matrix = [[f64; FEATURE_COUNT]; FEATURE_COUNT];

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LinearModel {
    pub intercept: f64,
    pub coeffs: [f64; FEATURE_COUNT],
}

impl LinearModel {
    pub fn predict(&self, x: [f64; FEATURE_COUNT]) -> f64 {
        self.intercept + dot(self.coeffs, x)
    }

    pub fn r_squared(&self, samples: &[[f64; FEATURE_COUNT]], targets: &[f64]) -> f64 {
        if samples.is_empty() || samples.len() != targets.len() {
            return 0.0;
        }
        let mean = targets.iter().sum::<f64>() / targets.len() as f64;
        let mut ss_res = 0.0;
        let mut ss_tot = 0.0;
        for (x, y) in samples.iter().zip(targets) {
            ss_res += (y - self.predict(*x)).powi(2);
            ss_tot += (y - mean).powi(2);
        }
        if ss_tot <= f64::EPSILON {
            return if ss_res <= 1e-9 { 1.0 } else { 0.0 };
        }
        1.0 - ss_res / ss_tot
    }
}

/// Closed-form ordinary least squares with an intercept.
///
/// Features and targets are centred, then the centred design is factored with a
/// one-sided Jacobi SVD. Singular values at or below `max(rows, features) * EPSILON`
/// of the largest get a zero coefficient, which yields the minimum-norm solution:
/// a single sample or a constant column still produces a model that reproduces
/// the training mean exactly, while nearly collinear columns are still resolved.
pub fn fit_least_squares(
    samples: &[[f64; FEATURE_COUNT]],
    targets: &[f64],
) -> Option<LinearModel> {
    if samples.is_empty() || samples.len() != targets.len() {
        return None;
    }

    let n = samples.len() as f64;
    let mut x_mean = [0.0; FEATURE_COUNT];
    for x in samples {
        for j in 0..FEATURE_COUNT {
            x_mean[j] += x[j];
        }
    }
    for v in &mut x_mean {
        *v /= n;
    }
    let y_mean = targets.iter().sum::<f64>() / n;

    let mut centred: Vec<[f64; FEATURE_COUNT]> = samples
        .iter()
        .map(|x| {
            let mut xc = [0.0; FEATURE_COUNT];
            for j in 0..FEATURE_COUNT {
                xc[j] = x[j] - x_mean[j];
            }
            xc
        })
        .collect();
    let y_centred: Vec<f64> = targets.iter().map(|y| y - y_mean).collect();

    let coeffs = solve_min_norm(&mut centred, &y_centred);
    Some(LinearModel {
        intercept: y_mean - dot(coeffs, x_mean),
        coeffs,
    })
}

/// Minimum-norm solution of `a * c = b`. `a` is overwritten with `U * S`.
fn solve_min_norm(a: &mut [[f64; FEATURE_COUNT]], b: &[f64]) -> [f64; FEATURE_COUNT] {
    let v = orthogonalize_columns(a);

    let mut sigma = [0.0; FEATURE_COUNT];
    for (k, s) in sigma.iter_mut().enumerate() {
        *s = a.iter().map(|row| row[k] * row[k]).sum::<f64>().sqrt();
    }
    let largest = sigma.iter().fold(0.0_f64, |acc, s| acc.max(*s));
    let mut out = [0.0; FEATURE_COUNT];
    if largest <= 0.0 {
        return out;
    }

    let cutoff = largest * f64::EPSILON * a.len().max(FEATURE_COUNT) as f64;
    for k in 0..FEATURE_COUNT {
        if sigma[k] <= cutoff {
            continue;
        }
        // u_k . b / s_k with u_k = a[:, k] / s_k
        let projection: f64 = a.iter().zip(b).map(|(row, y)| row[k] * y).sum();
        let weight = projection / (sigma[k] * sigma[k]);
        let column = column(&v, k);
        for i in 0..FEATURE_COUNT {
            out[i] += weight * column[i];
        }
    }
    out
}

/// One-sided Jacobi (Hestenes) rotations until the columns of `a` are mutually
/// orthogonal. Returns the accumulated right singular vectors as columns.
fn orthogonalize_columns(a: &mut [[f64; FEATURE_COUNT]]) -> Matrix {
    let mut v: Matrix = [[0.0; FEATURE_COUNT]; FEATURE_COUNT];
    for (i, row) in v.iter_mut().enumerate() {
        row[i] = 1.0;
    }

    for _ in 0..MAX_SWEEPS {
        let mut rotated = false;
        for p in 0..FEATURE_COUNT {
            for q in (p + 1)..FEATURE_COUNT {
                let mut alpha = 0.0;
                let mut beta = 0.0;
                let mut gamma = 0.0;
                for row in a.iter() {
                    alpha += row[p] * row[p];
                    beta += row[q] * row[q];
                    gamma += row[p] * row[q];
                }
                if gamma == 0.0 || gamma.abs() <= f64::EPSILON * (alpha * beta).sqrt() {
                    continue;
                }
                rotated = true;

                let zeta = (beta - alpha) / (2.0 * gamma);
                let t = zeta.signum() / (zeta.abs() + (zeta * zeta + 1.0).sqrt());
                let c = 1.0 / (t * t + 1.0).sqrt();
                let s = t * c;

                for row in a.iter_mut().chain(v.iter_mut()) {
                    let (rp, rq) = (row[p], row[q]);
                    row[p] = c * rp - s * rq;
                    row[q] = s * rp + c * rq;
                }
            }
        }
        if !rotated {
            break;
        }
    }
    v
}

fn column(m: &Matrix, k: usize) -> [f64; FEATURE_COUNT] {
    let mut out = [0.0; FEATURE_COUNT];
    for i in 0..FEATURE_COUNT {
        out[i] = m[i][k];
    }
    out
}

fn dot(a: [f64; FEATURE_COUNT], b: [f64; FEATURE_COUNT]) -> f64 {
    let mut out = 0.0;
    for i in 0..FEATURE_COUNT {
        out += a[i] * b[i];
    }
    out
}
