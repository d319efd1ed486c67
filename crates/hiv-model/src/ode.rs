//! Explicit Runge-Kutta integrators over fixed-size state vectors.
//!
//! Both drivers advance a system `dy/dt = f(t, y)` and report the state at a
//! caller-supplied, strictly increasing grid of output times. The solvers
//! always step exactly onto each output time, so no interpolation is involved.
//!
//! The adaptive driver uses the embedded Runge-Kutta-Fehlberg 4(5) pair,
//! advances with the fifth-order solution and controls the step with a mixed
//! absolute/relative error norm. A caller-supplied admissibility predicate
//! (e.g. "all compartments non-negative") turns inadmissible trial states into
//! rejected steps, so the step shrinks instead of the state being clipped.

use hiv_core::errors::{ErrorInfo, HivError};

use crate::config::SolverOptions;

const SAFETY: f64 = 0.9;
const MIN_SHRINK: f64 = 0.2;
const MAX_GROWTH: f64 = 5.0;
const INADMISSIBLE_SHRINK: f64 = 0.25;

/// Counters collected while integrating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OdeStats {
    /// Steps whose result was kept.
    pub accepted: usize,
    /// Steps discarded for excess error or an inadmissible state.
    pub rejected: usize,
    /// Right-hand side evaluations.
    pub evaluations: usize,
}

/// Performs one classical RK4 step of size `h` from `(t, y)`.
pub fn rk4_step<const N: usize, F>(f: &F, t: f64, y: &[f64; N], h: f64) -> [f64; N]
where
    F: Fn(f64, &[f64; N]) -> [f64; N],
{
    let half = 0.5 * h;
    let k1 = f(t, y);
    let k2 = f(t + half, &offset(y, h, &[(0.5, &k1)]));
    let k3 = f(t + half, &offset(y, h, &[(0.5, &k2)]));
    let k4 = f(t + h, &offset(y, h, &[(1.0, &k3)]));
    offset(
        y,
        h,
        &[(1.0 / 6.0, &k1), (1.0 / 3.0, &k2), (1.0 / 3.0, &k3), (1.0 / 6.0, &k4)],
    )
}

/// Performs one Runge-Kutta-Fehlberg step of size `h` from `(t, y)`.
///
/// Returns the fifth-order solution and the componentwise difference between
/// the fifth- and fourth-order solutions (the local error estimate).
pub fn rkf45_step<const N: usize, F>(
    f: &F,
    t: f64,
    y: &[f64; N],
    h: f64,
) -> ([f64; N], [f64; N])
where
    F: Fn(f64, &[f64; N]) -> [f64; N],
{
    let k1 = f(t, y);
    let k2 = f(t + h / 4.0, &offset(y, h, &[(1.0 / 4.0, &k1)]));
    let k3 = f(
        t + 3.0 * h / 8.0,
        &offset(y, h, &[(3.0 / 32.0, &k1), (9.0 / 32.0, &k2)]),
    );
    let k4 = f(
        t + 12.0 * h / 13.0,
        &offset(
            y,
            h,
            &[
                (1932.0 / 2197.0, &k1),
                (-7200.0 / 2197.0, &k2),
                (7296.0 / 2197.0, &k3),
            ],
        ),
    );
    let k5 = f(
        t + h,
        &offset(
            y,
            h,
            &[
                (439.0 / 216.0, &k1),
                (-8.0, &k2),
                (3680.0 / 513.0, &k3),
                (-845.0 / 4104.0, &k4),
            ],
        ),
    );
    let k6 = f(
        t + h / 2.0,
        &offset(
            y,
            h,
            &[
                (-8.0 / 27.0, &k1),
                (2.0, &k2),
                (-3544.0 / 2565.0, &k3),
                (1859.0 / 4104.0, &k4),
                (-11.0 / 40.0, &k5),
            ],
        ),
    );

    let fourth = offset(
        y,
        h,
        &[
            (25.0 / 216.0, &k1),
            (1408.0 / 2565.0, &k3),
            (2197.0 / 4104.0, &k4),
            (-1.0 / 5.0, &k5),
        ],
    );
    let fifth = offset(
        y,
        h,
        &[
            (16.0 / 135.0, &k1),
            (6656.0 / 12825.0, &k3),
            (28561.0 / 56430.0, &k4),
            (-9.0 / 50.0, &k5),
            (2.0 / 55.0, &k6),
        ],
    );

    let error = std::array::from_fn(|i| fifth[i] - fourth[i]);
    (fifth, error)
}

/// Integrates with classical RK4, splitting each output interval into equal
/// substeps no longer than `max_step`.
///
/// `times[0]` is the initial time; the returned vector holds one state per
/// entry of `times`, starting with `y0`. The total substep count is checked
/// against `max_steps` before any work is done. A substep that yields a
/// non-finite state or one rejected by `admissible` aborts the run with
/// `solver.unstable`; a fixed step cannot recover from it.
pub fn integrate_fixed<const N: usize, F, A>(
    f: F,
    y0: [f64; N],
    times: &[f64],
    max_step: f64,
    max_steps: usize,
    admissible: A,
) -> Result<(Vec<[f64; N]>, OdeStats), HivError>
where
    F: Fn(f64, &[f64; N]) -> [f64; N],
    A: Fn(&[f64; N]) -> bool,
{
    if !(max_step.is_finite() && max_step > 0.0) {
        return Err(solver_error(
            "solver.fixed_step",
            "fixed step must be positive and finite",
        ));
    }
    let plan: Vec<usize> = times
        .windows(2)
        .map(|w| ((w[1] - w[0]) / max_step).ceil().max(1.0) as usize)
        .collect();
    let total = plan.iter().try_fold(0usize, |acc, n| acc.checked_add(*n));
    if total.map_or(true, |total| total > max_steps) {
        return Err(HivError::InvalidParameter(
            ErrorInfo::new(
                "solver.step_limit",
                "fixed step needs more substeps than the step budget allows",
            )
            .with_context("step", max_step.to_string())
            .with_context("max_steps", max_steps.to_string())
            .with_hint("increase max_steps or use a larger step"),
        ));
    }

    let mut stats = OdeStats::default();
    let mut states = Vec::with_capacity(times.len());
    let mut y = y0;
    states.push(y);

    for (window, substeps) in times.windows(2).zip(plan) {
        let start = window[0];
        let h = (window[1] - start) / substeps as f64;
        for k in 0..substeps {
            let t = start + k as f64 * h;
            y = rk4_step(&f, t, &y, h);
            stats.accepted += 1;
            stats.evaluations += 4;
            if !(y.iter().all(|v| v.is_finite()) && admissible(&y)) {
                return Err(HivError::InvalidParameter(
                    ErrorInfo::new(
                        "solver.unstable",
                        "fixed step produced a non-finite or inadmissible state",
                    )
                    .with_context("t", (t + h).to_string())
                    .with_context("step", h.to_string())
                    .with_hint("reduce the fixed step or use the adaptive solver"),
                ));
            }
        }
        states.push(y);
    }
    Ok((states, stats))
}

/// Integrates with the adaptive RKF45 driver.
///
/// `admissible` is consulted for every trial state; returning `false` rejects
/// the step and retries with a quarter of the step size.
pub fn integrate_adaptive<const N: usize, F, A>(
    f: F,
    y0: [f64; N],
    times: &[f64],
    opts: &SolverOptions,
    admissible: A,
) -> Result<(Vec<[f64; N]>, OdeStats), HivError>
where
    F: Fn(f64, &[f64; N]) -> [f64; N],
    A: Fn(&[f64; N]) -> bool,
{
    validate_options(opts)?;
    let mut stats = OdeStats::default();
    let mut states = Vec::with_capacity(times.len());
    let mut y = y0;
    states.push(y);

    let Some(&first) = times.first() else {
        return Ok((states, stats));
    };
    let mut t = first;
    let spacing = times
        .windows(2)
        .map(|w| w[1] - w[0])
        .fold(f64::INFINITY, f64::min);
    let mut h = opts.max_step.min(spacing) * 0.01;

    for &target in &times[1..] {
        while t < target {
            if stats.accepted + stats.rejected >= opts.max_steps {
                return Err(HivError::InvalidParameter(
                    ErrorInfo::new(
                        "solver.step_limit",
                        "integration exceeded the step budget",
                    )
                    .with_context("t", t.to_string())
                    .with_context("max_steps", opts.max_steps.to_string())
                    .with_hint("the rates are too stiff for the requested tolerances"),
                ));
            }
            let remaining = target - t;
            let limit = h.min(opts.max_step);
            let lands = limit >= remaining;
            let step = if lands { remaining } else { limit };

            let (trial, error) = rkf45_step(&f, t, &y, step);
            stats.evaluations += 6;
            let norm = error_norm(&y, &trial, &error, opts.rtol, opts.atol);
            let ok = norm.is_finite() && trial.iter().all(|v| v.is_finite()) && admissible(&trial);

            if ok && norm <= 1.0 {
                stats.accepted += 1;
                t = if lands { target } else { t + step };
                y = trial;
                let factor = if norm == 0.0 {
                    MAX_GROWTH
                } else {
                    (SAFETY * norm.powf(-0.2)).clamp(MIN_SHRINK, MAX_GROWTH)
                };
                h = if lands {
                    h.max(step * factor)
                } else {
                    step * factor
                };
            } else {
                stats.rejected += 1;
                let factor = if ok {
                    (SAFETY * norm.powf(-0.25)).clamp(MIN_SHRINK, 1.0)
                } else {
                    INADMISSIBLE_SHRINK
                };
                h = step * factor;
                if h < opts.min_step {
                    return Err(HivError::InvalidParameter(
                        ErrorInfo::new("solver.step_collapse", "step size underflow")
                            .with_context("t", t.to_string())
                            .with_context("step", h.to_string()),
                    ));
                }
            }
        }
        states.push(y);
    }
    Ok((states, stats))
}

fn validate_options(opts: &SolverOptions) -> Result<(), HivError> {
    let positive = |v: f64| v.is_finite() && v > 0.0;
    if !positive(opts.rtol) || !positive(opts.atol) {
        return Err(solver_error(
            "solver.tolerance",
            "tolerances must be positive and finite",
        ));
    }
    if !positive(opts.max_step) || !positive(opts.min_step) || opts.min_step > opts.max_step {
        return Err(solver_error(
            "solver.step_bounds",
            "step bounds must satisfy 0 < min_step <= max_step",
        ));
    }
    Ok(())
}

fn solver_error(code: &str, message: &str) -> HivError {
    HivError::InvalidParameter(ErrorInfo::new(code, message))
}

fn error_norm<const N: usize>(
    y: &[f64; N],
    trial: &[f64; N],
    error: &[f64; N],
    rtol: f64,
    atol: f64,
) -> f64 {
    (0..N)
        .map(|i| {
            let scale = atol + rtol * y[i].abs().max(trial[i].abs());
            error[i].abs() / scale
        })
        .fold(0.0, f64::max)
}

fn offset<const N: usize>(y: &[f64; N], h: f64, terms: &[(f64, &[f64; N])]) -> [f64; N] {
    let mut out = *y;
    for (coef, k) in terms {
        for i in 0..N {
            out[i] += h * coef * k[i];
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(end: f64, n: usize) -> Vec<f64> {
        (0..n).map(|i| end * i as f64 / (n - 1) as f64).collect()
    }

    #[test]
    fn exponential_decay_adaptive() {
        let times = grid(10.0, 11);
        let (states, stats) = integrate_adaptive(
            |_t, y: &[f64; 1]| [-0.5 * y[0]],
            [1.0],
            &times,
            &SolverOptions::default(),
            |_| true,
        )
        .unwrap();
        let expected = (-0.5_f64 * 10.0).exp();
        assert!((states[10][0] - expected).abs() < 1e-6);
        assert!(stats.accepted >= 10);
    }

    #[test]
    fn exponential_decay_fixed() {
        let times = grid(10.0, 6);
        let (states, stats) = integrate_fixed(
            |_t, y: &[f64; 1]| [-0.5 * y[0]],
            [1.0],
            &times,
            0.01,
            10_000,
            |_| true,
        )
        .unwrap();
        let expected = (-0.5_f64 * 10.0).exp();
        assert!((states[5][0] - expected).abs() < 1e-8);
        assert_eq!(stats.accepted, 1000);
    }

    #[test]
    fn fixed_step_beyond_stability_is_an_error() {
        // h * 60 = 6 lies outside the RK4 stability interval.
        let times = grid(50.0, 2);
        let err = integrate_fixed(
            |_t, y: &[f64; 1]| [-60.0 * y[0]],
            [1.0],
            &times,
            0.1,
            10_000,
            |_| true,
        )
        .unwrap_err();
        assert_eq!(err.info().code, "solver.unstable");
    }

    #[test]
    fn fixed_step_rejects_inadmissible_states() {
        // Constant drain crosses zero halfway through the window.
        let err = integrate_fixed(
            |_t, _y: &[f64; 1]| [-1.0],
            [0.5],
            &[0.0, 1.0],
            0.01,
            10_000,
            |y| y[0] >= 0.0,
        )
        .unwrap_err();
        assert_eq!(err.info().code, "solver.unstable");
    }

    #[test]
    fn fixed_step_budget_is_checked_up_front() {
        let calls = std::cell::Cell::new(0usize);
        let err = integrate_fixed(
            |_t, y: &[f64; 1]| {
                calls.set(calls.get() + 1);
                [-y[0]]
            },
            [1.0],
            &[0.0, 10.0],
            0.01,
            999,
            |_| true,
        )
        .unwrap_err();
        assert_eq!(err.info().code, "solver.step_limit");
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn harmonic_oscillator_keeps_radius() {
        let times = grid(2.0 * std::f64::consts::PI, 9);
        let (states, _) = integrate_adaptive(
            |_t, y: &[f64; 2]| [-y[1], y[0]],
            [1.0, 0.0],
            &times,
            &SolverOptions::default(),
            |_| true,
        )
        .unwrap();
        let last = states.last().unwrap();
        assert!((last[0] - 1.0).abs() < 1e-5);
        assert!(last[1].abs() < 1e-5);
    }

    #[test]
    fn inadmissible_states_shrink_the_step() {
        // Fast decay toward zero; a coarse step would overshoot below zero.
        let times = [0.0, 1.0];
        let opts = SolverOptions {
            max_step: 1.0,
            ..SolverOptions::default()
        };
        let (states, _) = integrate_adaptive(
            |_t, y: &[f64; 1]| [-40.0 * y[0]],
            [1.0],
            &times,
            &opts,
            |y| y[0] >= 0.0,
        )
        .unwrap();
        assert!(states[1][0] >= 0.0);
    }

    #[test]
    fn step_budget_is_enforced() {
        let opts = SolverOptions {
            max_steps: 3,
            ..SolverOptions::default()
        };
        let err = integrate_adaptive(
            |_t, y: &[f64; 1]| [-y[0]],
            [1.0],
            &[0.0, 100.0],
            &opts,
            |_| true,
        )
        .unwrap_err();
        assert_eq!(err.info().code, "solver.step_limit");
    }
}
