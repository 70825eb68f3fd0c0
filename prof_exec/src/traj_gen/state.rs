//! Implementations for the TrajGen state structure

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{debug, trace, warn};
use std::time::Instant;

// Internal
use super::{
    demand::{build_demand, Limits},
    filter::MovingSum,
    ConstraintViolation, Diagnostics, Params, TrajGenError, Trajectory, TrajectoryPoint,
    ViolationKind,
};
use crate::{
    drive::DriveSystem,
    path::Path,
    units::{ChassisAcceleration, ChassisVelocity},
};
use util::{
    maths::{ceil_tol, clamp as clamp_value},
    time::std_duration_to_millis,
};

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Tolerance used when rounding filter windows up to whole ticks, so that an
/// exact number of ticks isn't rounded up by floating point noise.
const WINDOW_ROUND_TOL: f64 = 1e-9;

/// Maximum number of forward/backward passes made when clamping.
const CLAMP_PASSES: usize = 16;

/// Shortfall below which a clamped trajectory is considered to have reached
/// the end of the path.
///
/// Units: feet
const CREEP_TOLERANCE_FT: f64 = 1e-9;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Trajectory generator.
///
/// The generator holds only its parameters, so one generator can be shared
/// between any number of threads generating trajectories at once.
#[derive(Clone, Debug, Default)]
pub struct TrajGen {
    params: Params,
}

/// The filter configuration of one generation attempt.
#[derive(Clone, Copy, Debug)]
struct Windows {
    fl1: usize,
    fl2: usize,

    /// Number of ticks the demand looks ahead (and behind) by
    margin_ticks: usize,
}

/// The raw output of one generation attempt.
struct Attempt {
    points: Vec<TrajectoryPoint>,

    /// Output of the acceleration filter at each tick after the first
    filter1_out: Vec<f64>,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl TrajGen {
    /// Create a new generator, validating its parameters.
    pub fn new(params: Params) -> Result<Self, TrajGenError> {
        params.validate()?;
        Ok(Self { params })
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Generate a trajectory along `path` for a chassis driven by `drive`.
    ///
    /// The path and drive are validated first. Every sample of the returned
    /// trajectory stays within the velocity limit of the path segment it is on
    /// and within the drive and path acceleration limits. If that cannot be
    /// achieved within the allowed number of retries the offending samples
    /// are clamped and recorded in the trajectory's diagnostics.
    pub fn generate<D: DriveSystem + ?Sized>(
        &self,
        path: &Path,
        drive: &D,
    ) -> Result<Trajectory, TrajGenError> {
        let start = Instant::now();

        path.validate()?;
        drive.validate()?;

        let limits = Limits::new(path, drive);
        let period_ms = drive.trajectory_iteration_period_ms();

        let fl1 = ceil_tol(limits.v_top_fps / (limits.a_max_fpss * limits.dt_s), WINDOW_ROUND_TOL)
            .max(1.0);
        let fl2 = ceil_tol(self.params.jerk_window_ratio * fl1, WINDOW_ROUND_TOL).max(1.0);

        // Refuse before allocating anything sized by the path or windows
        let settle_max = fl1 + fl2 + self.params.max_retries as f64;
        let estimate = limits.demand_ticks_bound()
            + (limits.sub_moves().count() as f64 + 1.0) * settle_max;
        if !(estimate <= self.params.max_samples as f64) {
            return Err(TrajGenError::TooManySamples {
                estimate,
                limit: self.params.max_samples,
            });
        }

        let (fl1, fl2) = (fl1 as usize, fl2 as usize);
        let mut windows = Windows {
            fl1,
            fl2,
            margin_ticks: fl1 + fl2 - 1,
        };

        debug!(
            "Generating along {} ft path with {}: top velocity {} ft/s, acceleration {} ft/s^2, \
            windows {}/{} ticks",
            path.length(),
            drive.name(),
            limits.v_top_fps,
            limits.a_max_fpss,
            windows.fl1,
            windows.fl2
        );

        let mut retries = 0;
        let (mut attempt, mut violations) = loop {
            let attempt = self.attempt(&limits, windows, period_ms);
            let violations = self.check(&limits, &attempt.points);

            if violations.is_empty() || retries >= self.params.max_retries {
                break (attempt, violations);
            }

            retries += 1;
            windows.fl1 += 1;
            windows.margin_ticks += windows.fl2 + 1;

            trace!(
                "Retry {}: {} violations, windows now {}/{} with {} ticks margin",
                retries,
                violations.len(),
                windows.fl1,
                windows.fl2,
                windows.margin_ticks
            );
        };

        if !violations.is_empty() {
            for v in &violations {
                warn!(
                    "{:?} limit broken at step {}: {} > {}, clamping",
                    v.kind, v.step, v.value, v.limit
                );
            }
            clamp(&limits, &mut attempt.points, path.length(), period_ms);

            for v in self.check(&limits, &attempt.points) {
                warn!(
                    "{:?} limit still broken at step {} after clamping: {} > {}",
                    v.kind, v.step, v.value, v.limit
                );
                violations.push(v);
            }
        }

        let mut diagnostics = Diagnostics {
            fl1_count: windows.fl1,
            fl2_count: windows.fl2,
            n_count: attempt.points.len(),
            retries,
            violations,
            ..Default::default()
        };
        diagnostics.set_phase_times(&attempt.filter1_out, period_ms);
        diagnostics.itp_ms = std_duration_to_millis(start.elapsed());

        debug!(
            "Generated {} samples in {:.3} ms (T1 {} ms, T2 {} ms, T4 {} ms)",
            diagnostics.n_count,
            diagnostics.itp_ms,
            diagnostics.t1_ms,
            diagnostics.t2_ms,
            diagnostics.t4_ms
        );

        Ok(Trajectory::new(attempt.points, diagnostics, period_ms))
    }

    /// Run the demand through both filters with the given windows.
    fn attempt(&self, limits: &Limits, windows: Windows, period_ms: u32) -> Attempt {
        // Demand for every sub-move, separated by enough zero ticks for the
        // filters to bring the output to rest at each stop
        let settle = windows.fl1 + windows.fl2 - 1;
        let mut demand = Vec::new();

        for (i, sub_move) in limits.sub_moves().enumerate() {
            if i > 0 {
                demand.extend(std::iter::repeat(0.0).take(settle));
            }
            demand.extend(build_demand(
                sub_move,
                limits.v_top_fps,
                limits.dt_s,
                windows.margin_ticks,
            ));
        }
        if !demand.is_empty() {
            demand.extend(std::iter::repeat(0.0).take(settle));
        }

        let mut filter1 = MovingSum::new(windows.fl1);
        let mut filter2 = MovingSum::new(windows.fl2);

        let mut points = Vec::with_capacity(demand.len() + 1);
        let mut filter1_out = Vec::with_capacity(demand.len());
        points.push(TrajectoryPoint::rest(0, period_ms, 0.0));

        let dt_s = limits.dt_s;
        let mut position_ft = 0.0;
        let mut prev_velocity_fps = 0.0;

        for (i, d) in demand.into_iter().enumerate() {
            let step = i + 1;
            let f1 = filter1.push(d);
            let velocity_fps = filter2.push(f1);

            position_ft += velocity_fps * dt_s;

            points.push(TrajectoryPoint {
                step,
                time_s: step as f64 * dt_s,
                duration_ms: period_ms,
                position_ft,
                velocity: ChassisVelocity::new(velocity_fps),
                acceleration: ChassisAcceleration::new((velocity_fps - prev_velocity_fps) / dt_s),
                filter1_sum: filter1.sum(),
                filter2_sum: filter2.sum(),
            });
            filter1_out.push(f1);

            prev_velocity_fps = velocity_fps;
        }

        Attempt {
            points,
            filter1_out,
        }
    }

    /// Find every sample breaking a limit.
    fn check(&self, limits: &Limits, points: &[TrajectoryPoint]) -> Vec<ConstraintViolation> {
        let tol = self.params.tolerance;
        let mut violations = Vec::new();

        for p in points.iter().skip(1) {
            let v_limit = limits.level_at(p.position_ft);
            let v = p.velocity.fps().abs();
            if v > v_limit + tol {
                violations.push(ConstraintViolation {
                    step: p.step,
                    kind: ViolationKind::Velocity,
                    value: v,
                    limit: v_limit,
                });
            }

            let a = p.acceleration.fpss().abs();
            if a > limits.a_max_fpss + tol {
                violations.push(ConstraintViolation {
                    step: p.step,
                    kind: ViolationKind::Acceleration,
                    value: a,
                    limit: limits.a_max_fpss,
                });
            }
        }

        violations
    }
}

/// Clamp sample velocities so that every sample keeps to the velocity limit
/// at its position and every step keeps to the acceleration limit.
///
/// Velocities are only ever lowered, by alternating a forward pass (velocity
/// and acceleration limits) with a backward pass (deceleration limit) until
/// they settle. Lowering velocities shortens the distance covered, so the
/// remainder is then crept along from rest at the end of the trajectory.
fn clamp(limits: &Limits, points: &mut Vec<TrajectoryPoint>, length_ft: f64, period_ms: u32) {
    let dt_s = limits.dt_s;
    let dv_max = limits.a_max_fpss * dt_s;

    let mut v: Vec<f64> = points.iter().map(|p| p.velocity.fps().max(0.0)).collect();
    if let Some(first) = v.first_mut() {
        *first = 0.0;
    }
    if let Some(last) = v.last_mut() {
        *last = 0.0;
    }

    for pass in 0..CLAMP_PASSES {
        let mut changed = false;

        // Forward, samples reached from the previous one
        let mut position_ft = 0.0;
        for i in 1..v.len() {
            let reach_ft = position_ft + v[i] * dt_s;
            let limit = limits
                .min_level_between(position_ft, reach_ft)
                .min(v[i - 1] + dv_max);
            let clamped = clamp_value(&v[i], &0.0, &limit);
            if clamped != v[i] {
                v[i] = clamped;
                changed = true;
            }
            position_ft += v[i] * dt_s;
        }

        // Backward, samples able to slow down in time for the next one
        for i in (1..v.len().saturating_sub(1)).rev() {
            let limit = v[i + 1] + dv_max;
            if v[i] > limit {
                v[i] = limit;
                changed = true;
            }
        }

        if !changed {
            trace!("Clamping settled after {} passes", pass + 1);
            break;
        }
    }

    let mut position_ft = 0.0;
    let mut prev_velocity_fps = 0.0;
    for (p, &v) in points.iter_mut().zip(v.iter()).skip(1) {
        position_ft += v * dt_s;
        p.position_ft = position_ft;
        p.velocity = ChassisVelocity::new(v);
        p.acceleration = ChassisAcceleration::new((v - prev_velocity_fps) / dt_s);
        prev_velocity_fps = v;
    }

    let remaining_ft = length_ft - position_ft;
    if remaining_ft <= CREEP_TOLERANCE_FT {
        return;
    }

    let creep_fps = limits.min_level_between(position_ft, length_ft);
    let creep = creep_profile(remaining_ft, creep_fps, dv_max, dt_s);
    debug!(
        "Clamped trajectory {} ft short, creeping {} samples at up to {} ft/s",
        remaining_ft,
        creep.len(),
        creep_fps
    );

    let mut step = points.len();
    for v in creep {
        position_ft += v * dt_s;
        points.push(TrajectoryPoint {
            step,
            time_s: step as f64 * dt_s,
            duration_ms: period_ms,
            position_ft,
            velocity: ChassisVelocity::new(v),
            acceleration: ChassisAcceleration::new((v - prev_velocity_fps) / dt_s),
            filter1_sum: 0.0,
            filter2_sum: 0.0,
        });
        prev_velocity_fps = v;
        step += 1;
    }
}

/// Velocities covering `distance_ft` from rest to rest, changing by no more
/// than `dv_max` per tick and never exceeding `cap_fps`.
///
/// The profile ramps up, cruises and ramps down symmetrically, and is then
/// scaled down to cover the distance exactly.
fn creep_profile(distance_ft: f64, cap_fps: f64, dv_max: f64, dt_s: f64) -> Vec<f64> {
    let mut rise: Vec<f64> = Vec::new();
    let mut rise_ft = 0.0;

    // Ramp up until the ramps alone cover the distance or the cap is reached
    while 2.0 * rise_ft < distance_ft && rise.last().map_or(true, |&top| top < cap_fps) {
        let v = ((rise.len() + 1) as f64 * dv_max).min(cap_fps);
        rise.push(v);
        rise_ft += v * dt_s;
    }

    let cruise = if 2.0 * rise_ft < distance_ft {
        ((distance_ft - 2.0 * rise_ft) / (cap_fps * dt_s)).ceil() as usize
    }
    else {
        0
    };

    let covered_ft = 2.0 * rise_ft + cruise as f64 * cap_fps * dt_s;
    let scale = (distance_ft / covered_ft).min(1.0);

    rise.iter()
        .cloned()
        .chain(std::iter::repeat(cap_fps).take(cruise))
        .chain(rise.iter().rev().cloned())
        .map(|v| v * scale)
        .chain(std::iter::once(0.0))
        .collect()
}
