//! # Generated trajectories
//!
//! A [`Trajectory`] is the output of the generator: one [`TrajectoryPoint`] per
//! control tick, starting with the chassis at rest, plus the [`Diagnostics`]
//! gathered while it was generated. Trajectories are immutable once built.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::Serialize;
use std::io::Write;

// Internal
use crate::units::{
    ChassisAcceleration, ChassisVelocity, MotorAcceleration, MotorPosition, MotorVelocity,
};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A single sample of a trajectory.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct TrajectoryPoint {
    /// Index of the control tick this sample is for
    pub step: usize,

    /// Units: seconds
    pub time_s: f64,

    /// Time the sample is held for
    ///
    /// Units: milliseconds
    pub duration_ms: u32,

    /// Distance travelled along the path
    ///
    /// Units: feet
    pub position_ft: f64,

    #[serde(rename = "velocity_fps")]
    pub velocity: ChassisVelocity,

    #[serde(rename = "acceleration_fpss")]
    pub acceleration: ChassisAcceleration,

    /// Sum held by the acceleration filter after this tick
    pub filter1_sum: f64,

    /// Sum held by the jerk filter after this tick
    pub filter2_sum: f64,
}

/// Information about how a trajectory was generated.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Diagnostics {
    /// Window length of the acceleration filter, in ticks
    pub fl1_count: usize,

    /// Window length of the jerk filter, in ticks
    pub fl2_count: usize,

    /// Number of samples in the trajectory
    pub n_count: usize,

    /// Time at which the unsmoothed profile first reaches its peak velocity
    ///
    /// Units: milliseconds
    pub t1_ms: u64,

    /// Time at which the unsmoothed profile last leaves its peak velocity
    ///
    /// Units: milliseconds
    pub t2_ms: u64,

    /// Time at which the unsmoothed profile finally returns to rest
    ///
    /// Units: milliseconds
    pub t4_ms: u64,

    /// Wall clock time taken to generate the trajectory
    ///
    /// Units: milliseconds
    pub itp_ms: f64,

    /// Number of times generation was repeated with wider margins
    pub retries: usize,

    /// Limit violations which remained after all retries, and which were
    /// clamped in the output
    pub violations: Vec<ConstraintViolation>,
}

/// A limit broken by a generated sample.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ConstraintViolation {
    pub step: usize,
    pub kind: ViolationKind,

    /// The value generated before clamping
    pub value: f64,

    /// The limit that applied at the sample
    pub limit: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum ViolationKind {
    Velocity,
    Acceleration,
}

/// A time-indexed sequence of samples along a path.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Trajectory {
    points: Vec<TrajectoryPoint>,
    diagnostics: Diagnostics,

    /// Units: milliseconds
    period_ms: u32,
}

/// Summary of a trajectory for archiving.
#[derive(Clone, Debug, Serialize)]
pub struct TrajectorySummary {
    pub period_ms: u32,
    pub distance_ft: f64,
    pub duration_s: f64,
    pub max_velocity_fps: f64,
    pub max_acceleration_fpss: f64,
    pub diagnostics: Diagnostics,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl TrajectoryPoint {
    /// A sample with the chassis at rest at the given position.
    pub(crate) fn rest(step: usize, period_ms: u32, position_ft: f64) -> Self {
        Self {
            step,
            time_s: step as f64 * period_ms as f64 / 1000.0,
            duration_ms: period_ms,
            position_ft,
            velocity: ChassisVelocity::ZERO,
            acceleration: ChassisAcceleration::ZERO,
            filter1_sum: 0.0,
            filter2_sum: 0.0,
        }
    }

    /// Position of a motor driving this sample.
    pub fn motor_position(&self, rot_per_ft: f64) -> MotorPosition {
        MotorPosition::from_distance_ft(self.position_ft, rot_per_ft)
    }

    /// Velocity of a motor driving this sample.
    pub fn motor_velocity(&self, rot_per_ft: f64) -> MotorVelocity {
        MotorVelocity::from_chassis(self.velocity, rot_per_ft)
    }

    /// Acceleration of a motor driving this sample.
    pub fn motor_acceleration(&self, rot_per_ft: f64) -> MotorAcceleration {
        MotorAcceleration::from_chassis(self.acceleration, rot_per_ft)
    }
}

impl Diagnostics {
    /// Compute the phase timings of the unsmoothed (acceleration filter)
    /// profile, where `filter1_out[i]` is the filter output at tick `i + 1`.
    pub(crate) fn set_phase_times(&mut self, filter1_out: &[f64], period_ms: u32) {
        let peak = filter1_out.iter().cloned().fold(0f64, f64::max);
        if peak <= 0.0 {
            return;
        }

        let at_peak = |v: &f64| *v >= peak * (1.0 - 1e-9);
        let to_ms = |idx: usize| (idx as u64 + 1) * period_ms as u64;

        if let Some(i) = filter1_out.iter().position(at_peak) {
            self.t1_ms = to_ms(i);
        }
        if let Some(i) = filter1_out.iter().rposition(at_peak) {
            self.t2_ms = to_ms(i);
        }
        if let Some(i) = filter1_out.iter().rposition(|v| *v != 0.0) {
            self.t4_ms = to_ms(i + 1);
        }
    }
}

impl Trajectory {
    pub(crate) fn new(points: Vec<TrajectoryPoint>, diagnostics: Diagnostics, period_ms: u32) -> Self {
        Self {
            points,
            diagnostics,
            period_ms,
        }
    }

    /// Number of samples in the trajectory.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&TrajectoryPoint> {
        self.points.get(index)
    }

    pub fn points(&self) -> &[TrajectoryPoint] {
        &self.points
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TrajectoryPoint> {
        self.points.iter()
    }

    pub fn first(&self) -> Option<&TrajectoryPoint> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&TrajectoryPoint> {
        self.points.last()
    }

    /// The time between samples.
    ///
    /// Units: milliseconds
    pub fn period_ms(&self) -> u32 {
        self.period_ms
    }

    /// Largest velocity magnitude reached over the trajectory.
    pub fn max_velocity(&self) -> ChassisVelocity {
        self.points
            .iter()
            .map(|p| p.velocity.abs())
            .fold(ChassisVelocity::ZERO, ChassisVelocity::max)
    }

    /// Largest acceleration magnitude reached over the trajectory.
    pub fn max_acceleration(&self) -> ChassisAcceleration {
        self.points
            .iter()
            .map(|p| p.acceleration.abs())
            .fold(ChassisAcceleration::ZERO, ChassisAcceleration::max)
    }

    /// Distance covered by the trajectory.
    ///
    /// Units: feet
    pub fn distance(&self) -> f64 {
        self.last().map(|p| p.position_ft).unwrap_or(0.0)
    }

    /// Time of the final sample.
    ///
    /// Units: seconds
    pub fn duration_s(&self) -> f64 {
        self.last().map(|p| p.time_s).unwrap_or(0.0)
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// True if some samples had to be clamped to meet the path limits.
    pub fn is_degraded(&self) -> bool {
        !self.diagnostics.violations.is_empty()
    }

    /// Get a copy of the trajectory with every distance scaled by `factor`.
    ///
    /// Timing is kept, so the scaled trajectory stays in step with this one. A
    /// negative factor gives a trajectory driven backwards.
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            points: self
                .points
                .iter()
                .map(|p| TrajectoryPoint {
                    position_ft: p.position_ft * factor,
                    velocity: p.velocity * factor,
                    acceleration: p.acceleration * factor,
                    filter1_sum: p.filter1_sum * factor,
                    filter2_sum: p.filter2_sum * factor,
                    ..*p
                })
                .collect(),
            diagnostics: self.diagnostics.clone(),
            period_ms: self.period_ms,
        }
    }

    /// Write the trajectory as CSV, one row per sample, with a header row.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<(), csv::Error> {
        let mut wtr = csv::Writer::from_writer(writer);

        for point in &self.points {
            wtr.serialize(point)?;
        }

        wtr.flush()?;

        Ok(())
    }

    /// Summarise the trajectory and its diagnostics.
    pub fn summary(&self) -> TrajectorySummary {
        TrajectorySummary {
            period_ms: self.period_ms,
            distance_ft: self.distance(),
            duration_s: self.duration_s(),
            max_velocity_fps: self.max_velocity().fps(),
            max_acceleration_fpss: self.max_acceleration().fpss(),
            diagnostics: self.diagnostics.clone(),
        }
    }
}

impl<'t> IntoIterator for &'t Trajectory {
    type Item = &'t TrajectoryPoint;
    type IntoIter = std::slice::Iter<'t, TrajectoryPoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn ramp() -> Trajectory {
        let mut points = vec![TrajectoryPoint::rest(0, 100, 0.0)];
        let mut pos = 0.0;
        for (i, v) in [1.0, 2.0, 1.0, 0.0].iter().enumerate() {
            pos += v * 0.1;
            points.push(TrajectoryPoint {
                step: i + 1,
                time_s: (i + 1) as f64 * 0.1,
                duration_ms: 100,
                position_ft: pos,
                velocity: ChassisVelocity::new(*v),
                acceleration: ChassisAcceleration::new(10.0),
                filter1_sum: 0.0,
                filter2_sum: 0.0,
            });
        }

        Trajectory::new(points, Diagnostics::default(), 100)
    }

    #[test]
    fn test_accessors() {
        let traj = ramp();

        assert_eq!(traj.len(), 5);
        assert_eq!(traj.first().unwrap().step, 0);
        assert_eq!(traj.max_velocity().fps(), 2.0);
        assert!((traj.distance() - 0.4).abs() < 1e-12);
        assert!((traj.duration_s() - 0.4).abs() < 1e-12);
        assert!(!traj.is_degraded());
        assert_eq!(traj.iter().count(), (&traj).into_iter().count());
    }

    #[test]
    fn test_scaled() {
        let traj = ramp();
        let back = traj.scaled(-0.5);

        assert_eq!(back.len(), traj.len());
        assert_eq!(back.get(2).unwrap().velocity.fps(), -1.0);
        assert_eq!(back.get(2).unwrap().time_s, traj.get(2).unwrap().time_s);
        assert!((back.distance() + 0.2).abs() < 1e-12);
        assert_eq!(back.max_velocity().fps(), 1.0);
    }

    #[test]
    fn test_phase_times() {
        let mut diag = Diagnostics::default();
        diag.set_phase_times(&[0.5, 1.0, 1.0, 0.5, 0.0, 0.0], 10);

        assert_eq!(diag.t1_ms, 20);
        assert_eq!(diag.t2_ms, 30);
        assert_eq!(diag.t4_ms, 50);
    }

    #[test]
    fn test_write_csv() {
        let mut buf = Vec::new();
        ramp().write_csv(&mut buf).unwrap();

        let text = String::from_utf8(buf).unwrap();
        let mut lines = text.lines();

        assert_eq!(
            lines.next().unwrap(),
            "step,time_s,duration_ms,position_ft,velocity_fps,acceleration_fpss,filter1_sum,filter2_sum"
        );
        assert_eq!(lines.count(), 5);
    }

    #[test]
    fn test_motor_views() {
        let traj = ramp();
        let p = traj.get(2).unwrap();

        assert_eq!(p.motor_velocity(10.0).rpm(), 1200.0);
        assert!((p.motor_position(10.0).rot() - 3.0).abs() < 1e-12);
    }
}
