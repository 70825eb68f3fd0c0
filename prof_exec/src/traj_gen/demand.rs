//! # Velocity limits and demand construction
//!
//! The generator does not filter the path limits directly. Instead it builds a
//! rectangular *demand*: one velocity per control tick, chosen by walking
//! along the path at the demanded velocity. The demand is the cruise velocity
//! the chassis should be heading for, and the filters turn it into the
//! smooth trapezoid that is actually output.
//!
//! The filters delay the output with respect to the demand by up to one
//! combined window (`M = FL1 + FL2 - 1` ticks). To keep the output within a
//! segment's limit while it is on that segment the demand must already be at
//! that limit when it is `M` ticks of travel before the segment starts, and
//! must stay there until it is `M` ticks of travel past the segment's end. This
//! extended stretch is the segment's *influence interval*, and the demand at
//! any position is the lowest limit of all influence intervals it touches.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::trace;
use std::ops::Range;

// Internal
use crate::{drive::DriveSystem, path::Path};

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Distance below which the end of a sub-move is considered reached.
///
/// Units: feet
const END_TOLERANCE_FT: f64 = 1e-9;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// The velocity limit over one path segment.
#[derive(Clone, Copy, Debug)]
pub(crate) struct SegmentLimit {
    /// Units: feet
    pub start_ft: f64,

    /// Units: feet
    pub end_ft: f64,

    /// The lower of the drive's and the segment start point's velocity limit
    ///
    /// Units: feet/second
    pub level_fps: f64,
}

/// All limits that apply while generating a trajectory along one path.
#[derive(Clone, Debug)]
pub(crate) struct Limits {
    /// Every segment of the path, including stops, in order
    segments: Vec<SegmentLimit>,

    /// Index ranges into `segments` for each sub-move (motion between stops)
    sub_moves: Vec<Range<usize>>,

    /// The highest segment level of the path
    ///
    /// Units: feet/second
    pub v_top_fps: f64,

    /// The acceleration limit applied over the whole trajectory
    ///
    /// Units: feet/second^2
    pub a_max_fpss: f64,

    /// Units: seconds
    pub dt_s: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Limits {
    /// Collect the limits of a (validated) path driven by a (validated) drive.
    pub fn new<D: DriveSystem + ?Sized>(path: &Path, drive: &D) -> Self {
        let drive_v = drive.max_velocity().fps();
        let mut a_max_fpss = drive.max_acceleration().fpss();

        let mut segments = Vec::with_capacity(path.len().saturating_sub(1));
        let mut sub_moves = Vec::new();
        let mut sub_start: Option<usize> = None;
        let mut v_top_fps = 0f64;

        for seg in path.segments() {
            let level_fps = drive_v.min(seg.start.max_velocity.fps());
            a_max_fpss = a_max_fpss.min(seg.start.max_acceleration.fpss());

            // A stop ends any current sub-move
            if seg.is_stop() {
                if let Some(s) = sub_start.take() {
                    sub_moves.push(s..seg.index);
                }
            }
            else {
                v_top_fps = v_top_fps.max(level_fps);
                if sub_start.is_none() {
                    sub_start = Some(seg.index);
                }
            }

            segments.push(SegmentLimit {
                start_ft: seg.start_dist_ft,
                end_ft: seg.end_dist_ft(),
                level_fps,
            });
        }

        if let Some(s) = sub_start {
            sub_moves.push(s..segments.len());
        }

        trace!(
            "{} segments in {} sub-moves, top level {} ft/s",
            segments.len(),
            sub_moves.len(),
            v_top_fps
        );

        Self {
            segments,
            sub_moves,
            v_top_fps,
            a_max_fpss,
            dt_s: drive.trajectory_iteration_period_ms() as f64 / 1000.0,
        }
    }

    /// Iterate over the segments of each sub-move.
    pub fn sub_moves(&self) -> impl Iterator<Item = &[SegmentLimit]> + '_ {
        self.sub_moves
            .iter()
            .map(move |r| &self.segments[r.clone()])
    }

    /// An upper bound on the number of demand ticks needed to cover every
    /// sub-move.
    ///
    /// Every tick but the last of a sub-move advances by at least the lowest
    /// level of that sub-move.
    pub fn demand_ticks_bound(&self) -> f64 {
        self.sub_moves()
            .map(|segs| {
                let (start_ft, end_ft) = match (segs.first(), segs.last()) {
                    (Some(first), Some(last)) => (first.start_ft, last.end_ft),
                    _ => return 0.0,
                };
                let min_level = segs
                    .iter()
                    .map(|s| s.level_fps)
                    .fold(f64::INFINITY, f64::min);

                (end_ft - start_ft) / (min_level * self.dt_s) + 1.0
            })
            .sum()
    }

    /// The velocity limit at a position along the path.
    ///
    /// The limit is that of the segment containing the position. A position
    /// exactly on a path point belongs to the segment starting there, and
    /// positions past the end of the path belong to the last segment.
    pub fn level_at(&self, position_ft: f64) -> f64 {
        self.min_level_between(position_ft, position_ft)
    }

    /// The lowest velocity limit of any position in `[from_ft, to_ft]`.
    pub fn min_level_between(&self, from_ft: f64, to_ft: f64) -> f64 {
        let first = self.segment_index(from_ft.min(to_ft));
        let last = self.segment_index(from_ft.max(to_ft));

        match self.segments.get(first..=last) {
            Some(segs) if !segs.is_empty() => segs
                .iter()
                .map(|s| s.level_fps)
                .fold(f64::INFINITY, f64::min),
            _ => self.v_top_fps,
        }
    }

    fn segment_index(&self, position_ft: f64) -> usize {
        self.segments
            .partition_point(|s| s.start_ft <= position_ft)
            .saturating_sub(1)
    }
}

/// Build the demand for one sub-move.
///
/// `margin_ticks` is the filter delay the influence intervals are extended by.
/// The last demand is fractional so that the demand integrates exactly to the
/// length of the sub-move.
pub(crate) fn build_demand(
    sub_move: &[SegmentLimit],
    v_top_fps: f64,
    dt_s: f64,
    margin_ticks: usize,
) -> Vec<f64> {
    let (start_ft, end_ft) = match (sub_move.first(), sub_move.last()) {
        (Some(first), Some(last)) => (first.start_ft, last.end_ft),
        _ => return Vec::new(),
    };

    // Distance one tick of demand can cover at most
    let tick_reach_ft = v_top_fps * dt_s;
    let margin_s = margin_ticks as f64 * dt_s;

    let mut demand = Vec::new();
    let mut s = start_ft;

    loop {
        let remaining_ft = end_ft - s;
        if remaining_ft <= END_TOLERANCE_FT {
            break;
        }

        let mut level_fps = sub_move
            .iter()
            .filter(|seg| {
                let margin_ft = seg.level_fps * margin_s;
                seg.start_ft - margin_ft <= s + tick_reach_ft && seg.end_ft + margin_ft >= s
            })
            .map(|seg| seg.level_fps)
            .fold(f64::INFINITY, f64::min);

        if !level_fps.is_finite() {
            level_fps = v_top_fps;
        }

        let step_ft = level_fps * dt_s;
        if remaining_ft <= step_ft + END_TOLERANCE_FT {
            demand.push(remaining_ft / dt_s);
            break;
        }

        demand.push(level_fps);
        s += step_ft;
    }

    demand
}

#[cfg(test)]
mod test {
    use super::*;

    fn seg(start_ft: f64, end_ft: f64, level_fps: f64) -> SegmentLimit {
        SegmentLimit {
            start_ft,
            end_ft,
            level_fps,
        }
    }

    #[test]
    fn test_demand_covers_length() {
        let segs = [seg(0.0, 10.0, 5.0)];
        let demand = build_demand(&segs, 5.0, 0.02, 10);

        assert_eq!(demand.len(), 100);
        assert!(demand.iter().all(|&d| (d - 5.0).abs() < 1e-9));

        let total: f64 = demand.iter().map(|d| d * 0.02).sum();
        assert!((total - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_fractional_last_tick() {
        let segs = [seg(0.0, 1.05, 1.0)];
        let demand = build_demand(&segs, 1.0, 0.1, 0);

        assert_eq!(demand.len(), 11);
        assert!((demand[10] - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_slow_segment_is_demanded_early() {
        // Slow segment from 5 ft, margin of 10 ticks at 1 ft/s is 1 ft
        let segs = [seg(0.0, 5.0, 4.0), seg(5.0, 8.0, 1.0), seg(8.0, 20.0, 4.0)];
        let dt = 0.1;
        let demand = build_demand(&segs, 4.0, dt, 10);

        // Walk the demand and find where it is slow
        let mut s = 0.0;
        for d in &demand {
            // Anywhere the demand could put the output onto the slow segment
            // it must already be slow
            if s + 4.0 * dt >= 4.0 && s <= 9.0 {
                assert!(*d <= 1.0 + 1e-9, "demand {} at {} ft", d, s);
            }
            // Well clear of the slow segment the demand is fast, apart from
            // the fractional last tick
            let clear = s + 4.0 * dt < 4.0 - 1e-9 || s > 9.0 + 4.0 * dt;
            if clear && s + 4.0 * dt < 20.0 - 1e-9 {
                assert!(*d > 1.0, "demand {} at {} ft", d, s);
            }
            s += d * dt;
        }
        assert!((s - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_limit_lookup() {
        use crate::{
            drive::{DriveParams, TankDrive},
            path::test::straight_path,
            units::{ChassisAcceleration, ChassisVelocity},
        };

        let path = straight_path(&[(0.0, 4.0), (5.0, 1.0), (8.0, 3.0), (20.0, 3.0)], 2.0);
        let drive = TankDrive::new(
            DriveParams {
                name: String::from("test"),
                max_velocity: ChassisVelocity::new(3.5),
                max_acceleration: ChassisAcceleration::new(5.0),
                motor_rot_per_ft: 10.0,
                iteration_period_ms: 100,
            },
            1.0,
        )
        .unwrap();
        let limits = Limits::new(&path, &drive);

        assert_eq!(limits.v_top_fps, 3.5);
        assert_eq!(limits.a_max_fpss, 2.0);

        // Waypoints belong to the segment starting there
        assert_eq!(limits.level_at(4.99), 3.5);
        assert_eq!(limits.level_at(5.0), 1.0);
        assert_eq!(limits.level_at(8.0), 3.0);
        assert_eq!(limits.level_at(25.0), 3.0);

        assert_eq!(limits.min_level_between(0.0, 4.0), 3.5);
        assert_eq!(limits.min_level_between(4.0, 9.0), 1.0);
        assert_eq!(limits.min_level_between(9.0, 4.0), 1.0);

        // 20 ft at no less than 1 ft/s in 0.1 s ticks
        assert!((limits.demand_ticks_bound() - 201.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_sub_move() {
        assert!(build_demand(&[], 1.0, 0.01, 3).is_empty());
    }
}
