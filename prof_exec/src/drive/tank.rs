//! Tank (differential) drive systems

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::debug;
use serde::{Deserialize, Serialize};

// Internal
use super::{DriveError, DriveParams, DriveSystem, MoveCommand, MovePlan};
use crate::{
    path::{Path, PathPoint, Point},
    traj_gen::{TrajGen, TrajGenError},
    units::{ChassisTurnRate, ChassisVelocity, MotorVelocity},
};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A drive with one motivator (wheel set or track) on each side of the
/// chassis, steered by driving the sides at different speeds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TankDrive {
    pub(crate) params: DriveParams,

    /// Distance between the left and right motivators
    ///
    /// Units: feet
    width_ft: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl TankDrive {
    /// Create a new tank drive, validating its parameters.
    pub fn new(params: DriveParams, width_ft: f64) -> Result<Self, DriveError> {
        let drive = Self { params, width_ft };
        drive.validate()?;
        Ok(drive)
    }

    /// Units: feet
    pub fn width_ft(&self) -> f64 {
        self.width_ft
    }

    /// Get the (left, right) side velocities that move the chassis centre at
    /// `velocity` while turning at `turn_rate`.
    pub fn side_velocities(
        &self,
        velocity: ChassisVelocity,
        turn_rate: ChassisTurnRate,
    ) -> (ChassisVelocity, ChassisVelocity) {
        let half_diff = 0.5 * self.width_ft * turn_rate.curvature_ft();

        (velocity * (1.0 + half_diff), velocity * (1.0 - half_diff))
    }

    /// Get the (left, right) motor velocities that move the chassis centre at
    /// `velocity` while turning at `turn_rate`.
    pub fn side_motor_velocities(
        &self,
        velocity: ChassisVelocity,
        turn_rate: ChassisTurnRate,
    ) -> (MotorVelocity, MotorVelocity) {
        let rpf = self.params.motor_rot_per_ft;
        let (left, right) = self.side_velocities(velocity, turn_rate);

        (
            MotorVelocity::from_chassis(left, rpf),
            MotorVelocity::from_chassis(right, rpf),
        )
    }

    /// Get the (outer, inner) side distance as a multiple of the centre
    /// distance for a turn.
    ///
    /// The inner ratio is negative when the turn is tighter than half the
    /// drive width, in which case the inner side drives backwards.
    fn side_ratios(&self, turn_rate: ChassisTurnRate) -> (f64, f64) {
        match turn_rate.radius_ft() {
            Some(radius_ft) => {
                let half_width = 0.5 * self.width_ft;
                (
                    (radius_ft + half_width) / radius_ft,
                    (radius_ft - half_width) / radius_ft,
                )
            }
            None => (1.0, 1.0),
        }
    }
}

impl DriveSystem for TankDrive {
    fn params(&self) -> &DriveParams {
        &self.params
    }

    fn validate(&self) -> Result<(), DriveError> {
        self.params.validate()?;

        if !(self.width_ft.is_finite() && self.width_ft > 0.0) {
            return Err(DriveError::InvalidWidth(self.width_ft));
        }

        Ok(())
    }

    /// Plan a move by generating the outer side's trajectory and scaling it
    /// down for the inner side, so that both sides finish together.
    ///
    /// The requested velocity and acceleration are those of the chassis
    /// centre. They are scaled up for the outer side and then limited to the
    /// drive's capabilities.
    fn plan_move(&self, cmd: &MoveCommand, traj_gen: &TrajGen) -> Result<MovePlan, TrajGenError> {
        cmd.validate()?;

        let direction = if cmd.distance_ft < 0.0 { -1.0 } else { 1.0 };
        let (outer_ratio, inner_ratio) = self.side_ratios(cmd.turn_rate);

        let outer_dist_ft = cmd.distance_ft.abs() * outer_ratio;
        let outer_velocity = (cmd.velocity * outer_ratio).min(self.max_velocity());
        let outer_acceleration = (cmd.acceleration * outer_ratio).min(self.max_acceleration());

        debug!(
            "Planning {} ft move at {} on {}: outer side {} ft at {}, {}",
            cmd.distance_ft,
            cmd.turn_rate,
            self.params.name,
            outer_dist_ft,
            outer_velocity,
            outer_acceleration
        );

        let path = Path::new(vec![
            PathPoint::new(Point::along(0.0), outer_velocity, outer_acceleration),
            PathPoint::new(
                Point::along(outer_dist_ft),
                ChassisVelocity::ZERO,
                outer_acceleration,
            ),
        ])?;

        let outer = traj_gen.generate(&path, self)?;
        let inner = outer.scaled(direction * inner_ratio / outer_ratio);
        let outer = if direction < 0.0 { outer.scaled(direction) } else { outer };

        // Positive turn rates turn right, putting the left side on the outside
        if cmd.turn_rate.deg_per_ft() > 0.0 {
            Ok(MovePlan {
                left: outer,
                right: inner,
            })
        }
        else {
            Ok(MovePlan {
                left: inner,
                right: outer,
            })
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::units::{ChassisAcceleration, MotorAcceleration};

    fn johnny5() -> TankDrive {
        TankDrive::new(
            DriveParams::from_motor_limits(
                "Johnny5",
                MotorVelocity::new(4250.0),
                MotorAcceleration::new(5100.0),
                8.5,
                10,
            ),
            2.75,
        )
        .unwrap()
    }

    fn cmd(distance_ft: f64, turn: f64, v: f64, a: f64) -> MoveCommand {
        MoveCommand::new(
            distance_ft,
            ChassisTurnRate::new(turn),
            ChassisVelocity::new(v),
            ChassisAcceleration::new(a),
        )
    }

    #[test]
    fn test_new_validates() {
        let params = johnny5().params;

        assert_eq!(
            TankDrive::new(params.clone(), 0.0).unwrap_err(),
            DriveError::InvalidWidth(0.0)
        );
        assert!(TankDrive::new(params, f64::NAN).is_err());
    }

    #[test]
    fn test_side_velocities() {
        let drive = johnny5();
        let v = ChassisVelocity::new(2.0);

        let (l, r) = drive.side_velocities(v, ChassisTurnRate::ZERO);
        assert_eq!(l, v);
        assert_eq!(r, v);

        // Turning right the left side is faster, and the mean is the centre
        let (l, r) = drive.side_velocities(v, ChassisTurnRate::new(10.0));
        assert!(l > r);
        assert!(((l + r).fps() / 2.0 - 2.0).abs() < 1e-12);

        let (lm, rm) = drive.side_motor_velocities(v, ChassisTurnRate::new(10.0));
        assert!((lm.to_chassis(8.5).fps() - l.fps()).abs() < 1e-9);
        assert!((rm.to_chassis(8.5).fps() - r.fps()).abs() < 1e-9);
    }

    #[test]
    fn test_straight_move() {
        let drive = johnny5();
        let plan = drive
            .plan_move(&cmd(6.0, 0.0, 3.0, 2.0), &TrajGen::default())
            .unwrap();

        assert_eq!(plan.left, plan.right);
        assert!((plan.left.distance() - 6.0).abs() < 1e-6);
        assert!(plan.left.max_velocity().fps() <= 3.0 + 1e-6);
    }

    #[test]
    fn test_turning_move() {
        let drive = johnny5();
        let turn = 5.0;
        let plan = drive
            .plan_move(&cmd(45.0, turn, 3.0, 2.0), &TrajGen::default())
            .unwrap();

        let radius = 360.0 / turn / std::f64::consts::TAU;
        let outer = 45.0 * (radius + 1.375) / radius;
        let inner = 45.0 * (radius - 1.375) / radius;

        assert_eq!(plan.left.len(), plan.right.len());
        assert!((plan.left.distance() - outer).abs() < 1e-6);
        assert!((plan.right.distance() - inner).abs() < 1e-6);

        // Both sides stay within the drive limits
        for traj in [&plan.left, &plan.right].iter() {
            assert!(traj.max_velocity() <= drive.max_velocity() + ChassisVelocity::new(1e-6));
            assert!(
                traj.max_acceleration()
                    <= drive.max_acceleration() + ChassisAcceleration::new(1e-6)
            );
        }

        // Turning left swaps the sides
        let left_turn = drive
            .plan_move(&cmd(45.0, -turn, 3.0, 2.0), &TrajGen::default())
            .unwrap();
        assert_eq!(left_turn.left.points(), plan.right.points());
        assert_eq!(left_turn.right.points(), plan.left.points());
    }

    #[test]
    fn test_tight_turn_reverses_inner_side() {
        let drive = johnny5();
        // Radius of about 0.57 ft, inside half the width
        let plan = drive
            .plan_move(&cmd(1.0, 100.0, 1.0, 1.0), &TrajGen::default())
            .unwrap();

        assert!(plan.left.distance() > 0.0);
        assert!(plan.right.distance() < 0.0);
    }

    #[test]
    fn test_reverse_move() {
        let drive = johnny5();
        let plan = drive
            .plan_move(&cmd(-2.0, 0.0, 1.0, 1.0), &TrajGen::default())
            .unwrap();

        assert!((plan.left.distance() + 2.0).abs() < 1e-6);
        assert!(plan.left.iter().all(|p| p.velocity.fps() <= 1e-9));
    }

    #[test]
    fn test_invalid_command() {
        let drive = johnny5();

        assert!(matches!(
            drive.plan_move(&cmd(1.0, 0.0, -1.0, 1.0), &TrajGen::default()),
            Err(TrajGenError::InvalidDriveSystem(DriveError::InvalidMoveCommand(_)))
        ));
    }
}
