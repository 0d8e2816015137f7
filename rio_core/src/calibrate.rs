//! Potentiometer-based encoder offset calibration.

use rio_common::robot::config::PotLocation;
use tracing::{info, warn};

use crate::calibration::JointMapping;
use crate::convert::mapping::map;
use crate::robot::Robot;

/// Actuator-space amount to subtract from the encoder position offsets so
/// that encoder positions match the potentiometers.
///
/// Pots on joints: the joint-space error is mapped back through the
/// joint→actuator position matrix. Pots on actuators: the error is used
/// directly. `None` when the pot location is undefined.
pub fn offset_correction(
    location: PotLocation,
    mapping: &JointMapping,
    encoder_position: &[f64],
    pot_position: &[f64],
) -> Option<Vec<f64>> {
    match location {
        PotLocation::Undefined => None,
        PotLocation::Joints => {
            let mut joint_error = map(&mapping.actuator_to_joint_position, encoder_position);
            for (e, pot) in joint_error.iter_mut().zip(pot_position) {
                *e -= pot;
            }
            Some(map(&mapping.joint_to_actuator_position, &joint_error))
        }
        PotLocation::Actuators => Some(
            encoder_position
                .iter()
                .zip(pot_position)
                .map(|(enc, pot)| enc - pot)
                .collect(),
        ),
    }
}

impl Robot {
    /// Move the encoder position offsets so that the last converted encoder
    /// positions agree with the potentiometer positions.
    ///
    /// Returns `false`, changing nothing, when the pot location is undefined.
    /// Takes effect from the next [`Robot::convert_state`].
    pub fn calibrate_encoder_offsets_from_pots(&mut self) -> bool {
        let location = self.calibration.pot_location();
        let Some(correction) = offset_correction(
            location,
            self.calibration.mapping(),
            &self.converted.encoder_position.current,
            &self.converted.pot_position,
        ) else {
            warn!(robot = %self.config.name, "potentiometer location undefined, encoder offsets unchanged");
            return false;
        };
        self.calibration.shift_position_offsets(&correction);
        info!(robot = %self.config.name, ?location, ?correction, "encoder offsets calibrated from pots");
        true
    }
}
