//! Unit conversion engine.
//!
//! Every conversion is elementwise over caller-provided slices and
//! allocation free. Mismatched lengths are a caller bug: they trip a
//! `debug_assert!` and otherwise only the shorter prefix is converted.

pub mod mapping;
pub mod velocity;

use crate::calibration::Calibration;
use crate::state::{ConvertedState, RawState};
use mapping::map_into;
use velocity::{counter_velocity, derivative_velocity, select_velocity, VelocityCounter};

// ─── Helpers ────────────────────────────────────────────────────────

/// `out = input × scale + offset`
fn affine<T: Copy + Into<f64>>(input: &[T], scales: &[f64], offsets: &[f64], out: &mut [f64]) {
    debug_assert_eq!(input.len(), out.len());
    for (((o, &x), s), b) in out.iter_mut().zip(input).zip(scales).zip(offsets) {
        let x: f64 = x.into();
        *o = x * s + b;
    }
}

/// `out = trunc(input × scale + offset)`, saturating at the `i32` range.
fn affine_to_bits(input: &[f64], scales: &[f64], offsets: &[f64], out: &mut [i32]) {
    debug_assert_eq!(input.len(), out.len());
    for (((o, x), s), b) in out.iter_mut().zip(input).zip(scales).zip(offsets) {
        *o = (x * s + b) as i32;
    }
}

// ─── Calibration conversions ────────────────────────────────────────

impl Calibration {
    pub fn encoder_bits_to_position(&self, bits: &[i32], positions: &mut [f64]) {
        let e = self.encoder();
        affine(bits, &e.bits_to_position_scales, &e.bits_to_position_offsets, positions);
    }

    /// Inverse of [`Self::encoder_bits_to_position`], rounded to the nearest count.
    pub fn encoder_position_to_bits(&self, positions: &[f64], bits: &mut [i32]) {
        debug_assert_eq!(positions.len(), bits.len());
        let e = self.encoder();
        for (((b, p), s), o) in bits
            .iter_mut()
            .zip(positions)
            .zip(&e.bits_to_position_scales)
            .zip(&e.bits_to_position_offsets)
        {
            *b = ((p - o) / s).round() as i32;
        }
    }

    pub fn encoder_bits_to_dposition(&self, bits: &[i32], dpositions: &mut [f64]) {
        let e = self.encoder();
        affine(bits, &e.bits_to_dposition_scales, &e.bits_to_dposition_offsets, dpositions);
    }

    pub fn encoder_bits_to_dtime(&self, bits: &[i32], dtimes: &mut [f64]) {
        let e = self.encoder();
        affine(bits, &e.bits_to_dtime_scales, &e.bits_to_dtime_offsets, dtimes);
    }

    /// Counter-based velocity for every actuator.
    pub fn encoder_bits_to_velocity(
        &self,
        latched: &[u32],
        now: &[u32],
        counter: VelocityCounter,
        velocities: &mut [f64],
    ) {
        debug_assert_eq!(latched.len(), velocities.len());
        debug_assert_eq!(now.len(), velocities.len());
        for (((v, &l), &n), &scale) in velocities
            .iter_mut()
            .zip(latched)
            .zip(now)
            .zip(&self.encoder().bits_to_dposition_scales)
        {
            *v = counter_velocity(l, n, counter, scale);
        }
    }

    /// `current = effort × scale`
    pub fn actuator_effort_to_current(&self, efforts: &[f64], currents: &mut [f64]) {
        debug_assert_eq!(efforts.len(), currents.len());
        for ((c, e), s) in currents
            .iter_mut()
            .zip(efforts)
            .zip(&self.actuator_drive().effort_to_current_scales)
        {
            *c = e * s;
        }
    }

    /// `effort = current / scale`, the inverse of
    /// [`Self::actuator_effort_to_current`] up to one rounding (exact for
    /// power-of-two scales). A zero scale yields zero effort.
    pub fn actuator_current_to_effort(&self, currents: &[f64], efforts: &mut [f64]) {
        debug_assert_eq!(efforts.len(), currents.len());
        for ((e, c), &s) in efforts
            .iter_mut()
            .zip(currents)
            .zip(&self.actuator_drive().effort_to_current_scales)
        {
            *e = if s == 0.0 { 0.0 } else { c / s };
        }
    }

    pub fn actuator_current_to_bits(&self, currents: &[f64], bits: &mut [i32]) {
        let d = self.actuator_drive();
        affine_to_bits(currents, &d.current_to_bits_scales, &d.current_to_bits_offsets, bits);
    }

    pub fn actuator_bits_to_current(&self, bits: &[i32], currents: &mut [f64]) {
        let d = self.actuator_drive();
        affine(bits, &d.bits_to_current_scales, &d.bits_to_current_offsets, currents);
    }

    pub fn brake_current_to_bits(&self, currents: &[f64], bits: &mut [i32]) {
        let d = self.brake_drive();
        affine_to_bits(currents, &d.current_to_bits_scales, &d.current_to_bits_offsets, bits);
    }

    pub fn brake_bits_to_current(&self, bits: &[i32], currents: &mut [f64]) {
        let d = self.brake_drive();
        affine(bits, &d.bits_to_current_scales, &d.bits_to_current_offsets, currents);
    }

    pub fn pot_bits_to_voltage(&self, bits: &[i32], voltages: &mut [f64]) {
        let p = self.pot();
        affine(bits, &p.bits_to_voltage_scales, &p.bits_to_voltage_offsets, voltages);
    }

    pub fn pot_voltage_to_position(&self, voltages: &[f64], positions: &mut [f64]) {
        let p = self.pot();
        affine(voltages, &p.voltage_to_position_scales, &p.voltage_to_position_offsets, positions);
    }
}

// ─── Cycle conversion ───────────────────────────────────────────────

/// Derive every converted quantity from the raw buffers.
///
/// `out.encoder_position.previous` is read, not written: it holds the
/// position latched by the last interlock check.
pub fn convert_state(cal: &Calibration, raw: &RawState, counter: VelocityCounter, out: &mut ConvertedState) {
    let a = &raw.actuators;
    let mapping = cal.mapping();

    cal.encoder_bits_to_position(&a.encoder_position_bits, &mut out.encoder_position.current);
    map_into(
        &mapping.actuator_to_joint_position,
        &out.encoder_position.current,
        &mut out.joint_position,
    );

    cal.encoder_bits_to_velocity(
        &a.encoder_velocity_latched,
        &a.encoder_velocity_now,
        counter,
        &mut out.encoder_velocity_counter,
    );
    let positions = &out.encoder_position;
    for (((d, p), prev), dt) in out
        .encoder_velocity_derivative
        .iter_mut()
        .zip(&positions.current)
        .zip(&positions.previous)
        .zip(&a.timestamp_s)
    {
        *d = derivative_velocity(*p, *prev, *dt);
    }
    for (i, v) in out.encoder_velocity.iter_mut().enumerate() {
        *v = select_velocity(
            a.encoder_velocity_latched[i],
            a.encoder_velocity_now[i],
            out.encoder_velocity_counter[i],
            out.encoder_velocity_derivative[i],
        );
    }
    // joint velocity reuses the position map
    map_into(
        &mapping.actuator_to_joint_position,
        &out.encoder_velocity,
        &mut out.joint_velocity,
    );

    cal.actuator_bits_to_current(&a.current_bits, &mut out.actuator_current_feedback);
    cal.actuator_current_to_effort(&out.actuator_current_feedback, &mut out.actuator_effort_feedback);
    cal.brake_bits_to_current(&raw.brakes.current_bits, &mut out.brake_current_feedback);

    cal.pot_bits_to_voltage(&a.pot_bits, &mut out.pot_voltage);
    cal.pot_voltage_to_position(&out.pot_voltage, &mut out.pot_position);
}
