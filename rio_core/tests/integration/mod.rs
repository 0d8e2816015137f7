mod calibration;
mod common;
mod config_load;
mod cycle;
mod power_sequence;
mod safety_stop;
