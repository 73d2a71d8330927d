//! Record access layer.
//!
//! Every function takes the connection explicitly. Creates validate their input first,
//! then run existence checks and the single insert inside one transaction.

pub mod appointments;
pub mod doctors;
pub mod patients;
