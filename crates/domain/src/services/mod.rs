//! Domain services for Poznej & Hraj.
//!
//! Services contain business logic that operates on domain models.

pub mod reservation_policy;

pub use reservation_policy::{
    spots_after_release, HoldPolicy, ReservationState, SeatRestorePolicy, TransitionError,
};
