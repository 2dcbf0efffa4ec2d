//! Repository implementations for database operations.

pub mod budget;
pub mod content;
pub mod crew;
pub mod event;
pub mod feedback;
pub mod gallery;
pub mod notification;
pub mod poll;
pub mod reservation;
pub mod review;

pub use budget::BudgetRepository;
pub use content::ContentRepository;
pub use crew::CrewRepository;
pub use event::{EventInput, EventPatch, EventRepository};
pub use feedback::FeedbackRepository;
pub use gallery::GalleryRepository;
pub use notification::NotificationRepository;
pub use poll::{PollRepository, VoteOutcome};
pub use reservation::{
    ExpireOutcome, ExpiredHold, HoldOutcome, PaymentOutcome, ReservationRepository,
};
pub use review::ReviewRepository;
