//! Domain models for Poznej & Hraj.

pub mod admin;
pub mod budget;
pub mod content;
pub mod crew;
pub mod event;
pub mod feedback;
pub mod gallery;
pub mod notification;
pub mod payment;
pub mod poll;
pub mod reservation;
pub mod review;

pub use budget::{BudgetItem, BudgetKind, BudgetSummary};
pub use content::ContentBlock;
pub use crew::CrewMember;
pub use event::Event;
pub use feedback::Feedback;
pub use gallery::GalleryItem;
pub use notification::{NotificationKind, OutboxNotification};
pub use poll::{Poll, PollOption};
pub use reservation::{PaymentStatus, Reservation};
pub use review::{Review, ReviewStatus};
