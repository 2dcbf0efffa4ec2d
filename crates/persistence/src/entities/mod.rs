//! Database entity definitions.
//!
//! Entities are direct mappings to database rows.

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

pub use budget::{BudgetItemEntity, BudgetKindDb};
pub use content::ContentBlockEntity;
pub use crew::CrewMemberEntity;
pub use event::EventEntity;
pub use feedback::FeedbackEntity;
pub use gallery::GalleryItemEntity;
pub use notification::{NotificationEntity, NotificationKindDb, NotificationStatusDb};
pub use poll::{PollEntity, PollOptionEntity};
pub use reservation::{PaymentStatusDb, ReservationEntity, StaleHoldEntity};
pub use review::{ReviewEntity, ReviewStatusDb};
