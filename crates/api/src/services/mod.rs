//! Business services and external integrations.

pub mod email;
pub mod email_templates;
pub mod notifications;
pub mod payments;
pub mod reservations;
pub mod webhook_signature;

pub use email::{EmailError, EmailMessage, EmailService};
pub use notifications::{DispatchReport, NotificationDispatcher};
pub use payments::{CheckoutSessionParams, PaymentError, PaymentGateway, StripeGateway};
pub use reservations::{ReservationError, ReservationService, SweepReport};
pub use webhook_signature::SignatureError;
