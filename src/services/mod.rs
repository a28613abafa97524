pub mod payments;
pub mod transitions;

pub use payments::{PaymentError, PaymentGateway, PaymentIntent, StripeGateway};
pub use transitions::{DonationLifecycle, Permissive, StatusTransitionPolicy, TransitionError};
