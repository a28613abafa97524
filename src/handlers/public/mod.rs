// handlers/public/mod.rs - routes reachable without a credential

pub mod blogs;
pub mod donations;
pub mod fundings;
pub mod root;
pub mod users;

pub use blogs::published_list as blogs_published; // GET /blogs/published
pub use donations::{create as donation_create, pending as donations_pending, search as donations_search};
pub use fundings::{create as funding_create, payment_intent as funding_payment_intent};
pub use root::{health, root};
pub use users::{create as user_create, role as user_role, update as user_update};
