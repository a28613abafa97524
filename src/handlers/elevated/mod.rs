// handlers/elevated/mod.rs - routes behind Gate A and Gate B
//
// Gate B leaves the caller's resolved `Account` in request extensions.

pub mod admin;
pub mod blogs;
pub mod donations;
pub mod users;

pub use admin::dashboard_stats;
pub use blogs::{create as blog_create, delete as blog_delete, list as blogs_list, set_status as blog_set_status};
pub use donations::set_status as donation_set_status;
pub use users::list as users_list;
