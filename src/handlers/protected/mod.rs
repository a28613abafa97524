// handlers/protected/mod.rs - routes behind Gate A (verified bearer token)

pub mod donations;
pub mod fundings;
pub mod users;

pub use donations::{
    assign as donation_assign, delete as donation_delete, list as donations_list, show as donation_show,
    update as donation_update,
};
pub use fundings::list as fundings_list;
pub use users::{set_role as user_set_role, set_status as user_set_status, show as user_show};
