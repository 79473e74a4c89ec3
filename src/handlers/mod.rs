mod health;
mod relay;
mod users;

pub use health::{health_check, home, not_found};
pub use relay::{relay, relay_with_config};
pub use users::{create_user, delete_user, get_user, list_users, update_user};
