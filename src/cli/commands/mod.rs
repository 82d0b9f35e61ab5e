mod posts;
mod users;

pub use posts::cmd_list_posts;
pub use users::cmd_list_users;
