//! List users command handler

use crate::config::Config;
use crate::db::Store;

pub async fn cmd_list_users(config: &Config) -> anyhow::Result<()> {
    let store = Store::new(&config.general.database_url).await?;
    let users = store.list_users().await?;

    if users.is_empty() {
        println!("No accounts yet. The first account to register becomes the admin.");
        return Ok(());
    }

    println!("Users ({} total)", users.len());
    println!("{:-<70}", "");

    for user in users {
        let role = if user.is_admin() { " [admin]" } else { "" };
        println!("{:>4}  {} <{}>{}", user.id, user.name, user.email, role);
    }

    Ok(())
}
