//! List posts command handler

use crate::config::Config;
use crate::db::Store;

pub async fn cmd_list_posts(config: &Config) -> anyhow::Result<()> {
    let store = Store::new(&config.general.database_url).await?;
    let posts = store.list_posts().await?;

    if posts.is_empty() {
        println!("No posts published.");
        return Ok(());
    }

    println!("Posts ({} total)", posts.len());
    println!("{:-<70}", "");

    for post in posts {
        let comments = store.count_comments(post.id).await.unwrap_or(0);
        println!("{:>4}  {}", post.id, post.title);
        println!(
            "      {} | by {} | {} comment(s)",
            post.date, post.author_name, comments
        );
    }

    Ok(())
}
