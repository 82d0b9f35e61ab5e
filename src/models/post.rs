use crate::entities::{blog_posts, comments, users};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    pub id: i32,
    pub title: String,
    pub subtitle: String,
    pub date: String,
    pub body: String,
    pub img_url: String,
    pub author_id: i32,
    pub author_name: String,
}

impl Post {
    pub(crate) fn from_models(post: blog_posts::Model, author: Option<users::Model>) -> Self {
        Self {
            id: post.id,
            title: post.title,
            subtitle: post.subtitle,
            date: post.date,
            body: post.body,
            img_url: post.img_url,
            author_id: post.author_id,
            author_name: author.map(|a| a.name).unwrap_or_default(),
        }
    }
}

/// Editable fields of a post. Date and author are stamped by the service.
#[derive(Debug, Clone, Default)]
pub struct PostContent {
    pub title: String,
    pub subtitle: String,
    pub body: String,
    pub img_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub id: i32,
    pub text: String,
    pub post_id: i32,
    pub author_id: i32,
    pub author_name: String,
    pub author_email: String,
}

impl Comment {
    pub(crate) fn from_models(comment: comments::Model, author: Option<users::Model>) -> Self {
        let (author_name, author_email) = author.map(|a| (a.name, a.email)).unwrap_or_default();

        Self {
            id: comment.id,
            text: comment.text,
            post_id: comment.post_id,
            author_id: comment.author_id,
            author_name,
            author_email,
        }
    }
}
