use serde::Deserialize;
use validator::{Validate, ValidationErrors};

use crate::models::post::{Post, PostContent};

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct RegisterForm {
    #[validate(
        email(message = "Enter a valid email address"),
        length(max = 100, message = "Email must be 100 characters or less")
    )]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,

    #[validate(length(min = 1, max = 100, message = "Name is required (100 characters max)"))]
    pub name: String,
}

impl RegisterForm {
    #[must_use]
    pub fn normalized(self) -> Self {
        Self {
            email: self.email.trim().to_string(),
            name: self.name.trim().to_string(),
            ..self
        }
    }
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct LoginForm {
    #[validate(email(message = "Enter a valid email address"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct CommentForm {
    #[validate(length(min = 1, message = "Comment cannot be empty"))]
    pub comment: String,
}

impl CommentForm {
    #[must_use]
    pub fn normalized(self) -> Self {
        Self {
            comment: self.comment.trim().to_string(),
        }
    }
}

#[derive(Debug, Default, Clone, Deserialize, Validate)]
#[serde(default)]
pub struct PostForm {
    #[validate(length(min = 1, max = 250, message = "Title is required (250 characters max)"))]
    pub title: String,

    #[validate(length(
        min = 1,
        max = 250,
        message = "Subtitle is required (250 characters max)"
    ))]
    pub subtitle: String,

    #[validate(
        url(message = "Enter a valid image URL"),
        length(max = 250, message = "Image URL must be 250 characters or less")
    )]
    pub img_url: String,

    #[validate(length(min = 1, message = "Body is required"))]
    pub body: String,
}

impl PostForm {
    #[must_use]
    pub fn from_post(post: &Post) -> Self {
        Self {
            title: post.title.clone(),
            subtitle: post.subtitle.clone(),
            img_url: post.img_url.clone(),
            body: post.body.clone(),
        }
    }

    /// Trims every field so blank input fails the required checks.
    #[must_use]
    pub fn normalized(self) -> Self {
        Self {
            title: self.title.trim().to_string(),
            subtitle: self.subtitle.trim().to_string(),
            img_url: self.img_url.trim().to_string(),
            body: self.body.trim().to_string(),
        }
    }

    #[must_use]
    pub fn into_content(self) -> PostContent {
        PostContent {
            title: self.title,
            subtitle: self.subtitle,
            body: self.body,
            img_url: self.img_url,
        }
    }
}

/// Runs the form's validators and flattens failures into display messages.
pub fn check<T: Validate>(form: &T) -> Result<(), Vec<String>> {
    form.validate().map_err(|e| error_messages(&e))
}

fn error_messages(errors: &ValidationErrors) -> Vec<String> {
    let mut messages: Vec<String> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter()
                .map(|e| {
                    e.message
                        .as_ref()
                        .map_or_else(|| format!("{field} is invalid"), ToString::to_string)
                })
                .collect::<Vec<_>>()
        })
        .collect();

    // field_errors() is a HashMap
    messages.sort();
    messages.dedup();
    messages
}
