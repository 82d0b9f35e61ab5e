pub mod auth_service;
pub use auth_service::{AuthError, AuthService};

pub mod auth_service_impl;
pub use auth_service_impl::SeaOrmAuthService;

pub mod blog_service;
pub use blog_service::{BlogError, BlogService, PostThread};

pub mod blog_service_impl;
pub use blog_service_impl::SeaOrmBlogService;
