pub mod auth {

    /// The single account allowed to manage posts.
    pub const ADMIN_USER_ID: i32 = 1;

    pub const SESSION_USER_KEY: &str = "user_id";

    pub const SESSION_FLASH_KEY: &str = "_flashes";
}

pub mod posts {

    /// Publish date format, e.g. "April 01, 2024"
    pub const DATE_FORMAT: &str = "%B %d, %Y";
}

pub mod gravatar {

    pub const BASE_URL: &str = "https://www.gravatar.com/avatar";

    pub const SIZE: u32 = 100;

    pub const RATING: &str = "g";

    pub const DEFAULT_IMAGE: &str = "retro";
}

pub mod intervals {
    use std::time::Duration;

    pub const EXPIRED_SESSION_SWEEP: Duration = Duration::from_secs(60);
}
