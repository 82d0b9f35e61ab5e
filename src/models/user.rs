use crate::constants::auth::ADMIN_USER_ID;
use crate::entities::users;

/// Account as seen by the rest of the application (the password hash never
/// leaves the repository).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: i32,
    pub email: String,
    pub name: String,
}

impl User {
    /// The blog has exactly one administrator, the first account created.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        self.id == ADMIN_USER_ID
    }
}

impl From<users::Model> for User {
    fn from(model: users::Model) -> Self {
        Self {
            id: model.id,
            email: model.email,
            name: model.name,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub name: String,
    pub password: String,
}
