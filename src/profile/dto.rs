use serde::Deserialize;

use crate::users::repo::Gender;

/// Partial profile update. `email` and `password` are deserialized only so
/// their presence can be rejected explicitly.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateProfileRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub age: Option<i32>,
    pub gender: Option<Gender>,
    pub skills: Option<Vec<String>>,
    pub email: Option<String>,
    pub password: Option<String>,
}

impl UpdateProfileRequest {
    /// First blocked field present in the payload, if any.
    pub fn blocked_field(&self) -> Option<&'static str> {
        if self.email.is_some() {
            Some("email")
        } else if self.password.is_some() {
            Some("password")
        } else {
            None
        }
    }
}

/// Request body for the change-password flow.
#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub old_password: String,
    pub new_password: String,
}
