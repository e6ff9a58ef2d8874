use serde::Deserialize;

use crate::users::repo::Gender;

/// Request body for signup.
#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub phone: String,
    pub age: i32,
    pub gender: Option<Gender>,
    pub skills: Option<Vec<String>>,
}

/// Request body for login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}
