use serde::Serialize;

use crate::users::repo::{Gender, ProfileRow};

/// Safe projection of a user for lists and the feed: no id, no email, no
/// password material.
#[derive(Debug, Clone, Serialize)]
pub struct PublicProfile {
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub age: i32,
    pub gender: Option<Gender>,
    pub skills: Vec<String>,
}

impl From<ProfileRow> for PublicProfile {
    fn from(row: ProfileRow) -> Self {
        Self {
            first_name: row.first_name,
            last_name: row.last_name,
            phone: row.phone,
            age: row.age,
            gender: row.gender,
            skills: row.skills,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn projection_exposes_only_safe_fields() {
        let row = ProfileRow {
            id: Uuid::new_v4(),
            first_name: "Alan".into(),
            last_name: "Turing".into(),
            phone: "5550000000".into(),
            age: 41,
            gender: Some(Gender::Male),
            skills: vec!["ciphers".into()],
        };
        let profile = PublicProfile::from(row);
        let json = serde_json::to_value(&profile).unwrap();
        let obj = json.as_object().unwrap();
        assert_eq!(obj.len(), 6);
        for key in ["first_name", "last_name", "phone", "age", "gender", "skills"] {
            assert!(obj.contains_key(key), "missing {key}");
        }
        assert!(!obj.contains_key("id"));
        assert!(!obj.contains_key("email"));
        assert!(!obj.contains_key("password_hash"));
    }
}
