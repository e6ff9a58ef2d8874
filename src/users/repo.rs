use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
pub enum Gender {
    Male,
    Female,
    Other,
}

/// User record in the database.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub phone: String,
    pub age: i32,
    pub gender: Option<Gender>,
    pub skills: Vec<String>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
    pub phone: String,
    pub age: i32,
    pub gender: Option<Gender>,
    pub skills: Vec<String>,
}

/// Partial profile update; `None` keeps the stored value.
#[derive(Debug, Default)]
pub struct ProfileChanges {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub age: Option<i32>,
    pub gender: Option<Gender>,
    pub skills: Option<Vec<String>>,
}

/// Safe projection row: the subset of user columns exposed in lists and the
/// feed. Password and email never travel through this type.
#[derive(Debug, Clone, FromRow)]
pub struct ProfileRow {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub age: i32,
    pub gender: Option<Gender>,
    pub skills: Vec<String>,
}

const USER_COLUMNS: &str = "id, first_name, last_name, email, password_hash, phone, age, gender, skills, created_at, updated_at";
const PROFILE_COLUMNS: &str = "id, first_name, last_name, phone, age, gender, skills";

impl User {
    pub async fn find_by_email(db: &PgPool, email: &str) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    pub async fn find_by_id(db: &PgPool, id: Uuid) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    pub async fn create(db: &PgPool, new: &NewUser) -> anyhow::Result<User> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (first_name, last_name, email, password_hash, phone, age, gender, skills)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(&new.first_name)
        .bind(&new.last_name)
        .bind(&new.email)
        .bind(&new.password_hash)
        .bind(&new.phone)
        .bind(new.age)
        .bind(new.gender)
        .bind(&new.skills)
        .fetch_one(db)
        .await?;
        Ok(user)
    }

    pub async fn update_profile(
        db: &PgPool,
        id: Uuid,
        changes: &ProfileChanges,
    ) -> anyhow::Result<User> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users SET
                first_name = COALESCE($2, first_name),
                last_name = COALESCE($3, last_name),
                phone = COALESCE($4, phone),
                age = COALESCE($5, age),
                gender = COALESCE($6, gender),
                skills = COALESCE($7, skills),
                updated_at = now()
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&changes.first_name)
        .bind(&changes.last_name)
        .bind(&changes.phone)
        .bind(changes.age)
        .bind(changes.gender)
        .bind(&changes.skills)
        .fetch_one(db)
        .await?;
        Ok(user)
    }

    pub async fn update_password(db: &PgPool, id: Uuid, password_hash: &str) -> anyhow::Result<()> {
        sqlx::query("UPDATE users SET password_hash = $2, updated_at = now() WHERE id = $1")
            .bind(id)
            .bind(password_hash)
            .execute(db)
            .await?;
        Ok(())
    }
}

/// Safe projections for a set of user ids, used to resolve request
/// references for display.
pub async fn load_profiles(db: &PgPool, ids: &[Uuid]) -> anyhow::Result<Vec<ProfileRow>> {
    let rows = sqlx::query_as::<_, ProfileRow>(&format!(
        "SELECT {PROFILE_COLUMNS} FROM users WHERE id = ANY($1)"
    ))
    .bind(ids)
    .fetch_all(db)
    .await?;
    Ok(rows)
}

/// One page of users outside the exclusion set, ordered by id so pagination
/// is reproducible across calls.
pub async fn feed_page(
    db: &PgPool,
    excluded: &[Uuid],
    limit: i64,
    offset: i64,
) -> anyhow::Result<Vec<ProfileRow>> {
    let rows = sqlx::query_as::<_, ProfileRow>(&format!(
        r#"
        SELECT {PROFILE_COLUMNS}
        FROM users
        WHERE id <> ALL($1)
        ORDER BY id
        LIMIT $2 OFFSET $3
        "#
    ))
    .bind(excluded)
    .bind(limit)
    .bind(offset)
    .fetch_all(db)
    .await?;
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_hash_is_never_serialized() {
        let user = User {
            id: Uuid::new_v4(),
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            email: "ada@example.com".into(),
            password_hash: "argon2-secret".into(),
            phone: "1234567890".into(),
            age: 36,
            gender: Some(Gender::Female),
            skills: vec!["math".into()],
            created_at: OffsetDateTime::UNIX_EPOCH,
            updated_at: OffsetDateTime::UNIX_EPOCH,
        };
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("password_hash"));
        assert!(!json.contains("argon2-secret"));
        assert!(json.contains("ada@example.com"));
    }

    #[test]
    fn gender_serializes_as_plain_name() {
        assert_eq!(serde_json::to_string(&Gender::Male).unwrap(), "\"Male\"");
        assert_eq!(
            serde_json::from_str::<Gender>("\"Other\"").unwrap(),
            Gender::Other
        );
        assert!(serde_json::from_str::<Gender>("\"unknown\"").is_err());
    }
}
