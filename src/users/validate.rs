use std::fmt;

use lazy_static::lazy_static;
use regex::Regex;

use crate::auth::dto::SignupRequest;
use crate::profile::dto::UpdateProfileRequest;

pub const MAX_NAME_LEN: usize = 10;
pub const MAX_PHONE_LEN: usize = 10;
pub const MIN_AGE: i32 = 18;
pub const MAX_SKILLS: usize = 5;
pub const MIN_PASSWORD_LEN: usize = 8;

/// A single rejected field with the reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub field: &'static str,
    pub message: String,
}

impl Violation {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// Everything wrong with a payload, collected in one pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violations(pub Vec<Violation>);

impl fmt::Display for Violations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = self
            .0
            .iter()
            .map(|v| v.message.as_str())
            .collect::<Vec<_>>()
            .join("; ");
        write!(f, "{joined}")
    }
}

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

fn check_name(out: &mut Vec<Violation>, field: &'static str, label: &str, value: &str) {
    if value.trim().is_empty() {
        out.push(Violation::new(field, format!("{label} is required")));
    } else if value.chars().count() > MAX_NAME_LEN {
        out.push(Violation::new(
            field,
            format!("{label} can have maximum {MAX_NAME_LEN} characters"),
        ));
    }
}

fn check_phone(out: &mut Vec<Violation>, value: &str) {
    if value.trim().is_empty() {
        out.push(Violation::new("phone", "Phone number is required"));
    } else if value.chars().count() > MAX_PHONE_LEN {
        out.push(Violation::new(
            "phone",
            format!("Phone number can have maximum {MAX_PHONE_LEN} digits"),
        ));
    }
}

fn check_age(out: &mut Vec<Violation>, age: i32) {
    if age < MIN_AGE {
        out.push(Violation::new(
            "age",
            format!("Age must be at least {MIN_AGE} years"),
        ));
    }
}

fn check_skills(out: &mut Vec<Violation>, skills: &[String]) {
    if skills.len() > MAX_SKILLS {
        out.push(Violation::new(
            "skills",
            format!("You can add a maximum of {MAX_SKILLS} skills"),
        ));
    }
}

fn check_password(out: &mut Vec<Violation>, password: &str) {
    if password.chars().count() < MIN_PASSWORD_LEN {
        out.push(Violation::new(
            "password",
            format!("Password must have at least {MIN_PASSWORD_LEN} characters"),
        ));
    }
}

/// Validate a signup payload. Gender is already constrained by its type.
pub fn validate_signup(req: &SignupRequest) -> Result<(), Violations> {
    let mut out = Vec::new();

    check_name(&mut out, "first_name", "First Name", &req.first_name);
    check_name(&mut out, "last_name", "Last Name", &req.last_name);
    if !is_valid_email(&req.email) {
        out.push(Violation::new(
            "email",
            format!("{} is not a valid email", req.email),
        ));
    }
    check_password(&mut out, &req.password);
    check_phone(&mut out, &req.phone);
    check_age(&mut out, req.age);
    if let Some(skills) = &req.skills {
        check_skills(&mut out, skills);
    }

    if out.is_empty() {
        Ok(())
    } else {
        Err(Violations(out))
    }
}

/// Validate the present fields of a partial profile update.
pub fn validate_profile_update(req: &UpdateProfileRequest) -> Result<(), Violations> {
    let mut out = Vec::new();

    if let Some(first_name) = &req.first_name {
        check_name(&mut out, "first_name", "First Name", first_name);
    }
    if let Some(last_name) = &req.last_name {
        check_name(&mut out, "last_name", "Last Name", last_name);
    }
    if let Some(phone) = &req.phone {
        check_phone(&mut out, phone);
    }
    if let Some(age) = req.age {
        check_age(&mut out, age);
    }
    if let Some(skills) = &req.skills {
        check_skills(&mut out, skills);
    }

    if out.is_empty() {
        Ok(())
    } else {
        Err(Violations(out))
    }
}

/// Validate a new password on its own (change-password flow).
pub fn validate_new_password(password: &str) -> Result<(), Violations> {
    let mut out = Vec::new();
    check_password(&mut out, password);
    if out.is_empty() {
        Ok(())
    } else {
        Err(Violations(out))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::users::repo::Gender;

    fn valid_signup() -> SignupRequest {
        SignupRequest {
            first_name: "Grace".into(),
            last_name: "Hopper".into(),
            email: "grace@example.com".into(),
            password: "correct-horse".into(),
            phone: "5551234567".into(),
            age: 30,
            gender: Some(Gender::Female),
            skills: Some(vec!["compilers".into(), "navy".into()]),
        }
    }

    #[test]
    fn valid_signup_passes() {
        assert!(validate_signup(&valid_signup()).is_ok());
    }

    #[test]
    fn missing_and_bad_fields_are_collected_in_one_pass() {
        let req = SignupRequest {
            first_name: "".into(),
            last_name: "waytoolongname".into(),
            email: "not-an-email".into(),
            password: "short".into(),
            phone: "".into(),
            age: 17,
            gender: None,
            skills: None,
        };
        let violations = validate_signup(&req).unwrap_err();
        let fields: Vec<_> = violations.0.iter().map(|v| v.field).collect();
        assert_eq!(
            fields,
            vec!["first_name", "last_name", "email", "password", "phone", "age"]
        );
    }

    #[test]
    fn skills_are_capped_at_five() {
        let mut req = valid_signup();
        req.skills = Some((0..6).map(|i| format!("skill-{i}")).collect());
        let violations = validate_signup(&req).unwrap_err();
        assert_eq!(violations.0.len(), 1);
        assert_eq!(violations.0[0].field, "skills");
    }

    #[test]
    fn age_just_at_the_limit_is_accepted() {
        let mut req = valid_signup();
        req.age = 18;
        assert!(validate_signup(&req).is_ok());
    }

    #[test]
    fn email_regex_rejects_obvious_garbage() {
        assert!(is_valid_email("a@b.co"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("a b@c.com"));
        assert!(!is_valid_email(""));
    }

    #[test]
    fn update_only_checks_present_fields() {
        let req = UpdateProfileRequest {
            first_name: None,
            last_name: None,
            phone: Some("12345678901".into()),
            age: None,
            gender: None,
            skills: None,
            email: None,
            password: None,
        };
        let violations = validate_profile_update(&req).unwrap_err();
        assert_eq!(violations.0.len(), 1);
        assert_eq!(violations.0[0].field, "phone");

        let empty = UpdateProfileRequest::default();
        assert!(validate_profile_update(&empty).is_ok());
    }

    #[test]
    fn violations_display_joins_messages() {
        let v = Violations(vec![
            Violation::new("a", "first problem"),
            Violation::new("b", "second problem"),
        ]);
        assert_eq!(v.to_string(), "first problem; second problem");
    }
}
