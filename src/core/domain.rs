use crate::core::errors::{FieldError, UserServiceError};

pub const ID_MIN: i64 = 1;
pub const NAME_MIN_LEN: usize = 3;
pub const PASSWORD_MIN_LEN: usize = 6;
pub const PASSWORD_MAX_LEN: usize = 30;

fn name_char_allowed(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-'
}

pub fn validate_name(name: &str) -> Result<(), UserServiceError> {
    if name.chars().count() < NAME_MIN_LEN {
        return Err(UserServiceError::Validation(FieldError::new(
            "name",
            "Name too short",
            format!("name must be at least {} characters", NAME_MIN_LEN),
        )));
    }
    if !name.chars().all(name_char_allowed) {
        return Err(UserServiceError::Validation(FieldError::new(
            "name",
            "Invalid name",
            "name may only contain letters, digits, `_` and `-`".to_string(),
        )));
    }
    Ok(())
}

pub fn validate_password(password: &str) -> Result<(), UserServiceError> {
    let len = password.chars().count();
    if !(PASSWORD_MIN_LEN..=PASSWORD_MAX_LEN).contains(&len) {
        return Err(UserServiceError::Validation(FieldError::new(
            "password",
            "Invalid password length",
            format!(
                "password must be between {} and {} characters",
                PASSWORD_MIN_LEN, PASSWORD_MAX_LEN
            ),
        )));
    }
    if !password.chars().all(|c| c.is_ascii_graphic()) {
        return Err(UserServiceError::Validation(FieldError::new(
            "password",
            "Invalid password",
            "password may only contain printable ASCII characters without spaces".to_string(),
        )));
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<(), UserServiceError> {
    let invalid = || {
        UserServiceError::Validation(FieldError::new(
            "email",
            "Invalid email",
            format!("`{}` is not a valid email address", email),
        ))
    };

    if email.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return Err(invalid());
    }
    let mut parts = email.split('@');
    let (Some(local), Some(domain), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(invalid());
    };
    if local.is_empty() || domain.is_empty() {
        return Err(invalid());
    }
    if !domain.contains('.') || domain.split('.').any(str::is_empty) {
        return Err(invalid());
    }
    Ok(())
}

pub fn validate_id(id: i64) -> Result<(), UserServiceError> {
    if id < ID_MIN {
        return Err(UserServiceError::Validation(FieldError::new(
            "id",
            "Invalid id",
            format!("id must be a positive integer, got {}", id),
        )));
    }
    Ok(())
}

/// Full construction shape: everything a brand-new user needs. Construction
/// fails unless every field invariant holds, so an instance is always safe
/// to hand to the repository.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub password: String,
    pub email: String,
}

impl NewUser {
    pub fn new(name: String, password: String, email: String) -> Result<Self, UserServiceError> {
        validate_name(&name)?;
        validate_password(&password)?;
        validate_email(&email)?;
        Ok(NewUser { name, password, email })
    }
}

/// Base shape carrying only a validated positive identifier, used by the
/// lookup and delete paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserKey {
    pub id: i64,
}

impl UserKey {
    pub fn new(id: i64) -> Result<Self, UserServiceError> {
        validate_id(id)?;
        Ok(UserKey { id })
    }
}

/// Sparse change-set for partial updates. A `None` field means "leave this
/// field as it is" and is distinct from an empty string, which fails the
/// field's validator.
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub name: Option<String>,
    pub password: Option<String>,
    pub email: Option<String>,
}

impl UserChanges {
    pub fn new(
        name: Option<String>,
        password: Option<String>,
        email: Option<String>,
    ) -> Result<Self, UserServiceError> {
        if let Some(ref name) = name {
            validate_name(name)?;
        }
        if let Some(ref password) = password {
            validate_password(password)?;
        }
        if let Some(ref email) = email {
            validate_email(email)?;
        }
        Ok(UserChanges { name, password, email })
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.password.is_none() && self.email.is_none()
    }
}
