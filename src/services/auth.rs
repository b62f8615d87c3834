//! Authentication and registration service

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::Utc;
use validator::Validate;

use crate::{
    config::{AuthConfig, BootstrapConfig},
    error::{AppError, AppResult},
    models::{
        auth::{Claims, LoginRequest, Role},
        student::{RegisterStudent, Student},
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct AuthService {
    repository: Repository,
    config: AuthConfig,
}

impl AuthService {
    pub fn new(repository: Repository, config: AuthConfig) -> Self {
        Self { repository, config }
    }

    /// Check credentials and issue a token for the matching role
    pub async fn login(&self, request: &LoginRequest) -> AppResult<(String, Role)> {
        match request {
            LoginRequest::Admin { username, password } => {
                let admin = self.repository.admins.get_by_username(username).await?;
                match admin {
                    Some(admin) if verify_password(&admin.password, password)? => {
                        tracing::info!("Admin {} logged in", admin.username);
                        let token = self.issue_token(admin.id, &admin.username, Role::Admin)?;
                        Ok((token, Role::Admin))
                    }
                    _ => {
                        tracing::debug!("Rejected admin login for {}", username);
                        Err(AppError::Authentication("Invalid admin credentials".to_string()))
                    }
                }
            }
            LoginRequest::Student { roll_number, password } => {
                let student = self.repository.students.get_by_roll_number(roll_number).await?;
                match student {
                    Some(student) if verify_password(&student.password, password)? => {
                        tracing::info!("Student {} logged in", student.roll_number);
                        let token = self.issue_token(student.id, &student.roll_number, Role::Student)?;
                        Ok((token, Role::Student))
                    }
                    _ => {
                        tracing::debug!("Rejected student login for {}", roll_number);
                        Err(AppError::Authentication("Invalid student credentials".to_string()))
                    }
                }
            }
        }
    }

    /// Register a new student account
    pub async fn register(&self, request: RegisterStudent) -> AppResult<Student> {
        request.validate()?;

        if self.repository.students.roll_number_exists(&request.roll_number).await? {
            return Err(AppError::Conflict("Roll number already exists".to_string()));
        }

        let password = hash_password(&request.password)?;
        let student = self
            .repository
            .students
            .create(&request.name, &request.roll_number, &password)
            .await?;

        tracing::info!("Registered student {} (id={})", student.roll_number, student.id);
        Ok(student)
    }

    /// Load the student behind a token. A token for a deleted student is no longer valid.
    pub async fn current_student(&self, claims: &Claims) -> AppResult<Student> {
        let student_id = claims.require_student()?;
        self.repository
            .students
            .get_by_id(student_id)
            .await?
            .ok_or_else(|| AppError::Authentication("Student not found".to_string()))
    }

    /// Create the configured default admin when no admin with that username exists
    pub async fn ensure_default_admin(&self, bootstrap: &BootstrapConfig) -> AppResult<bool> {
        if self
            .repository
            .admins
            .get_by_username(&bootstrap.admin_username)
            .await?
            .is_some()
        {
            tracing::info!("Admin account already exists");
            return Ok(false);
        }

        let password = hash_password(&bootstrap.admin_password)?;
        let created = self
            .repository
            .admins
            .create_if_missing(&bootstrap.admin_username, &password)
            .await?;

        if created {
            tracing::info!("Default admin account created (username: {})", bootstrap.admin_username);
        }
        Ok(created)
    }

    fn issue_token(&self, user_id: i32, subject: &str, role: Role) -> AppResult<String> {
        let now = Utc::now().timestamp();
        let exp = now + (self.config.jwt_expiration_hours as i64 * 3600);

        let claims = Claims {
            sub: subject.to_string(),
            user_id,
            role,
            exp,
            iat: now,
        };

        claims
            .create_token(&self.config.jwt_secret)
            .map_err(|e| AppError::Internal(format!("Failed to create token: {}", e)))
    }
}

/// Hash a password using Argon2 with a random salt
pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;
    Ok(hash.to_string())
}

/// Verify a password against a stored PHC hash
pub fn verify_password(hash: &str, password: &str) -> AppResult<bool> {
    let parsed_hash =
        PasswordHash::new(hash).map_err(|_| AppError::Internal("Invalid password hash".to_string()))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}
