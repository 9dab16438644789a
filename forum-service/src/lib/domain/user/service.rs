use std::sync::Arc;
use std::sync::OnceLock;

use async_trait::async_trait;
use auth::Authenticator;
use chrono::Utc;

use crate::domain::user::models::ChangePasswordCommand;
use crate::domain::user::models::LoginCommand;
use crate::domain::user::models::LoginOutcome;
use crate::domain::user::models::Password;
use crate::domain::user::models::RegisterUserCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::models::Username;
use crate::user::errors::UserError;
use crate::user::ports::UserRepository;
use crate::user::ports::UserServicePort;

/// Verified in place of a real hash when the username is unknown, so both
/// login failure paths pay for one Argon2 verification.
const TIMING_DUMMY_PASSWORD: &str = "forum-service-unknown-user";

/// Domain service implementation for user operations.
///
/// Argon2 work runs on tokio's blocking pool.
pub struct UserService<UR>
where
    UR: UserRepository,
{
    repository: Arc<UR>,
    authenticator: Arc<Authenticator>,
    dummy_hash: Arc<OnceLock<String>>,
}

impl<UR> UserService<UR>
where
    UR: UserRepository,
{
    /// Create a new user service with injected dependencies.
    ///
    /// # Arguments
    /// * `repository` - User persistence implementation
    /// * `authenticator` - Password hashing and token issuance
    pub fn new(repository: Arc<UR>, authenticator: Arc<Authenticator>) -> Self {
        Self {
            repository,
            authenticator,
            dummy_hash: Arc::new(OnceLock::new()),
        }
    }

    async fn hash_password(&self, password: Password) -> Result<String, UserError> {
        let hasher = self.authenticator.password_hasher();

        tokio::task::spawn_blocking(move || hasher.hash(password.as_str()))
            .await
            .map_err(|e| UserError::Unknown(format!("Password hashing task failed: {}", e)))?
            .map_err(UserError::from)
    }

    async fn verify_password(&self, attempt: String, stored_hash: String) -> Result<bool, UserError> {
        let hasher = self.authenticator.password_hasher();

        tokio::task::spawn_blocking(move || hasher.verify(&attempt, &stored_hash))
            .await
            .map_err(|e| UserError::Unknown(format!("Password verification task failed: {}", e)))?
            .map_err(UserError::from)
    }

    async fn verify_against_dummy(&self, attempt: String) {
        let hasher = self.authenticator.password_hasher();
        let dummy_hash = Arc::clone(&self.dummy_hash);

        let outcome = tokio::task::spawn_blocking(move || {
            // Only a successfully computed hash is cached.
            let hash = match dummy_hash.get() {
                Some(hash) => hash,
                None => {
                    let fresh = hasher.hash(TIMING_DUMMY_PASSWORD)?;
                    dummy_hash.get_or_init(|| fresh)
                }
            };
            hasher.verify(&attempt, hash)
        })
        .await;

        match outcome {
            Ok(Ok(_)) => {}
            Ok(Err(e)) => tracing::error!(error = %e, "Dummy password verification failed"),
            Err(e) => tracing::error!(error = %e, "Dummy password verification task failed"),
        }
    }
}

#[async_trait]
impl<UR> UserServicePort for UserService<UR>
where
    UR: UserRepository,
{
    async fn register(&self, command: RegisterUserCommand) -> Result<User, UserError> {
        let password_hash = self.hash_password(command.password).await?;

        // E-mail delivery is not part of this service, so accounts start verified.
        let user = User {
            id: UserId::new(),
            username: command.username,
            email: command.email,
            password_hash,
            email_verified: true,
            created_at: Utc::now(),
        };

        let created_user = self.repository.create(user).await?;

        tracing::info!(
            user_id = %created_user.id,
            username = %created_user.username,
            "User registered"
        );

        Ok(created_user)
    }

    async fn login(&self, command: LoginCommand) -> Result<LoginOutcome, UserError> {
        let LoginCommand { username, password } = command;

        let user = match Username::new(username) {
            Ok(username) => self.repository.find_by_username(&username).await?,
            Err(_) => None,
        };

        let Some(user) = user else {
            self.verify_against_dummy(password).await;
            tracing::info!("Login rejected: unknown username");
            return Err(UserError::InvalidCredentials);
        };

        let authenticator = Arc::clone(&self.authenticator);
        let stored_hash = user.password_hash.clone();
        let user_id = user.id;
        let display_name = user.username.as_str().to_string();

        let result = tokio::task::spawn_blocking(move || {
            authenticator.authenticate(&password, &stored_hash, user_id, &display_name)
        })
        .await
        .map_err(|e| UserError::Unknown(format!("Login task failed: {}", e)))?
        .map_err(UserError::from);

        match result {
            Ok(authenticated) => {
                tracing::info!(user_id = %user.id, "User logged in");
                Ok(LoginOutcome {
                    user,
                    token: authenticated.access_token,
                })
            }
            Err(e) => {
                tracing::info!(user_id = %user.id, error = %e, "Login rejected");
                Err(e)
            }
        }
    }

    async fn get_user(&self, id: &UserId) -> Result<User, UserError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id.to_string()))
    }

    async fn change_password(
        &self,
        id: &UserId,
        command: ChangePasswordCommand,
    ) -> Result<(), UserError> {
        let user = self.get_user(id).await?;

        if !self
            .verify_password(command.current_password, user.password_hash)
            .await?
        {
            return Err(UserError::InvalidCredentials);
        }

        let password_hash = self.hash_password(command.new_password).await?;
        self.repository
            .update_password_hash(id, password_hash)
            .await?;

        tracing::info!(user_id = %id, "Password changed");

        Ok(())
    }
}
