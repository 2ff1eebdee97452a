use crate::{
    abstract_trait::{
        auth::AuthServiceTrait, refresh_token::DynRefreshTokenRepository, user::DynUserRepository,
    },
    domain::{
        requests::auth::LoginRequest,
        response::{api::ApiResponse, token::TokenResponse, user::UserResponse},
    },
};
use async_trait::async_trait;
use chrono::{Duration, Utc};
use opentelemetry::KeyValue;
use prometheus_client::registry::Registry;
use shared::{
    abstract_trait::{DynHashing, DynJwtService, DynRateLimitMiddleware, DynSessionMiddleware},
    cache::Session,
    errors::{RepositoryError, ServiceError},
    utils::{Method, Metrics, OperationTracer},
};
use tracing::{error, info, warn};

pub const MAX_LOGIN_ATTEMPTS: u32 = 5;
pub const LOGIN_LOCKOUT_MINUTES: i64 = 15;
pub const SESSION_TTL_MINUTES: i64 = 30;

pub struct AuthServiceDeps {
    pub user_repository: DynUserRepository,
    pub refresh_token_repository: DynRefreshTokenRepository,
    pub hashing: DynHashing,
    pub jwt: DynJwtService,
    pub session: DynSessionMiddleware,
    pub attempt_counter: DynRateLimitMiddleware,
}

#[derive(Clone)]
pub struct AuthService {
    user_repository: DynUserRepository,
    refresh_token_repository: DynRefreshTokenRepository,
    hashing: DynHashing,
    jwt: DynJwtService,
    session: DynSessionMiddleware,
    attempt_counter: DynRateLimitMiddleware,
    tracer: OperationTracer,
}

impl AuthService {
    pub fn new(deps: AuthServiceDeps, registry: &mut Registry) -> Self {
        let AuthServiceDeps {
            user_repository,
            refresh_token_repository,
            hashing,
            jwt,
            session,
            attempt_counter,
        } = deps;

        let metrics = Metrics::new();
        metrics.register("auth_service", "AuthService", registry);

        Self {
            user_repository,
            refresh_token_repository,
            hashing,
            jwt,
            session,
            attempt_counter,
            tracer: OperationTracer::new("auth-service", metrics),
        }
    }

    fn attempts_key(email: &str) -> String {
        format!("auth:login_attempts:{}", email.trim().to_lowercase())
    }

    async fn record_failed_attempt(&self, key: &str) {
        let (_, attempts) = self
            .attempt_counter
            .check_rate_limit(key, MAX_LOGIN_ATTEMPTS, (LOGIN_LOCKOUT_MINUTES * 60) as u32)
            .await;
        warn!("⚠️ Failed login attempt {attempts}/{MAX_LOGIN_ATTEMPTS} for {key}");
    }

    async fn open_session(&self, user_id: i32, email: &str) -> Result<(), ServiceError> {
        let session = Session {
            user_id,
            email: email.to_string(),
        };

        if self
            .session
            .create_session(
                &Session::key_for(user_id),
                &session,
                Duration::minutes(SESSION_TTL_MINUTES),
            )
            .await
        {
            Ok(())
        } else {
            Err(ServiceError::Internal("Failed to create session".into()))
        }
    }

    /// Issues an access/refresh pair and stores the refresh token.
    async fn issue_tokens(&self, user_id: i32) -> Result<TokenResponse, ServiceError> {
        let access_token = self.jwt.generate_token(user_id, "access")?;
        let refresh_token = self.jwt.generate_token(user_id, "refresh")?;
        let expiration = self.jwt.expiration_of("refresh")?;

        self.refresh_token_repository
            .create(user_id, &refresh_token, expiration)
            .await?;

        Ok(TokenResponse {
            access_token,
            refresh_token,
        })
    }
}

#[async_trait]
impl AuthServiceTrait for AuthService {
    async fn login(&self, req: &LoginRequest) -> Result<ApiResponse<TokenResponse>, ServiceError> {
        let email = req.email.trim();
        info!("🔐 Attempting login for email: {email}");

        let method = Method::Post;
        let tracing_ctx = self.tracer.start_tracing(
            "Login",
            vec![
                KeyValue::new("component", "auth"),
                KeyValue::new("user.email", email.to_string()),
            ],
        );

        let attempts_key = Self::attempts_key(email);
        let attempts = self.attempt_counter.current_count(&attempts_key).await;

        if attempts >= MAX_LOGIN_ATTEMPTS {
            self.tracer.complete_tracing_error(
                &tracing_ctx,
                method,
                "Too many failed login attempts",
            );
            return Err(ServiceError::TooManyRequests(
                "Too many failed login attempts. Try again later.".into(),
            ));
        }

        let user = match self.user_repository.find_by_email(email).await {
            Ok(Some(user)) => user,
            Ok(None) => {
                self.record_failed_attempt(&attempts_key).await;
                self.tracer
                    .complete_tracing_error(&tracing_ctx, method, "Unknown email");
                return Err(ServiceError::InvalidCredentials);
            }
            Err(e) => {
                self.tracer
                    .complete_tracing_error(&tracing_ctx, method, "Failed to look up user");
                return Err(ServiceError::Repo(e));
            }
        };

        if self
            .hashing
            .compare_password(&user.password, &req.password)
            .await
            .is_err()
        {
            self.record_failed_attempt(&attempts_key).await;
            self.tracer
                .complete_tracing_error(&tracing_ctx, method, "Invalid password");
            return Err(ServiceError::InvalidCredentials);
        }

        self.attempt_counter.reset_limit(&attempts_key).await;

        let tokens = match self.issue_tokens(user.id).await {
            Ok(tokens) => tokens,
            Err(e) => {
                self.tracer
                    .complete_tracing_error(&tracing_ctx, method, "Failed to issue tokens");
                return Err(e);
            }
        };

        if let Err(e) = self.open_session(user.id, &user.email).await {
            self.tracer
                .complete_tracing_error(&tracing_ctx, method, "Failed to create session");
            return Err(e);
        }

        self.tracer
            .complete_tracing_success(&tracing_ctx, method, "Login successful");

        Ok(ApiResponse::success("Login successful", tokens))
    }

    async fn refresh_token(
        &self,
        refresh_token: &str,
    ) -> Result<ApiResponse<TokenResponse>, ServiceError> {
        let method = Method::Post;
        let tracing_ctx = self
            .tracer
            .start_tracing("RefreshToken", vec![KeyValue::new("component", "auth")]);

        let user_id = match self.jwt.verify_token(refresh_token, "refresh") {
            Ok(id) => id,
            Err(e) => {
                self.tracer
                    .complete_tracing_error(&tracing_ctx, method, "Invalid refresh token");
                return Err(e);
            }
        };

        let stored = match self.refresh_token_repository.find_by_token(refresh_token).await {
            Ok(Some(stored)) => stored,
            Ok(None) => {
                warn!("⚠️ Refresh token for user {user_id} is not stored or was rotated");
                self.tracer
                    .complete_tracing_error(&tracing_ctx, method, "Refresh token revoked");
                return Err(ServiceError::InvalidCredentials);
            }
            Err(e) => {
                self.tracer
                    .complete_tracing_error(&tracing_ctx, method, "Failed to look up token");
                return Err(ServiceError::Repo(e));
            }
        };

        if stored.expiration < Utc::now().naive_utc() {
            self.tracer
                .complete_tracing_error(&tracing_ctx, method, "Refresh token expired");
            return Err(ServiceError::TokenExpired);
        }

        let user = match self.user_repository.find_by_id(stored.user_id).await {
            Ok(Some(user)) => user,
            Ok(None) => {
                self.tracer
                    .complete_tracing_error(&tracing_ctx, method, "User not found");
                return Err(ServiceError::InvalidCredentials);
            }
            Err(e) => {
                self.tracer
                    .complete_tracing_error(&tracing_ctx, method, "Failed to look up user");
                return Err(ServiceError::Repo(e));
            }
        };

        match self.refresh_token_repository.delete_token(refresh_token).await {
            Ok(()) | Err(RepositoryError::NotFound) => {}
            Err(e) => {
                self.tracer
                    .complete_tracing_error(&tracing_ctx, method, "Failed to rotate token");
                return Err(ServiceError::Repo(e));
            }
        }

        let tokens = match self.issue_tokens(user.id).await {
            Ok(tokens) => tokens,
            Err(e) => {
                self.tracer
                    .complete_tracing_error(&tracing_ctx, method, "Failed to issue tokens");
                return Err(e);
            }
        };

        // The session may have idled out while the refresh token stayed valid.
        if let Err(e) = self.open_session(user.id, &user.email).await {
            self.tracer
                .complete_tracing_error(&tracing_ctx, method, "Failed to create session");
            return Err(e);
        }

        self.tracer
            .complete_tracing_success(&tracing_ctx, method, "Token refreshed");

        Ok(ApiResponse::success("Token refreshed", tokens))
    }

    async fn get_me(&self, user_id: i32) -> Result<ApiResponse<UserResponse>, ServiceError> {
        let method = Method::Get;
        let tracing_ctx = self.tracer.start_tracing(
            "GetMe",
            vec![
                KeyValue::new("component", "auth"),
                KeyValue::new("user.id", user_id.to_string()),
            ],
        );

        match self.user_repository.find_by_id(user_id).await {
            Ok(Some(user)) => {
                self.tracer
                    .complete_tracing_success(&tracing_ctx, method, "User fetched");
                Ok(ApiResponse::success(
                    "User fetched successfully",
                    UserResponse::from(user),
                ))
            }
            Ok(None) => {
                self.tracer
                    .complete_tracing_error(&tracing_ctx, method, "User not found");
                Err(ServiceError::NotFound("User not found".into()))
            }
            Err(e) => {
                self.tracer
                    .complete_tracing_error(&tracing_ctx, method, "Failed to fetch user");
                Err(ServiceError::Repo(e))
            }
        }
    }

    async fn logout(&self, user_id: i32) -> Result<ApiResponse<()>, ServiceError> {
        let method = Method::Post;
        let tracing_ctx = self.tracer.start_tracing(
            "Logout",
            vec![
                KeyValue::new("component", "auth"),
                KeyValue::new("user.id", user_id.to_string()),
            ],
        );

        if !self.session.delete_session(&Session::key_for(user_id)).await {
            warn!("⚠️ No session removed for user {user_id}");
        }

        if let Err(e) = self.refresh_token_repository.delete_by_user_id(user_id).await {
            error!("❌ Failed to revoke refresh tokens for user {user_id}: {e:?}");
            self.tracer
                .complete_tracing_error(&tracing_ctx, method, "Failed to revoke tokens");
            return Err(ServiceError::Repo(e));
        }

        self.tracer
            .complete_tracing_success(&tracing_ctx, method, "Logged out");

        Ok(ApiResponse::success("Logged out successfully", ()))
    }

    async fn ensure_admin(&self, email: &str, password: &str) -> Result<(), ServiceError> {
        if self.user_repository.find_by_email(email).await?.is_some() {
            info!("👤 Admin account {email} already exists");
            return Ok(());
        }

        let hashed = self.hashing.hash_password(password).await?;
        let user = self.user_repository.create_user(email, &hashed).await?;

        info!("✅ Created admin account {} (ID {})", user.email, user.id);
        Ok(())
    }
}
