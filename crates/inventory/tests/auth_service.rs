#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::{ADMIN_EMAIL, ADMIN_PASSWORD, TestApp};
use inventory::{
    abstract_trait::{
        auth::AuthServiceTrait, staff::StaffServiceTrait, user::UserRepositoryTrait,
    },
    domain::requests::{auth::LoginRequest, staff::CreateStaffRequest},
};
use shared::{
    abstract_trait::{JwtServiceTrait, SessionMiddlewareTrait},
    cache::Session,
    errors::ServiceError,
};

fn credentials(email: &str, password: &str) -> LoginRequest {
    LoginRequest {
        email: email.into(),
        password: password.into(),
    }
}

#[tokio::test]
async fn login_issues_tokens_and_opens_a_session() {
    let app = TestApp::new().await;

    let tokens = app
        .state
        .di_container
        .auth_service
        .login(&credentials(ADMIN_EMAIL, ADMIN_PASSWORD))
        .await
        .unwrap()
        .data;

    let user_id = app.jwt.verify_token(&tokens.access_token, "access").unwrap();
    assert_eq!(app.jwt.verify_token(&tokens.refresh_token, "refresh").unwrap(), user_id);
    assert!(app.sessions.contains(&Session::key_for(user_id)));
    assert_eq!(app.db.refresh_token_count(user_id), 1);
}

#[tokio::test]
async fn email_lookup_ignores_case() {
    let app = TestApp::new().await;

    let result = app
        .state
        .di_container
        .auth_service
        .login(&credentials("Owner@Studio.TEST", ADMIN_PASSWORD))
        .await;

    assert!(result.is_ok());
}

#[tokio::test]
async fn wrong_password_and_unknown_email_are_invalid_credentials() {
    let app = TestApp::new().await;
    let auth = &app.state.di_container.auth_service;

    let err = auth
        .login(&credentials(ADMIN_EMAIL, "nope"))
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::InvalidCredentials));

    let err = auth
        .login(&credentials("stranger@studio.test", ADMIN_PASSWORD))
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::InvalidCredentials));
}

#[tokio::test]
async fn refresh_rotates_the_stored_token() {
    let app = TestApp::new().await;
    let auth = &app.state.di_container.auth_service;
    let first = auth
        .login(&credentials(ADMIN_EMAIL, ADMIN_PASSWORD))
        .await
        .unwrap()
        .data;

    let second = auth.refresh_token(&first.refresh_token).await.unwrap().data;
    assert_ne!(second.refresh_token, first.refresh_token);

    let err = auth.refresh_token(&first.refresh_token).await.unwrap_err();
    assert!(matches!(err, ServiceError::InvalidCredentials));

    assert!(auth.refresh_token(&second.refresh_token).await.is_ok());
}

#[tokio::test]
async fn refresh_reopens_an_expired_session() {
    let app = TestApp::new().await;
    let auth = &app.state.di_container.auth_service;
    let tokens = auth
        .login(&credentials(ADMIN_EMAIL, ADMIN_PASSWORD))
        .await
        .unwrap()
        .data;
    let user_id = app.jwt.verify_token(&tokens.access_token, "access").unwrap();

    assert!(app.sessions.delete_session(&Session::key_for(user_id)).await);

    auth.refresh_token(&tokens.refresh_token).await.unwrap();

    let session = app.sessions.get_session(&Session::key_for(user_id)).await.unwrap();
    assert_eq!(session.user_id, user_id);
    assert_eq!(session.email, ADMIN_EMAIL);
}

#[tokio::test]
async fn repeated_failures_lock_the_account() {
    let app = TestApp::new().await;
    let auth = &app.state.di_container.auth_service;
    let wrong = credentials(ADMIN_EMAIL, "nope");

    let results = tokio::join!(
        auth.login(&wrong),
        auth.login(&wrong),
        auth.login(&wrong),
        auth.login(&wrong),
        auth.login(&wrong),
    );
    for result in [results.0, results.1, results.2, results.3, results.4] {
        assert!(matches!(result, Err(ServiceError::InvalidCredentials)));
    }

    let err = auth
        .login(&credentials(ADMIN_EMAIL.to_uppercase().as_str(), ADMIN_PASSWORD))
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::TooManyRequests(_)));
}

#[tokio::test]
async fn successful_login_clears_failed_attempts() {
    let app = TestApp::new().await;
    let auth = &app.state.di_container.auth_service;

    for _ in 0..4 {
        assert!(auth.login(&credentials(ADMIN_EMAIL, "nope")).await.is_err());
    }
    auth.login(&credentials(ADMIN_EMAIL, ADMIN_PASSWORD))
        .await
        .unwrap();

    for _ in 0..4 {
        assert!(matches!(
            auth.login(&credentials(ADMIN_EMAIL, "nope")).await,
            Err(ServiceError::InvalidCredentials)
        ));
    }
    assert!(auth
        .login(&credentials(ADMIN_EMAIL, ADMIN_PASSWORD))
        .await
        .is_ok());
}

#[tokio::test]
async fn access_token_cannot_be_used_to_refresh() {
    let app = TestApp::new().await;
    let tokens = app
        .state
        .di_container
        .auth_service
        .login(&credentials(ADMIN_EMAIL, ADMIN_PASSWORD))
        .await
        .unwrap()
        .data;

    let err = app
        .state
        .di_container
        .auth_service
        .refresh_token(&tokens.access_token)
        .await
        .unwrap_err();

    assert!(matches!(err, ServiceError::InvalidTokenType));
}

#[tokio::test]
async fn logout_removes_session_and_refresh_tokens() {
    let app = TestApp::new().await;
    let auth = &app.state.di_container.auth_service;
    let tokens = auth
        .login(&credentials(ADMIN_EMAIL, ADMIN_PASSWORD))
        .await
        .unwrap()
        .data;
    let user_id = app.jwt.verify_token(&tokens.access_token, "access").unwrap();

    auth.logout(user_id).await.unwrap();

    assert!(!app.sessions.contains(&Session::key_for(user_id)));
    assert_eq!(app.db.refresh_token_count(user_id), 0);
    assert!(auth.refresh_token(&tokens.refresh_token).await.is_err());
}

#[tokio::test]
async fn me_returns_the_logged_in_user() {
    let app = TestApp::new().await;
    let user = app.db.find_by_email(ADMIN_EMAIL).await.unwrap().unwrap();

    let me = app
        .state
        .di_container
        .auth_service
        .get_me(user.id)
        .await
        .unwrap()
        .data;
    assert_eq!(me.email, ADMIN_EMAIL);

    let err = app
        .state
        .di_container
        .auth_service
        .get_me(user.id + 1000)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));
}

#[tokio::test]
async fn admin_bootstrap_is_idempotent() {
    let app = TestApp::new().await;
    let auth = &app.state.di_container.auth_service;

    auth.ensure_admin(ADMIN_EMAIL, "different").await.unwrap();

    assert!(
        auth.login(&credentials(ADMIN_EMAIL, ADMIN_PASSWORD))
            .await
            .is_ok()
    );
}

#[tokio::test]
async fn staff_are_listed_by_name_and_names_are_trimmed() {
    let app = TestApp::new().await;
    let staff = &app.state.di_container.staff_service;

    staff
        .create(&CreateStaffRequest {
            name: "  zoe ".into(),
        })
        .await
        .unwrap();
    staff
        .create(&CreateStaffRequest {
            name: "Ana".into(),
        })
        .await
        .unwrap();

    let names: Vec<_> = staff
        .find_all()
        .await
        .unwrap()
        .data
        .into_iter()
        .map(|s| s.name)
        .collect();
    assert_eq!(names, ["Ana", "zoe"]);

    let err = staff
        .create(&CreateStaffRequest { name: "   ".into() })
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Validation(_)));
}
