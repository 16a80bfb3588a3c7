use lazy_static::lazy_static;
use regex::Regex;
use tracing::{info, warn};

use crate::{
    auth::{
        dto::{LoginRequest, SignupRequest, UpdateProfileRequest},
        password::{hash_password, verify_password, MIN_PASSWORD_LEN},
        repo_types::{NewUser, User, UserChanges},
    },
    error::{ApiError, ApiResult, StoreError},
    state::AppState,
};

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

fn required(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn issue_token(state: &AppState, user: &User) -> ApiResult<String> {
    state
        .keys
        .issue(user.id, &user.email)
        .map_err(|e| ApiError::Misconfigured(format!("jwt signing failed: {e}")))
}

pub async fn signup(state: &AppState, req: SignupRequest) -> ApiResult<(User, String)> {
    let (Some(email), Some(password)) = (required(req.email), required(req.password)) else {
        return Err(ApiError::Validation(
            "Email and password are required".into(),
        ));
    };

    if !is_valid_email(&email) {
        return Err(ApiError::Validation("Invalid email format".into()));
    }

    // length in UTF-16 code units, as browsers count it
    if password.encode_utf16().count() < MIN_PASSWORD_LEN {
        return Err(ApiError::Validation(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters long"
        )));
    }

    if state.users.find_by_email(&email).await?.is_some() {
        warn!(email = %email, "email already registered");
        return Err(ApiError::Conflict("User already exists"));
    }

    let password_hash = hash_password(&password)?;

    let user = state
        .users
        .create(NewUser {
            email,
            password_hash,
            name: req.name.filter(|n| !n.is_empty()),
        })
        .await
        .map_err(|e| match e {
            // lost the race against a concurrent signup
            StoreError::Conflict => ApiError::Conflict("User already exists"),
            other => other.into(),
        })?;

    let token = issue_token(state, &user)?;
    info!(user_id = %user.id, email = %user.email, "user registered");
    Ok((user, token))
}

pub async fn login(state: &AppState, req: LoginRequest) -> ApiResult<(User, String)> {
    let (Some(email), Some(password)) = (required(req.email), required(req.password)) else {
        return Err(ApiError::Validation(
            "Email and password are required".into(),
        ));
    };

    let Some(user) = state.users.find_by_email(&email).await? else {
        warn!(email = %email, "login unknown email");
        return Err(ApiError::InvalidCredentials);
    };

    if !verify_password(&password, &user.password_hash)? {
        warn!(user_id = %user.id, "login invalid password");
        return Err(ApiError::InvalidCredentials);
    }

    let token = issue_token(state, &user)?;
    info!(user_id = %user.id, email = %user.email, "user logged in");
    Ok((user, token))
}

pub async fn update_profile(
    state: &AppState,
    current: &User,
    req: UpdateProfileRequest,
) -> ApiResult<User> {
    let email = req.email.filter(|e| *e != current.email);

    if let Some(email) = &email {
        if !is_valid_email(email) {
            return Err(ApiError::Validation("Invalid email format".into()));
        }
        if state.users.find_by_email(email).await?.is_some() {
            warn!(user_id = %current.id, email = %email, "profile email already taken");
            return Err(ApiError::Conflict("Email already exists"));
        }
    }

    let changes = UserChanges {
        email,
        name: req.name,
    };
    let user = state
        .users
        .update(current.id, changes)
        .await?
        .ok_or(ApiError::Unauthenticated)?;

    info!(user_id = %user.id, "profile updated");
    Ok(user)
}
