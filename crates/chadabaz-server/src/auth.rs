//! HTTP Basic-auth guard for the admin routes.

use std::sync::Arc;

use argon2::{Argon2, PasswordHash, PasswordVerifier};
use axum::{
  extract::{Request, State},
  http::HeaderMap,
  middleware::Next,
  response::Response,
};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as B64;

use crate::{ServerConfig, error::Error};

/// Credentials accepted for the admin surface.
#[derive(Clone)]
pub struct AuthConfig {
  pub username:      String,
  /// PHC string produced by argon2, e.g. `$argon2id$v=19$…`. Empty disables
  /// admin access entirely.
  pub password_hash: String,
}

impl From<&ServerConfig> for AuthConfig {
  fn from(config: &ServerConfig) -> Self {
    Self {
      username:      config.admin_username.clone(),
      password_hash: config.admin_password_hash.clone(),
    }
  }
}

/// Verify Basic credentials in `headers` against `config`.
pub fn verify_auth(headers: &HeaderMap, config: &AuthConfig) -> Result<(), Error> {
  if config.password_hash.is_empty() {
    return Err(Error::Unauthorized);
  }

  let header_val = headers
    .get(axum::http::header::AUTHORIZATION)
    .and_then(|v| v.to_str().ok())
    .ok_or(Error::Unauthorized)?;

  let encoded = header_val
    .strip_prefix("Basic ")
    .ok_or(Error::Unauthorized)?;

  let decoded = B64.decode(encoded).map_err(|_| Error::Unauthorized)?;
  let creds   = std::str::from_utf8(&decoded).map_err(|_| Error::Unauthorized)?;

  let (username, password) = creds.split_once(':').ok_or(Error::Unauthorized)?;

  if username != config.username {
    return Err(Error::Unauthorized);
  }

  let parsed_hash = PasswordHash::new(&config.password_hash)
    .map_err(|_| Error::Unauthorized)?;

  Argon2::default()
    .verify_password(password.as_bytes(), &parsed_hash)
    .map_err(|_| Error::Unauthorized)?;

  Ok(())
}

/// Route-layer middleware rejecting unauthenticated admin requests.
pub async fn require_admin(
  State(auth): State<Arc<AuthConfig>>,
  req: Request,
  next: Next,
) -> Result<Response, Error> {
  if let Err(e) = verify_auth(req.headers(), &auth) {
    tracing::warn!(path = %req.uri().path(), "rejected admin request");
    return Err(e);
  }
  Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
  use argon2::{PasswordHasher, password_hash::SaltString};
  use axum::http::header;
  use rand_core::OsRng;

  use super::*;

  fn config(password: &str) -> AuthConfig {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
      .hash_password(password.as_bytes(), &salt)
      .unwrap()
      .to_string();
    AuthConfig {
      username:      "admin".to_string(),
      password_hash: hash,
    }
  }

  fn headers(value: &str) -> HeaderMap {
    let mut h = HeaderMap::new();
    h.insert(header::AUTHORIZATION, value.parse().unwrap());
    h
  }

  fn basic(user: &str, pass: &str) -> String {
    format!("Basic {}", B64.encode(format!("{user}:{pass}")))
  }

  #[test]
  fn correct_credentials() {
    let cfg = config("secret");
    assert!(verify_auth(&headers(&basic("admin", "secret")), &cfg).is_ok());
  }

  #[test]
  fn wrong_password() {
    let cfg = config("secret");
    let result = verify_auth(&headers(&basic("admin", "wrong")), &cfg);
    assert!(matches!(result, Err(Error::Unauthorized)));
  }

  #[test]
  fn wrong_username() {
    let cfg = config("secret");
    let result = verify_auth(&headers(&basic("root", "secret")), &cfg);
    assert!(matches!(result, Err(Error::Unauthorized)));
  }

  #[test]
  fn missing_header() {
    let cfg = config("secret");
    assert!(matches!(verify_auth(&HeaderMap::new(), &cfg), Err(Error::Unauthorized)));
  }

  #[test]
  fn invalid_base64() {
    let cfg = config("secret");
    let result = verify_auth(&headers("Basic !!!not-base64!!!"), &cfg);
    assert!(matches!(result, Err(Error::Unauthorized)));
  }

  #[test]
  fn empty_hash_rejects_everyone() {
    let cfg = AuthConfig {
      username:      "admin".to_string(),
      password_hash: String::new(),
    };
    let result = verify_auth(&headers(&basic("admin", "")), &cfg);
    assert!(matches!(result, Err(Error::Unauthorized)));
  }
}
