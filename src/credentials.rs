// Copyright (c) 2025 - Cowboy AI, Inc.
//! Gateway basic-auth credentials read from mounted secrets

use std::fmt;
use std::path::Path;

use crate::errors::{BridgeError, BridgeResult};

/// Secret file holding the user name
pub const USER_FILE: &str = "basic-auth-user";

/// Secret file holding the password
pub const PASSWORD_FILE: &str = "basic-auth-password";

#[derive(Clone, PartialEq, Eq)]
pub struct BasicAuthCredentials {
    pub user: String,
    pub password: String,
}

impl BasicAuthCredentials {
    pub fn new(user: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            password: password.into(),
        }
    }

    /// Read `basic-auth-user` and `basic-auth-password` from `dir`
    pub fn read_from_dir(dir: impl AsRef<Path>) -> BridgeResult<Self> {
        let dir = dir.as_ref();
        Ok(Self {
            user: read_secret(dir, USER_FILE)?,
            password: read_secret(dir, PASSWORD_FILE)?,
        })
    }
}

impl fmt::Debug for BasicAuthCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BasicAuthCredentials")
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .finish()
    }
}

fn read_secret(dir: &Path, name: &str) -> BridgeResult<String> {
    let path = dir.join(name);
    let value = std::fs::read_to_string(&path).map_err(|e| {
        BridgeError::Configuration(format!("unable to read secret {}: {}", path.display(), e))
    })?;
    Ok(value.trim().to_string())
}
