//! User credential lookup.
//!
//! A thin collaborator: the reminder engine never touches this. Credentials
//! live in a `users.csv` file next to the medication files. Validation is an
//! opaque yes/no answer.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur during credential operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The username is already taken.
    #[error("username already exists: {0}")]
    DuplicateUser(String),

    /// Username or password was empty.
    #[error("username and password must not be empty")]
    EmptyCredentials,

    /// Underlying I/O failure.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// The users file could not be read or written.
    #[error("users file error: {0}")]
    Csv(#[from] csv::Error),
}

#[derive(Debug, Serialize, Deserialize)]
struct UserRecord {
    username: String,
    password: String,
}

/// CSV-backed user store.
pub struct UserStore {
    path: PathBuf,
}

impl UserStore {
    /// Open the user store at the given path, creating an empty file with
    /// the header row if it does not exist yet.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, AuthError> {
        let path = path.into();
        if !path.exists() {
            let mut writer = csv::Writer::from_path(&path)?;
            writer.write_record(["username", "password"])?;
            writer.flush()?;
        }
        Ok(Self { path })
    }

    /// Open the `users.csv` file under `data_dir`.
    pub fn in_dir(data_dir: impl AsRef<Path>) -> Result<Self, AuthError> {
        Self::open(data_dir.as_ref().join("users.csv"))
    }

    fn read_users(&self) -> Result<Vec<UserRecord>, AuthError> {
        let mut reader = csv::Reader::from_path(&self.path)?;
        let mut users = Vec::new();
        for result in reader.deserialize() {
            users.push(result?);
        }
        Ok(users)
    }

    /// Check a username/password pair.
    pub fn validate(&self, username: &str, password: &str) -> Result<bool, AuthError> {
        let users = self.read_users()?;
        Ok(users
            .iter()
            .any(|u| u.username == username && u.password == password))
    }

    /// Register a new user. Duplicate usernames are rejected.
    pub fn signup(&self, username: &str, password: &str) -> Result<(), AuthError> {
        let username = username.trim();
        if username.is_empty() || password.is_empty() {
            return Err(AuthError::EmptyCredentials);
        }

        let users = self.read_users()?;
        if users.iter().any(|u| u.username == username) {
            return Err(AuthError::DuplicateUser(username.to_string()));
        }

        let file = std::fs::OpenOptions::new().append(true).open(&self.path)?;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        writer.serialize(UserRecord {
            username: username.to_string(),
            password: password.to_string(),
        })?;
        writer.flush()?;
        Ok(())
    }
}
