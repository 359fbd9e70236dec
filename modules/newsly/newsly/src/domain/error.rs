use std::path::PathBuf;

use newsly_sdk::ApiError;
use thiserror::Error;

use super::catalog::StepId;
use super::fields::ProfileField;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("storage file {path} could not be accessed: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("storage file {path} is not a JSON object: {source}")]
    CorruptFile {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("value stored under '{key}' could not be decoded: {source}")]
    Decode {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("value for '{key}' could not be encoded: {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Error, Debug)]
pub enum WizardError {
    #[error("step '{step}' is not complete yet")]
    StepIncomplete { step: StepId },

    #[error("step '{step}' is required and cannot be skipped")]
    RequiredStep { step: StepId },

    #[error("field '{field}' expects {expected}")]
    TypeMismatch {
        field: ProfileField,
        expected: &'static str,
    },

    #[error("onboarding access has not been granted")]
    AccessDenied,

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Client-side password rules, checked in declaration order.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordRuleError {
    #[error("Passwords don't match")]
    Mismatch,
    #[error("Password must be at least 8 characters")]
    TooShort,
    #[error("Password must contain an uppercase letter")]
    MissingUppercase,
    #[error("Password must contain a lowercase letter")]
    MissingLowercase,
    #[error("Password must contain a number")]
    MissingDigit,
}

/// Failure of a sign-up or sign-in submission. The message is what the form shows.
#[derive(Error, Debug)]
pub enum AuthPageError {
    #[error("{0} is required")]
    MissingField(&'static str),

    #[error(transparent)]
    Rule(#[from] PasswordRuleError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Failure of the onboarding access gate.
#[derive(Error, Debug)]
pub enum AccessGateError {
    #[error("Incorrect password. Please try again.")]
    Incorrect,

    #[error("Connection error. Please try again.")]
    Connection(#[source] ApiError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Failure of an account settings action.
#[derive(Error, Debug)]
pub enum AccountError {
    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("Please enter a valid email address")]
    InvalidEmail,

    #[error("No local account; sign in first")]
    NoAccount,

    #[error(transparent)]
    Storage(#[from] StorageError),
}
