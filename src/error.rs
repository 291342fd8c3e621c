// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use std::time::Duration;
use thiserror::Error;

/// Classification of a failed remote call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    AlreadyExists,
    Conflict,
    Other,
}

/// Errors returned by a [`ResourceClient`](crate::kubernetes::ResourceClient).
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("already exists: {0}")]
    AlreadyExists(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("Kubernetes API error: {0}")]
    Kube(kube::Error),

    #[error("{0}")]
    Other(String),
}

impl ClientError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ClientError::NotFound(_) => ErrorKind::NotFound,
            ClientError::AlreadyExists(_) => ErrorKind::AlreadyExists,
            ClientError::Conflict(_) => ErrorKind::Conflict,
            ClientError::Kube(_) | ClientError::Other(_) => ErrorKind::Other,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }
}

impl From<kube::Error> for ClientError {
    fn from(err: kube::Error) -> Self {
        match err {
            kube::Error::Api(resp) if resp.code == 404 => ClientError::NotFound(resp.message),
            kube::Error::Api(resp) if resp.code == 409 && resp.reason == "AlreadyExists" => {
                ClientError::AlreadyExists(resp.message)
            }
            kube::Error::Api(resp) if resp.code == 409 => ClientError::Conflict(resp.message),
            other => ClientError::Kube(other),
        }
    }
}

#[derive(Error, Debug)]
pub enum ConvergentError {
    #[error("{0}")]
    InvalidArgument(String),

    #[error("can not redefine the undefined {kind}")]
    UndefinedDefinition { kind: String },

    #[error("{kind} object {name} does not exist")]
    NotFound { kind: String, name: String },

    #[error("remote call failed: {0}")]
    Client(#[from] ClientError),

    #[error("timed out after {timeout:?}{}", last_error_suffix(.last_error))]
    Timeout {
        timeout: Duration,
        last_error: Option<String>,
    },

    #[error("invalid usage: {0}")]
    Usage(String),

    #[error("failed to parse manifest: {0}")]
    Manifest(#[from] serde_yaml::Error),
}

fn last_error_suffix(last_error: &Option<String>) -> String {
    last_error
        .as_ref()
        .map(|e| format!(", last error: {}", e))
        .unwrap_or_default()
}

impl ConvergentError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, ConvergentError::Timeout { .. })
    }
}

pub type Result<T> = std::result::Result<T, ConvergentError>;
