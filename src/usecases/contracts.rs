use thiserror::Error;

use crate::domain::{
    identity::{AccessToken, TokenScope, UserId},
    message::{ChatMessage, OutgoingMessage},
    thread::{ChatThread, ThreadMember, ThreadRef, ThreadSummary},
};

use super::paging::Pages;

/// How the menu should react to a failed gateway call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureClass {
    /// Already retried by the adapter; report and go back to the menu.
    Transient,
    /// Credential missing, expired or rejected; the operator must re-authenticate.
    Authentication,
    NotFound,
    Validation,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    #[error("the service rejected the credential ({status})")]
    Unauthorized { status: u16 },
    #[error("{resource} was not found")]
    NotFound { resource: String },
    #[error("the service rejected the request: {message}")]
    Validation { message: String },
    #[error("the service is temporarily unavailable: {message}")]
    Transient { code: &'static str, message: String },
    #[error("unexpected response from the service: {0}")]
    InvalidData(String),
    #[error("service is not configured: {0}")]
    NotConfigured(String),
}

impl GatewayError {
    pub fn class(&self) -> FailureClass {
        match self {
            Self::Unauthorized { .. } => FailureClass::Authentication,
            Self::NotFound { .. } => FailureClass::NotFound,
            Self::Validation { .. } | Self::InvalidData(_) | Self::NotConfigured(_) => {
                FailureClass::Validation
            }
            Self::Transient { .. } => FailureClass::Transient,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::Unauthorized { .. } => "CHAT_UNAUTHORIZED",
            Self::NotFound { .. } => "CHAT_NOT_FOUND",
            Self::Validation { .. } => "CHAT_REJECTED",
            Self::Transient { code, .. } => code,
            Self::InvalidData(_) => "CHAT_INVALID_RESPONSE",
            Self::NotConfigured(_) => "CHAT_NOT_CONFIGURED",
        }
    }
}

/// Remote identity service: provisions users and issues tokens.
pub trait IdentityGateway {
    fn create_user(&self) -> Result<UserId, GatewayError>;
    fn issue_token(&self, user: &UserId, scopes: &[TokenScope])
        -> Result<AccessToken, GatewayError>;
}

/// Remote chat service. Every call carries the credential it runs under, so
/// a token change in the session applies to the very next call.
pub trait ChatGateway {
    fn create_thread(
        &self,
        credential: &str,
        topic: &str,
        members: &[ThreadMember],
    ) -> Result<ChatThread, GatewayError>;

    fn add_members(
        &self,
        credential: &str,
        thread: &ThreadRef,
        members: &[ThreadMember],
    ) -> Result<(), GatewayError>;

    /// Returns the id the service assigned to the message.
    fn send_message(
        &self,
        credential: &str,
        thread: &ThreadRef,
        message: &OutgoingMessage,
    ) -> Result<String, GatewayError>;

    fn list_messages<'a>(&'a self, credential: &str, thread: &ThreadRef)
        -> Pages<'a, ChatMessage>;

    fn list_members<'a>(&'a self, credential: &str, thread: &ThreadRef)
        -> Pages<'a, ThreadMember>;

    fn list_threads<'a>(
        &'a self,
        credential: &str,
        since: chrono::DateTime<chrono::Utc>,
    ) -> Pages<'a, ThreadSummary>;
}

impl<T: IdentityGateway + ?Sized> IdentityGateway for &T {
    fn create_user(&self) -> Result<UserId, GatewayError> {
        (*self).create_user()
    }

    fn issue_token(
        &self,
        user: &UserId,
        scopes: &[TokenScope],
    ) -> Result<AccessToken, GatewayError> {
        (*self).issue_token(user, scopes)
    }
}

impl<T: ChatGateway + ?Sized> ChatGateway for &T {
    fn create_thread(
        &self,
        credential: &str,
        topic: &str,
        members: &[ThreadMember],
    ) -> Result<ChatThread, GatewayError> {
        (**self).create_thread(credential, topic, members)
    }

    fn add_members(
        &self,
        credential: &str,
        thread: &ThreadRef,
        members: &[ThreadMember],
    ) -> Result<(), GatewayError> {
        (**self).add_members(credential, thread, members)
    }

    fn send_message(
        &self,
        credential: &str,
        thread: &ThreadRef,
        message: &OutgoingMessage,
    ) -> Result<String, GatewayError> {
        (**self).send_message(credential, thread, message)
    }

    fn list_messages<'a>(&'a self, credential: &str, thread: &ThreadRef)
        -> Pages<'a, ChatMessage> {
        (**self).list_messages(credential, thread)
    }

    fn list_members<'a>(&'a self, credential: &str, thread: &ThreadRef)
        -> Pages<'a, ThreadMember> {
        (**self).list_members(credential, thread)
    }

    fn list_threads<'a>(
        &'a self,
        credential: &str,
        since: chrono::DateTime<chrono::Utc>,
    ) -> Pages<'a, ThreadSummary> {
        (**self).list_threads(credential, since)
    }
}
