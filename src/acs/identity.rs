use reqwest::Method;
use url::Url;

use super::{
    connection::ConnectionString,
    transport::{service_url, AcsTransport, Auth, RequestSpec},
    wire::{AccessTokenDto, CreateIdentityResponse, IssueTokenRequest},
};
use crate::{
    domain::identity::{AccessToken, TokenScope, UserId},
    usecases::contracts::{GatewayError, IdentityGateway},
};

/// Identity service adapter signed with the resource access key.
pub struct HttpIdentityGateway<'a> {
    transport: &'a AcsTransport,
    connection: Option<ConnectionString>,
    api_version: String,
}

impl<'a> HttpIdentityGateway<'a> {
    pub fn new(
        transport: &'a AcsTransport,
        connection: Option<ConnectionString>,
        api_version: impl Into<String>,
    ) -> Self {
        Self {
            transport,
            connection,
            api_version: api_version.into(),
        }
    }

    fn connection(&self) -> Result<&ConnectionString, GatewayError> {
        self.connection.as_ref().ok_or_else(|| {
            GatewayError::NotConfigured(
                "creating users needs service.connection_string or ACS_CONNECTION_STRING".into(),
            )
        })
    }

    fn url(
        &self,
        connection: &ConnectionString,
        segments: &[&str],
    ) -> Result<Url, GatewayError> {
        service_url(connection.endpoint(), segments, &self.api_version)
    }
}

impl IdentityGateway for HttpIdentityGateway<'_> {
    fn create_user(&self) -> Result<UserId, GatewayError> {
        let connection = self.connection()?;
        let url = self.url(connection, &["identities"])?;
        let spec =
            RequestSpec::new(Method::POST, url, "identity").json_body(&serde_json::json!({}))?;

        let response: CreateIdentityResponse =
            self.transport.send_json(&spec, &Auth::Hmac(connection))?;
        tracing::info!(user_id = %response.identity.id, "created communication user");
        Ok(UserId::new(response.identity.id))
    }

    fn issue_token(
        &self,
        user: &UserId,
        scopes: &[TokenScope],
    ) -> Result<AccessToken, GatewayError> {
        let connection = self.connection()?;
        let body = IssueTokenRequest {
            scopes: scopes.iter().map(|scope| scope.as_str()).collect(),
        };
        let spec = RequestSpec::new(
            Method::POST,
            self.url(connection, &["identities", user.as_str(), ":issueAccessToken"])?,
            format!("user {user}"),
        )
        .json_body(&body)?;

        let token: AccessTokenDto = self.transport.send_json(&spec, &Auth::Hmac(connection))?;
        tracing::info!(user_id = %user, expires_on = %token.expires_on, "issued access token");
        Ok(token.into())
    }
}
