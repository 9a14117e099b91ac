//! Typed client for the publishing ledger endpoints.
//!
//! # Responsibility
//! - Build document-scoped URLs and authentication headers.
//! - Check each response against its single expected status.
//! - Emit one metadata-only log event per call.
//!
//! # Invariants
//! - GET expects 200, DELETE expects 200, POST expects 202.
//! - Error values carry the phase they were raised in.

use crate::config::PublishingConfig;
use crate::model::content::ContentId;
use crate::publishing::error::{PublishingError, PublishingFailure, PublishingPhase};
use crate::publishing::records::{
    LicensorLedger, LicensorRemoval, PermissionRecord, RemoteRoleRecord, RoleKey,
};
use crate::publishing::transport::{HttpMethod, HttpRequest, HttpResponse, PublishingTransport};
use log::{error, info};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Instant;

const API_KEY_HEADER: &str = "X-API-Key";
const CONTENT_TYPE_HEADER: &str = "Content-Type";
const JSON_CONTENT_TYPE: &str = "application/json";

const STATUS_OK: u16 = 200;
const STATUS_ACCEPTED: u16 = 202;

/// Ledger resource under `contents/{id}/`.
#[derive(Debug, Clone, Copy)]
enum Resource {
    Roles,
    Licensors,
    Permissions,
}

impl Resource {
    fn as_str(self) -> &'static str {
        match self {
            Self::Roles => "roles",
            Self::Licensors => "licensors",
            Self::Permissions => "permissions",
        }
    }
}

/// Publishing client over an injected transport.
pub struct PublishingClient<T: PublishingTransport> {
    config: PublishingConfig,
    transport: T,
}

impl<T: PublishingTransport> PublishingClient<T> {
    pub fn new(config: PublishingConfig, transport: T) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> &PublishingConfig {
        &self.config
    }

    /// `GET contents/{id}/roles`.
    pub fn fetch_roles(&self, id: ContentId) -> Result<Vec<RemoteRoleRecord>, PublishingError> {
        let response = self.send(
            PublishingPhase::FetchFailed,
            HttpMethod::Get,
            id,
            Resource::Roles,
            None,
            STATUS_OK,
        )?;
        decode(PublishingPhase::FetchFailed, &response)
    }

    /// `DELETE contents/{id}/roles` with `[{uid, role}]`.
    pub fn delete_roles(&self, id: ContentId, keys: &[RoleKey]) -> Result<(), PublishingError> {
        let body = encode(PublishingPhase::DeleteFailed, &keys)?;
        self.send(
            PublishingPhase::DeleteFailed,
            HttpMethod::Delete,
            id,
            Resource::Roles,
            Some(body),
            STATUS_OK,
        )?;
        Ok(())
    }

    /// `POST contents/{id}/roles` with `[{uid, role, has_accepted}]`.
    pub fn post_roles(
        &self,
        id: ContentId,
        records: &[RemoteRoleRecord],
    ) -> Result<(), PublishingError> {
        let body = encode(PublishingPhase::PostFailed, &records)?;
        self.send(
            PublishingPhase::PostFailed,
            HttpMethod::Post,
            id,
            Resource::Roles,
            Some(body),
            STATUS_ACCEPTED,
        )?;
        Ok(())
    }

    /// `GET contents/{id}/licensors`.
    pub fn fetch_licensors(&self, id: ContentId) -> Result<LicensorLedger, PublishingError> {
        let response = self.send(
            PublishingPhase::FetchFailed,
            HttpMethod::Get,
            id,
            Resource::Licensors,
            None,
            STATUS_OK,
        )?;
        decode(PublishingPhase::FetchFailed, &response)
    }

    /// `DELETE contents/{id}/licensors` with `{licensors: [{uid}]}`.
    pub fn delete_licensors(
        &self,
        id: ContentId,
        removal: &LicensorRemoval,
    ) -> Result<(), PublishingError> {
        let body = encode(PublishingPhase::DeleteFailed, removal)?;
        self.send(
            PublishingPhase::DeleteFailed,
            HttpMethod::Delete,
            id,
            Resource::Licensors,
            Some(body),
            STATUS_OK,
        )?;
        Ok(())
    }

    /// `POST contents/{id}/licensors` with `{license_url, licensors}`.
    pub fn post_licensors(
        &self,
        id: ContentId,
        ledger: &LicensorLedger,
    ) -> Result<(), PublishingError> {
        let body = encode(PublishingPhase::PostFailed, ledger)?;
        self.send(
            PublishingPhase::PostFailed,
            HttpMethod::Post,
            id,
            Resource::Licensors,
            Some(body),
            STATUS_ACCEPTED,
        )?;
        Ok(())
    }

    /// `POST contents/{id}/permissions` with `[{uid, permission}]`.
    pub fn post_permissions(
        &self,
        id: ContentId,
        records: &[PermissionRecord],
    ) -> Result<(), PublishingError> {
        let body = encode(PublishingPhase::PostFailed, &records)?;
        self.send(
            PublishingPhase::PostFailed,
            HttpMethod::Post,
            id,
            Resource::Permissions,
            Some(body),
            STATUS_ACCEPTED,
        )?;
        Ok(())
    }

    fn send(
        &self,
        phase: PublishingPhase,
        method: HttpMethod,
        id: ContentId,
        resource: Resource,
        body: Option<String>,
        expected_status: u16,
    ) -> Result<HttpResponse, PublishingError> {
        let url = self
            .config
            .publishing_endpoint(&format!("contents/{id}/{}", resource.as_str()));
        let mut headers = Vec::new();
        if method != HttpMethod::Get {
            headers.push((API_KEY_HEADER.to_string(), self.config.api_key.clone()));
            headers.push((
                CONTENT_TYPE_HEADER.to_string(),
                JSON_CONTENT_TYPE.to_string(),
            ));
        }

        let started_at = Instant::now();
        let request = HttpRequest {
            method,
            url,
            headers,
            body,
        };
        let response = match self.transport.execute(request) {
            Ok(response) => response,
            Err(err) => {
                error!(
                    "event=publishing_call module=publishing status=error method={} resource={} content_id={} duration_ms={} error_code=transport_failed error={}",
                    method.as_str(),
                    resource.as_str(),
                    id,
                    started_at.elapsed().as_millis(),
                    err
                );
                return Err(PublishingError::new(
                    phase,
                    PublishingFailure::Transport(err.to_string()),
                ));
            }
        };

        if response.status != expected_status {
            error!(
                "event=publishing_call module=publishing status=error method={} resource={} content_id={} duration_ms={} http_status={} expected_status={} body_len={}",
                method.as_str(),
                resource.as_str(),
                id,
                started_at.elapsed().as_millis(),
                response.status,
                expected_status,
                response.body.len()
            );
            return Err(PublishingError::unexpected_status(
                phase,
                response.status,
                response.body,
            ));
        }

        info!(
            "event=publishing_call module=publishing status=ok method={} resource={} content_id={} duration_ms={} http_status={}",
            method.as_str(),
            resource.as_str(),
            id,
            started_at.elapsed().as_millis(),
            response.status
        );
        Ok(response)
    }
}

fn encode<B: Serialize + ?Sized>(phase: PublishingPhase, body: &B) -> Result<String, PublishingError> {
    serde_json::to_string(body).map_err(|err| {
        PublishingError::new(phase, PublishingFailure::MalformedBody(err.to_string()))
    })
}

fn decode<R: DeserializeOwned>(
    phase: PublishingPhase,
    response: &HttpResponse,
) -> Result<R, PublishingError> {
    serde_json::from_str(&response.body).map_err(|err| {
        PublishingError::new(phase, PublishingFailure::MalformedBody(err.to_string()))
    })
}
