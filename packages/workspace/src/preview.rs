//! Request for the contract renderer. Rendering itself happens elsewhere;
//! this side only builds the request and the URL that carries it.

use contractform_document::{Document, Value};
use contractform_sync::{Credentials, IdentityState};
use serde::{Deserialize, Serialize};

use crate::errors::{Result, WorkspaceError};

/// Renderer path used by the hosted form
pub const DEFAULT_PREVIEW_ENDPOINT: &str = "/render-contract";

/// Query parameter holding the JSON request
pub const REQUEST_PARAM: &str = "renderContractRequest";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewAuthentication {
    pub owner_id: String,
    pub token: String,
}

impl From<&Credentials> for PreviewAuthentication {
    fn from(credentials: &Credentials) -> Self {
        Self {
            owner_id: credentials.owner_id.clone(),
            token: credentials.token.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreviewOptions {
    pub flatten_pdf: bool,
}

impl Default for PreviewOptions {
    fn default() -> Self {
        Self { flatten_pdf: true }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewRequest {
    pub contract_data: Value,
    pub authentication: Option<PreviewAuthentication>,
    pub options: PreviewOptions,
}

impl PreviewRequest {
    pub fn new(document: &Document, identity: &IdentityState) -> Self {
        Self {
            contract_data: document.body.clone(),
            authentication: identity.credentials().map(PreviewAuthentication::from),
            options: PreviewOptions::default(),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(WorkspaceError::Encode)
    }

    /// `<endpoint>?renderContractRequest=<url-encoded JSON>`
    pub fn url(&self, endpoint: &str) -> Result<String> {
        let json = self.to_json()?;
        Ok(format!("{endpoint}?{REQUEST_PARAM}={}", urlencoding::encode(&json)))
    }
}
