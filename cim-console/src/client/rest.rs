use std::{fmt, sync::Arc, time::Duration};

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::{de::DeserializeOwned, Deserialize};
use tracing::{error, info, warn};
use url::Url;

use cim_slo::{errors, Result};

use super::RoleApi;
use crate::{
    config::ConsoleConfig,
    model::{PermPolicy, PermPolicyList, Role, RoleList, RoleParam},
    notify::Notifier,
};

const ROLES: [&str; 3] = ["api", "v1", "roles"];
const PERM_POLICIES: [&str; 3] = ["api", "v1", "perm_policies"];

/// REST client of the role api.
///
/// Every failed call goes through one interceptor that logs it and raises
/// an error message on the notifier before the error is returned, so
/// callers never have to report failures themselves.
#[derive(Clone)]
pub struct HttpRoleApi {
    endpoint: Url,
    token: Option<String>,
    client: Client,
    notifier: Arc<dyn Notifier>,
}

impl fmt::Debug for HttpRoleApi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpRoleApi")
            .field("endpoint", &self.endpoint)
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default, alias = "BusinessCode")]
    code: Option<serde_json::Value>,
    #[serde(alias = "Message")]
    message: String,
}

impl HttpRoleApi {
    pub fn new(
        config: &ConsoleConfig,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .build()
            .map_err(errors::any)?;
        Ok(Self {
            endpoint: config.endpoint.clone(),
            token: config.token.clone(),
            client,
            notifier,
        })
    }

    pub async fn list_roles(&self) -> Result<Vec<Role>> {
        let url = self.url(&ROLES)?;
        let list: Option<RoleList> = self.send(self.client.get(url)).await?;
        Ok(list.unwrap_or_default().roles)
    }

    pub async fn get_role(&self, name: &str) -> Result<Role> {
        self.list_roles()
            .await?
            .into_iter()
            .find(|role| role.name == name)
            .ok_or_else(|| errors::not_found(&format!("role {name}")))
    }

    pub async fn list_perm_policies(&self) -> Result<Vec<PermPolicy>> {
        let url = self.url(&PERM_POLICIES)?;
        let list: Option<PermPolicyList> =
            self.send(self.client.get(url)).await?;
        Ok(list.unwrap_or_default().policies)
    }

    fn url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.endpoint.clone();
        url.path_segments_mut()
            .map_err(|_| {
                errors::bad_request(&format!(
                    "endpoint {} cannot be a base url",
                    self.endpoint
                ))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Runs the request and hands back the body of a 2xx answer, `None`
    /// when it is blank. Every failure passes through [`Self::intercept`].
    async fn exchange(
        &self,
        builder: RequestBuilder,
    ) -> Result<Option<Vec<u8>>> {
        let builder = match self.token {
            Some(ref token) => builder.bearer_auth(token),
            None => builder,
        };
        let response = match builder.send().await {
            Ok(response) => response,
            Err(err) => {
                self.intercept(None, &err.to_string());
                return Err(errors::any(err));
            }
        };
        let status = response.status();
        let body = match response.bytes().await {
            Ok(body) => body,
            Err(err) => {
                self.intercept(Some(status), &err.to_string());
                return Err(errors::any(err));
            }
        };
        if status.is_success() {
            if body.iter().all(u8::is_ascii_whitespace) {
                return Ok(None);
            }
            return Ok(Some(body.to_vec()));
        }
        let message = error_message(status, &body);
        self.intercept(Some(status), &message);
        Err(errors::from_status(status, &message))
    }

    async fn send<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
    ) -> Result<Option<T>> {
        let Some(body) = self.exchange(builder).await? else {
            return Ok(None);
        };
        match serde_json::from_slice(&body) {
            Ok(value) => Ok(Some(value)),
            Err(err) => {
                self.intercept(None, &format!("unexpected response: {err}"));
                Err(errors::any(err))
            }
        }
    }

    /// Create and update succeed on any 2xx answer. A body that is not a
    /// role still means the server stored `param`, so the role is rebuilt
    /// from it; `null` and `false` count as an empty answer.
    async fn save(
        &self,
        builder: RequestBuilder,
        param: &RoleParam,
    ) -> Result<Option<Role>> {
        let Some(body) = self.exchange(builder).await? else {
            return Ok(None);
        };
        if let Ok(role) = serde_json::from_slice::<Role>(&body) {
            return Ok(Some(role));
        }
        match serde_json::from_slice::<serde_json::Value>(&body) {
            Ok(serde_json::Value::Null | serde_json::Value::Bool(false)) => {
                Ok(None)
            }
            _ => {
                warn!("role {} saved, answer is not a role", param.name);
                Ok(Some(param.to_role()))
            }
        }
    }

    fn intercept(&self, status: Option<StatusCode>, message: &str) {
        error!(status = ?status, "role api request failed: {}", message);
        self.notifier.error(message);
    }
}

fn error_message(status: StatusCode, body: &[u8]) -> String {
    if let Ok(body) = serde_json::from_slice::<ErrorBody>(body) {
        if !body.message.is_empty() {
            if let Some(code) = body.code {
                info!("business code {}", code);
            }
            return body.message;
        }
    }
    let text = String::from_utf8_lossy(body).trim().to_owned();
    if !text.is_empty() {
        return text;
    }
    status
        .canonical_reason()
        .unwrap_or("request failed")
        .to_owned()
}

#[async_trait]
impl RoleApi for HttpRoleApi {
    async fn create_role(&self, param: &RoleParam) -> Result<Option<Role>> {
        info!("create role {}", param.name);
        let url = self.url(&ROLES)?;
        self.save(self.client.post(url).json(param), param).await
    }

    async fn update_role(&self, param: &RoleParam) -> Result<Option<Role>> {
        info!("update role {}", param.name);
        let mut segments: Vec<&str> = ROLES.to_vec();
        segments.push(param.name.as_str());
        let url = self.url(&segments)?;
        self.save(self.client.put(url).json(param), param).await
    }
}
