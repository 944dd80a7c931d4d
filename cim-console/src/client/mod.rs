mod rest;

pub use rest::HttpRoleApi;

use async_trait::async_trait;
use mockall::automock;

use cim_slo::Result;

use crate::model::{Role, RoleParam};

/// Backend operations the role dialog submits to. A call resolves to the
/// stored role, or `None` when the server answered with an empty body.
#[automock]
#[async_trait]
pub trait RoleApi: Send + Sync {
    async fn create_role(&self, param: &RoleParam) -> Result<Option<Role>>;
    async fn update_role(&self, param: &RoleParam) -> Result<Option<Role>>;
}
