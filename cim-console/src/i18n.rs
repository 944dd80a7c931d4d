use serde::Deserialize;

pub const EDIT_ROLES: &str = "Edit Roles";
pub const NEW_ROLES: &str = "New Roles";
pub const NAME: &str = "Name";
pub const ALIAS: &str = "Alias";
pub const PERM_POLICIES: &str = "PermPolicies";
pub const PLEASE_ENTER: &str = "Please enter";
pub const CANCEL: &str = "Cancel";
pub const CREATE: &str = "Create";
pub const UPDATE: &str = "Update";
pub const CREATE_ROLE_SUCCESS: &str = "Create role success";
pub const UPDATE_ROLE_SUCCESS: &str = "Update role success";
pub const ENTER_ROLE_NAME: &str = "Please enter a roles name";
pub const ALIAS_LENGTH: &str = "Enter a string of 2 to 64 characters.";
pub const SELECT_PERM_POLICIES: &str = "Please select permPolicies";

pub trait Translate {
    /// Returns the text for `key`, or `key` itself when there is none.
    fn translate<'a>(&self, key: &'a str) -> &'a str;
}

#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Zh,
}

impl Translate for Locale {
    fn translate<'a>(&self, key: &'a str) -> &'a str {
        match self {
            Self::En => key,
            Self::Zh => zh(key).unwrap_or(key),
        }
    }
}

fn zh(key: &str) -> Option<&'static str> {
    let text = match key {
        EDIT_ROLES => "编辑角色",
        NEW_ROLES => "新增角色",
        NAME => "名称",
        ALIAS => "别名",
        PERM_POLICIES => "权限策略",
        PLEASE_ENTER => "请输入",
        CANCEL => "取消",
        CREATE => "创建",
        UPDATE => "更新",
        CREATE_ROLE_SUCCESS => "创建角色成功",
        UPDATE_ROLE_SUCCESS => "更新角色成功",
        ENTER_ROLE_NAME => "请输入角色名称",
        ALIAS_LENGTH => "请输入2到64个字符。",
        SELECT_PERM_POLICIES => "请选择权限策略",
        _ => return None,
    };
    Some(text)
}
