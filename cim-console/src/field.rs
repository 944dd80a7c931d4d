//! Field values of the role dialog and the rules they are checked against.
//!
//! Rules are declared once in [`RULES`] and evaluated in order; the first
//! failing rule of a field is the only error reported for it.

use std::{borrow::Cow, fmt};

use validator::{ValidationError, ValidationErrors, ValidationErrorsKind};

use cim_slo::regexp::check_name;

use crate::{
    i18n,
    model::{Role, RoleParam},
};

pub const ALIAS_MIN_LENGTH: usize = 2;
pub const ALIAS_MAX_LENGTH: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Name,
    Alias,
    PermPolicies,
}

impl Field {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Alias => "alias",
            Self::PermPolicies => "permPolicies",
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RoleFields {
    pub name: String,
    pub alias: String,
    pub perm_policies: Vec<String>,
}

#[derive(Clone, Copy)]
pub struct Rule {
    pub field: Field,
    pub code: &'static str,
    pub check: fn(&RoleFields) -> bool,
    pub message: &'static str,
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("field", &self.field)
            .field("code", &self.code)
            .field("message", &self.message)
            .finish()
    }
}

impl Rule {
    fn error(&self) -> ValidationError {
        let mut err = ValidationError::new(self.code);
        err.message = Some(Cow::Borrowed(self.message));
        err
    }
}

pub const RULES: &[Rule] = &[
    Rule {
        field: Field::Name,
        code: "required",
        check: name_present,
        message: i18n::ENTER_ROLE_NAME,
    },
    Rule {
        field: Field::Name,
        code: "pattern",
        check: name_matches,
        message: i18n::ENTER_ROLE_NAME,
    },
    Rule {
        field: Field::Alias,
        code: "length",
        check: alias_in_bounds,
        message: i18n::ALIAS_LENGTH,
    },
    Rule {
        field: Field::PermPolicies,
        code: "required",
        check: policies_selected,
        message: i18n::SELECT_PERM_POLICIES,
    },
];

fn name_present(fields: &RoleFields) -> bool {
    !fields.name.is_empty()
}

fn name_matches(fields: &RoleFields) -> bool {
    check_name(&fields.name).is_ok()
}

fn alias_in_bounds(fields: &RoleFields) -> bool {
    if fields.alias.is_empty() {
        return true;
    }
    let len = fields.alias.chars().count();
    (ALIAS_MIN_LENGTH..=ALIAS_MAX_LENGTH).contains(&len)
}

fn policies_selected(fields: &RoleFields) -> bool {
    !selected_policies(&fields.perm_policies).is_empty()
}

// trimmed, non-empty, first occurrence wins
fn selected_policies(policies: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(policies.len());
    for policy in policies.iter().map(|p| p.trim()) {
        if policy.is_empty() || out.iter().any(|p| p == policy) {
            continue;
        }
        out.push(policy.to_owned());
    }
    out
}

impl RoleFields {
    /// Seeds the fields from an existing role, or leaves them empty.
    pub fn initialize(values: Option<&Role>) -> Self {
        match values {
            Some(role) => Self {
                name: role.name.clone(),
                alias: role.alias.clone().unwrap_or_default(),
                perm_policies: role
                    .perm_policies
                    .iter()
                    .map(|p| p.name.clone())
                    .collect(),
            },
            None => Self::default(),
        }
    }

    pub fn validate(&self) -> Result<RoleParam, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let mut failed: Vec<Field> = Vec::new();
        for rule in RULES {
            if failed.contains(&rule.field) {
                continue;
            }
            if !(rule.check)(self) {
                failed.push(rule.field);
                errors.add(rule.field.as_str(), rule.error());
            }
        }
        if !failed.is_empty() {
            return Err(errors);
        }
        Ok(RoleParam {
            name: self.name.clone(),
            alias: if self.alias.is_empty() {
                None
            } else {
                Some(self.alias.clone())
            },
            perm_policies: selected_policies(&self.perm_policies),
        })
    }
}

/// Message of the first error recorded for `field`.
pub fn field_message(errors: &ValidationErrors, field: Field) -> Option<&str> {
    match errors.errors().get(field.as_str()) {
        Some(ValidationErrorsKind::Field(errs)) => {
            errs.first().and_then(|e| e.message.as_deref())
        }
        _ => None,
    }
}
