use std::fmt;

use crate::{
    dialog::{DialogState, Mode},
    field::{field_message, Field},
    i18n::{self, Translate},
    model::PermPolicy,
};

pub const DRAWER_WIDTH: u32 = 800;
pub const NAME_MAX_LENGTH: usize = 32;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct View {
    pub title: String,
    pub width: u32,
    pub name: Input,
    pub alias: Input,
    pub perm_policies: Select,
    pub cancel: Button,
    pub submit: Button,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Input {
    pub field: Field,
    pub label: String,
    pub placeholder: String,
    pub value: String,
    pub required: bool,
    pub disabled: bool,
    pub max_length: Option<usize>,
    pub span: u8,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Select {
    pub field: Field,
    pub label: String,
    pub required: bool,
    pub span: u8,
    pub options: Vec<SelectOption>,
    pub selected: Vec<String>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonKind {
    Secondary,
    Primary,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Button {
    pub kind: ButtonKind,
    pub label: String,
    pub loading: bool,
}

pub fn select_options(policies: &[PermPolicy]) -> Vec<SelectOption> {
    policies
        .iter()
        .map(|policy| SelectOption {
            value: policy.name.clone(),
            label: policy.label().to_owned(),
        })
        .collect()
}

/// Lays out the dialog for `state`; a hidden dialog renders nothing.
pub fn render<T: Translate>(
    state: &DialogState,
    perm_policies: &[PermPolicy],
    t: &T,
) -> Option<View> {
    if !state.visible() {
        return None;
    }
    let error = |field| {
        state
            .errors()
            .and_then(|errors| field_message(errors, field))
            .map(|message| t.translate(message).to_owned())
    };
    let fields = state.fields();
    let (title, action) = match state.mode() {
        Mode::Edit => (i18n::EDIT_ROLES, i18n::UPDATE),
        Mode::Create => (i18n::NEW_ROLES, i18n::CREATE),
    };
    Some(View {
        title: t.translate(title).to_owned(),
        width: DRAWER_WIDTH,
        name: Input {
            field: Field::Name,
            label: t.translate(i18n::NAME).to_owned(),
            placeholder: t.translate(i18n::PLEASE_ENTER).to_owned(),
            value: fields.name.clone(),
            required: true,
            disabled: !state.name_editable(),
            max_length: Some(NAME_MAX_LENGTH),
            span: 12,
            error: error(Field::Name),
        },
        alias: Input {
            field: Field::Alias,
            label: t.translate(i18n::ALIAS).to_owned(),
            placeholder: t.translate(i18n::PLEASE_ENTER).to_owned(),
            value: fields.alias.clone(),
            required: false,
            disabled: false,
            max_length: None,
            span: 12,
            error: error(Field::Alias),
        },
        perm_policies: Select {
            field: Field::PermPolicies,
            label: t.translate(i18n::PERM_POLICIES).to_owned(),
            required: true,
            span: 24,
            options: select_options(perm_policies),
            selected: fields.perm_policies.clone(),
            error: error(Field::PermPolicies),
        },
        cancel: Button {
            kind: ButtonKind::Secondary,
            label: t.translate(i18n::CANCEL).to_owned(),
            loading: false,
        },
        submit: Button {
            kind: ButtonKind::Primary,
            label: t.translate(action).to_owned(),
            loading: state.loading(),
        },
    })
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title)?;
        writeln!(f, "{}", "=".repeat(self.title.chars().count().max(8)))?;
        write!(f, "{}", self.name)?;
        write!(f, "{}", self.alias)?;
        write!(f, "{}", self.perm_policies)?;
        write!(f, "{}  {}", self.cancel, self.submit)
    }
}

impl fmt::Display for Input {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let marker = if self.required { " *" } else { "" };
        let value = if self.value.is_empty() {
            format!("<{}>", self.placeholder)
        } else {
            self.value.clone()
        };
        let lock = if self.disabled { " (locked)" } else { "" };
        writeln!(f, "{}{}: {}{}", self.label, marker, value, lock)?;
        if let Some(ref error) = self.error {
            writeln!(f, "  ! {}", error)?;
        }
        Ok(())
    }
}

impl fmt::Display for Select {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let marker = if self.required { " *" } else { "" };
        writeln!(f, "{}{}:", self.label, marker)?;
        for option in &self.options {
            let mark = if self.selected.contains(&option.value) {
                "x"
            } else {
                " "
            };
            writeln!(f, "  [{}] {} ({})", mark, option.label, option.value)?;
        }
        // tag mode accepts names outside the offered list
        for value in &self.selected {
            if !self.options.iter().any(|o| &o.value == value) {
                writeln!(f, "  [x] {}", value)?;
            }
        }
        if let Some(ref error) = self.error {
            writeln!(f, "  ! {}", error)?;
        }
        Ok(())
    }
}

impl fmt::Display for Button {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.kind, self.loading) {
            (ButtonKind::Primary, true) => write!(f, "[[ {} ... ]]", self.label),
            (ButtonKind::Primary, false) => write!(f, "[[ {} ]]", self.label),
            (ButtonKind::Secondary, _) => write!(f, "[ {} ]", self.label),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{dialog::Action, i18n::Locale, model::Role};

    fn policies() -> Vec<PermPolicy> {
        vec![
            PermPolicy {
                name: "p1".to_owned(),
                alias: Some("Policy 1".to_owned()),
            },
            PermPolicy {
                name: "p2".to_owned(),
                alias: None,
            },
        ]
    }

    #[test]
    fn create_layout() {
        let state = DialogState::mount(Mode::Create, true, None);
        let view = render(&state, &policies(), &Locale::En).unwrap();
        assert_eq!(view.title, "New Roles");
        assert_eq!(view.width, 800);
        assert!(!view.name.disabled);
        assert_eq!(view.name.max_length, Some(32));
        assert_eq!((view.name.span, view.alias.span), (12, 12));
        assert_eq!(view.perm_policies.span, 24);
        assert_eq!(
            view.perm_policies.options,
            vec![
                SelectOption {
                    value: "p1".to_owned(),
                    label: "Policy 1".to_owned(),
                },
                SelectOption {
                    value: "p2".to_owned(),
                    label: "p2".to_owned(),
                },
            ]
        );
        assert_eq!(view.cancel.label, "Cancel");
        assert_eq!(view.submit.label, "Create");
        assert!(!view.submit.loading);
    }

    #[test]
    fn edit_layout_locks_name() {
        let role = Role {
            name: "admin".to_owned(),
            alias: Some("Admin".to_owned()),
            perm_policies: vec![PermPolicy {
                name: "p1".to_owned(),
                alias: None,
            }],
        };
        let state = DialogState::mount(Mode::Edit, true, Some(&role));
        let view = render(&state, &policies(), &Locale::Zh).unwrap();
        assert_eq!(view.title, "编辑角色");
        assert_eq!(view.submit.label, "更新");
        assert!(view.name.disabled);
        assert_eq!(view.name.value, "admin");
        assert_eq!(view.alias.value, "Admin");
        assert_eq!(view.perm_policies.selected, vec!["p1".to_owned()]);

        let (state, _) = state.reduce(Action::Submit);
        let view = render(&state, &policies(), &Locale::Zh).unwrap();
        assert!(view.submit.loading);
        assert!(view.to_string().contains("[[ 更新 ... ]]"));
    }

    #[test]
    fn errors_render_inline() {
        let state = DialogState::mount(Mode::Create, true, None);
        let (state, _) = state.reduce(Action::EditAlias("a".to_owned()));
        let (state, _) = state.reduce(Action::Submit);
        let view = render(&state, &policies(), &Locale::En).unwrap();
        assert_eq!(
            view.name.error.as_deref(),
            Some("Please enter a roles name")
        );
        assert_eq!(
            view.alias.error.as_deref(),
            Some("Enter a string of 2 to 64 characters.")
        );
        assert_eq!(
            view.perm_policies.error.as_deref(),
            Some("Please select permPolicies")
        );
        let text = view.to_string();
        assert!(text.contains("Name *: <Please enter>"));
        assert!(text.contains("  ! Please select permPolicies"));
    }

    #[test]
    fn hidden_renders_nothing() {
        let state = DialogState::mount(Mode::Create, false, None);
        assert!(render(&state, &policies(), &Locale::En).is_none());
    }
}
