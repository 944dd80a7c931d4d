//! State container of the role dialog.
//!
//! [`DialogState::reduce`] is the only way the state changes: it consumes
//! the state and an [`Action`] and hands back the next state together with
//! the [`Effect`]s the caller has to run. Every request is tagged with a
//! ticket; a settlement carrying any other ticket, or arriving after the
//! dialog was disposed, leaves the state untouched.

use tracing::{debug, warn};
use validator::ValidationErrors;

use crate::{
    field::RoleFields,
    i18n,
    model::{Role, RoleParam},
};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    #[default]
    Create,
    Edit,
}

impl Mode {
    pub fn from_flag(is_edit_role: bool) -> Self {
        if is_edit_role {
            Self::Edit
        } else {
            Self::Create
        }
    }

    pub fn operation(self) -> Operation {
        match self {
            Self::Create => Operation::Create,
            Self::Edit => Operation::Update,
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    #[default]
    Idle,
    Submitting {
        ticket: u64,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Create,
    Update,
}

impl Operation {
    pub fn success_message(self) -> &'static str {
        match self {
            Self::Create => i18n::CREATE_ROLE_SUCCESS,
            Self::Update => i18n::UPDATE_ROLE_SUCCESS,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// The call succeeded; `None` when the server answered with no body.
    Succeeded(Option<Role>),
    Failed,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    SetVisible(bool),
    EditName(String),
    EditAlias(String),
    SelectPolicies(Vec<String>),
    Submit,
    Settled { ticket: u64, outcome: Outcome },
    Cancel,
    Dispose,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Request {
        ticket: u64,
        operation: Operation,
        param: RoleParam,
    },
    Notify(&'static str),
    Completed,
    Closed,
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct DialogState {
    mode: Mode,
    visible: bool,
    fields: RoleFields,
    errors: Option<ValidationErrors>,
    phase: Phase,
    next_ticket: u64,
    disposed: bool,
}

impl DialogState {
    /// State right after mount. In edit mode the fields are seeded from
    /// `edit_role_item`.
    pub fn mount(
        mode: Mode,
        visible: bool,
        edit_role_item: Option<&Role>,
    ) -> Self {
        let fields = match mode {
            Mode::Edit => RoleFields::initialize(edit_role_item),
            Mode::Create => RoleFields::default(),
        };
        Self {
            mode,
            visible,
            fields,
            ..Default::default()
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn visible(&self) -> bool {
        self.visible
    }

    pub fn fields(&self) -> &RoleFields {
        &self.fields
    }

    pub fn errors(&self) -> Option<&ValidationErrors> {
        self.errors.as_ref()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn loading(&self) -> bool {
        matches!(self.phase, Phase::Submitting { .. })
    }

    pub fn name_editable(&self) -> bool {
        self.mode == Mode::Create
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    pub fn reduce(mut self, action: Action) -> (Self, Vec<Effect>) {
        if self.disposed {
            debug!("dialog disposed, dropping {:?}", action);
            return (self, Vec::new());
        }
        let effects = match action {
            Action::SetVisible(visible) => {
                self.visible = visible;
                Vec::new()
            }
            Action::EditName(name) => {
                if self.name_editable() {
                    self.fields.name = name;
                    self.revalidate();
                }
                Vec::new()
            }
            Action::EditAlias(alias) => {
                self.fields.alias = alias;
                self.revalidate();
                Vec::new()
            }
            Action::SelectPolicies(policies) => {
                self.fields.perm_policies = policies;
                self.revalidate();
                Vec::new()
            }
            Action::Submit => self.submit(),
            Action::Settled { ticket, outcome } => self.settle(ticket, outcome),
            Action::Cancel => vec![Effect::Closed],
            Action::Dispose => {
                self.disposed = true;
                self.phase = Phase::Idle;
                Vec::new()
            }
        };
        (self, effects)
    }

    // errors shown after a rejected submit follow later edits
    fn revalidate(&mut self) {
        if self.errors.is_some() {
            self.errors = self.fields.validate().err();
        }
    }

    fn submit(&mut self) -> Vec<Effect> {
        if !self.visible {
            return Vec::new();
        }
        if let Phase::Submitting { ticket } = self.phase {
            debug!("submit ignored, ticket {} in flight", ticket);
            return Vec::new();
        }
        match self.fields.validate() {
            Err(errors) => {
                debug!("role form rejected: {}", errors);
                self.errors = Some(errors);
                Vec::new()
            }
            Ok(param) => {
                self.errors = None;
                let ticket = self.next_ticket;
                self.next_ticket += 1;
                self.phase = Phase::Submitting { ticket };
                vec![Effect::Request {
                    ticket,
                    operation: self.mode.operation(),
                    param,
                }]
            }
        }
    }

    fn settle(&mut self, ticket: u64, outcome: Outcome) -> Vec<Effect> {
        if self.phase != (Phase::Submitting { ticket }) {
            warn!("stale response for ticket {} dropped", ticket);
            return Vec::new();
        }
        self.phase = Phase::Idle;
        match outcome {
            Outcome::Succeeded(Some(_)) => vec![
                Effect::Notify(self.mode.operation().success_message()),
                Effect::Completed,
            ],
            Outcome::Succeeded(None) | Outcome::Failed => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{field::Field, model::PermPolicy};

    fn admin() -> Role {
        Role {
            name: "admin".to_owned(),
            alias: Some("Admin".to_owned()),
            perm_policies: vec![PermPolicy {
                name: "p1".to_owned(),
                alias: None,
            }],
        }
    }

    fn filled() -> DialogState {
        let state = DialogState::mount(Mode::Create, true, None);
        let (state, _) = state.reduce(Action::EditName("viewer".to_owned()));
        let (state, _) = state.reduce(Action::EditAlias("Viewer".to_owned()));
        let (state, _) = state.reduce(Action::SelectPolicies(vec![
            "p1".to_owned(),
            "p2".to_owned(),
        ]));
        state
    }

    #[test]
    fn edit_mode_prefills_and_locks_name() {
        let role = admin();
        let state = DialogState::mount(Mode::Edit, true, Some(&role));
        assert_eq!(state.fields().name, "admin");
        assert_eq!(state.fields().alias, "Admin");
        assert_eq!(state.fields().perm_policies, vec!["p1".to_owned()]);
        assert!(!state.name_editable());

        let (state, effects) =
            state.reduce(Action::EditName("other".to_owned()));
        assert!(effects.is_empty());
        assert_eq!(state.fields().name, "admin");
    }

    #[test]
    fn create_mode_ignores_edit_item() {
        let role = admin();
        let state = DialogState::mount(Mode::Create, true, Some(&role));
        assert_eq!(state.fields(), &RoleFields::default());
    }

    #[test]
    fn submit_valid_form_requests_create() {
        let (state, effects) = filled().reduce(Action::Submit);
        assert!(state.loading());
        assert_eq!(
            effects,
            vec![Effect::Request {
                ticket: 0,
                operation: Operation::Create,
                param: RoleParam {
                    name: "viewer".to_owned(),
                    alias: Some("Viewer".to_owned()),
                    perm_policies: vec!["p1".to_owned(), "p2".to_owned()],
                },
            }]
        );
    }

    #[test]
    fn submit_invalid_form_is_blocked() {
        let state = DialogState::mount(Mode::Create, true, None);
        let (state, effects) = state.reduce(Action::Submit);
        assert!(effects.is_empty());
        assert!(!state.loading());
        assert!(state.errors().is_some());

        // errors follow edits once shown
        let (state, _) = state.reduce(Action::EditName("viewer".to_owned()));
        let errors = state.errors().unwrap();
        assert!(crate::field::field_message(errors, Field::Name).is_none());
        assert!(
            crate::field::field_message(errors, Field::PermPolicies).is_some()
        );
    }

    #[test]
    fn submit_while_submitting_is_ignored() {
        let (state, _) = filled().reduce(Action::Submit);
        let (state, effects) = state.reduce(Action::Submit);
        assert!(effects.is_empty());
        assert_eq!(state.phase(), Phase::Submitting { ticket: 0 });
    }

    #[test]
    fn hidden_dialog_does_not_submit() {
        let (state, _) = filled().reduce(Action::SetVisible(false));
        let (state, effects) = state.reduce(Action::Submit);
        assert!(effects.is_empty());
        assert!(!state.loading());
    }

    #[test]
    fn success_notifies_and_completes() {
        let (state, _) = filled().reduce(Action::Submit);
        let (state, effects) = state.reduce(Action::Settled {
            ticket: 0,
            outcome: Outcome::Succeeded(Some(Role::default())),
        });
        assert!(!state.loading());
        assert_eq!(
            effects,
            vec![Effect::Notify(i18n::CREATE_ROLE_SUCCESS), Effect::Completed]
        );
    }

    #[test]
    fn update_success_message() {
        let role = admin();
        let state = DialogState::mount(Mode::Edit, true, Some(&role));
        let (state, effects) = state.reduce(Action::Submit);
        assert!(matches!(
            effects[0],
            Effect::Request {
                operation: Operation::Update,
                ..
            }
        ));
        let (_, effects) = state.reduce(Action::Settled {
            ticket: 0,
            outcome: Outcome::Succeeded(Some(role)),
        });
        assert_eq!(effects[0], Effect::Notify(i18n::UPDATE_ROLE_SUCCESS));
    }

    #[test]
    fn empty_success_only_clears_loading() {
        let (state, _) = filled().reduce(Action::Submit);
        let (state, effects) = state.reduce(Action::Settled {
            ticket: 0,
            outcome: Outcome::Succeeded(None),
        });
        assert!(effects.is_empty());
        assert!(!state.loading());
    }

    #[test]
    fn failure_keeps_values() {
        let before = filled();
        let (state, _) = before.clone().reduce(Action::Submit);
        let (state, effects) = state.reduce(Action::Settled {
            ticket: 0,
            outcome: Outcome::Failed,
        });
        assert!(effects.is_empty());
        assert!(!state.loading());
        assert_eq!(state.fields(), before.fields());

        // a second attempt gets a fresh ticket
        let (_, effects) = state.reduce(Action::Submit);
        assert!(matches!(effects[0], Effect::Request { ticket: 1, .. }));
    }

    #[test]
    fn stale_and_disposed_settlements_are_dropped() {
        let (state, _) = filled().reduce(Action::Submit);
        let (state, effects) = state.reduce(Action::Settled {
            ticket: 7,
            outcome: Outcome::Succeeded(Some(Role::default())),
        });
        assert!(effects.is_empty());
        assert!(state.loading());

        let (state, _) = state.reduce(Action::Dispose);
        assert!(state.is_disposed());
        let (state, effects) = state.reduce(Action::Settled {
            ticket: 0,
            outcome: Outcome::Succeeded(Some(Role::default())),
        });
        assert!(effects.is_empty());
        assert!(!state.loading());
    }

    #[test]
    fn cancel_closes_without_confirmation() {
        let (state, effects) = filled().reduce(Action::Cancel);
        assert_eq!(effects, vec![Effect::Closed]);
        assert_eq!(state.fields().name, "viewer");
    }
}
