use std::{fmt, mem, sync::Arc};

use tokio::sync::watch;
use tracing::{debug, info};

use cim_slo::errors::WithBacktrace;

use crate::{
    client::RoleApi,
    dialog::{Action, DialogState, Effect, Mode, Operation, Outcome},
    i18n::{Locale, Translate},
    model::{PermPolicy, Role},
    notify::Notifier,
    view::{self, View},
};

/// What the parent hands to the dialog when mounting it.
pub struct Props {
    pub visible: bool,
    pub is_edit_role: bool,
    pub edit_role_item: Option<Role>,
    pub perm_policies: Vec<PermPolicy>,
    pub on_create: Box<dyn FnMut() + Send>,
    pub on_close_create: Box<dyn FnMut() + Send>,
}

impl fmt::Debug for Props {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Props")
            .field("visible", &self.visible)
            .field("is_edit_role", &self.is_edit_role)
            .field("edit_role_item", &self.edit_role_item)
            .field("perm_policies", &self.perm_policies)
            .finish_non_exhaustive()
    }
}

/// How a call to [`RoleDialog::submit`] ended.
#[derive(Debug)]
pub enum Submission {
    /// Hidden, disposed, or a request was already in flight.
    Ignored,
    /// Validation failed; the errors are on the state.
    Invalid,
    Saved(Role),
    /// The server accepted the request but sent nothing back.
    Empty,
    Failed(WithBacktrace),
    /// The dialog was closed while the request was in flight.
    Aborted,
}

/// Ends the dialog's lifetime from outside, e.g. when the parent unmounts
/// it while a request is still pending.
#[derive(Debug, Clone)]
pub struct CloseHandle {
    tx: Arc<watch::Sender<bool>>,
}

impl CloseHandle {
    pub fn close(&self) {
        self.tx.send_replace(true);
    }
}

pub struct RoleDialog<A, N> {
    state: DialogState,
    perm_policies: Vec<PermPolicy>,
    api: A,
    notifier: N,
    locale: Locale,
    on_create: Box<dyn FnMut() + Send>,
    on_close_create: Box<dyn FnMut() + Send>,
    lifetime: Arc<watch::Sender<bool>>,
}

impl<A, N> fmt::Debug for RoleDialog<A, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RoleDialog")
            .field("state", &self.state)
            .field("perm_policies", &self.perm_policies)
            .field("locale", &self.locale)
            .finish_non_exhaustive()
    }
}

impl<A, N> RoleDialog<A, N>
where
    A: RoleApi,
    N: Notifier,
{
    pub fn mount(props: Props, api: A, notifier: N, locale: Locale) -> Self {
        let mode = Mode::from_flag(props.is_edit_role);
        let state = DialogState::mount(
            mode,
            props.visible,
            props.edit_role_item.as_ref(),
        );
        debug!("mount role dialog in {:?} mode", mode);
        let (tx, _) = watch::channel(false);
        Self {
            state,
            perm_policies: props.perm_policies,
            api,
            notifier,
            locale,
            on_create: props.on_create,
            on_close_create: props.on_close_create,
            lifetime: Arc::new(tx),
        }
    }

    pub fn state(&self) -> &DialogState {
        &self.state
    }

    pub fn view(&self) -> Option<View> {
        view::render(&self.state, &self.perm_policies, &self.locale)
    }

    pub fn closer(&self) -> CloseHandle {
        CloseHandle {
            tx: Arc::clone(&self.lifetime),
        }
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.dispatch(Action::SetVisible(visible));
    }

    pub fn edit_name(&mut self, name: impl Into<String>) {
        self.dispatch(Action::EditName(name.into()));
    }

    pub fn edit_alias(&mut self, alias: impl Into<String>) {
        self.dispatch(Action::EditAlias(alias.into()));
    }

    pub fn select_policies<I, S>(&mut self, policies: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let policies = policies.into_iter().map(Into::into).collect();
        self.dispatch(Action::SelectPolicies(policies));
    }

    pub fn cancel(&mut self) {
        self.dispatch(Action::Cancel);
    }

    pub fn dispose(&mut self) {
        self.lifetime.send_replace(true);
        self.dispatch(Action::Dispose);
    }

    pub async fn submit(&mut self) -> Submission {
        let ready = self.state.visible()
            && !self.state.loading()
            && !self.state.is_disposed()
            && !*self.lifetime.borrow();
        let request = self.dispatch(Action::Submit).into_iter().find_map(
            |effect| match effect {
                Effect::Request {
                    ticket,
                    operation,
                    param,
                } => Some((ticket, operation, param)),
                _ => None,
            },
        );
        let (ticket, operation, param) = match request {
            Some(request) => request,
            None if ready => return Submission::Invalid,
            None => return Submission::Ignored,
        };

        let mut closed = self.lifetime.subscribe();
        info!("submit role {} ({:?})", param.name, operation);
        let call = async {
            match operation {
                Operation::Create => self.api.create_role(&param).await,
                Operation::Update => self.api.update_role(&param).await,
            }
        };
        let result = tokio::select! {
            result = call => Some(result),
            _ = closed.wait_for(|closed| *closed) => None,
        };

        match result {
            None => {
                debug!("role dialog closed, dropping ticket {}", ticket);
                self.dispatch(Action::Dispose);
                Submission::Aborted
            }
            Some(Ok(role)) => {
                self.dispatch(Action::Settled {
                    ticket,
                    outcome: Outcome::Succeeded(role.clone()),
                });
                match role {
                    Some(role) => Submission::Saved(role),
                    None => Submission::Empty,
                }
            }
            // reporting is left to the api's interceptor
            Some(Err(err)) => {
                self.dispatch(Action::Settled {
                    ticket,
                    outcome: Outcome::Failed,
                });
                Submission::Failed(err)
            }
        }
    }

    fn dispatch(&mut self, action: Action) -> Vec<Effect> {
        let mut state = mem::take(&mut self.state);
        if *self.lifetime.borrow() {
            state = state.reduce(Action::Dispose).0;
        }
        let (state, effects) = state.reduce(action);
        self.state = state;
        let mut requests = Vec::new();
        for effect in effects {
            match effect {
                Effect::Notify(key) => {
                    self.notifier.success(self.locale.translate(key))
                }
                Effect::Completed => (self.on_create)(),
                Effect::Closed => (self.on_close_create)(),
                request @ Effect::Request { .. } => requests.push(request),
            }
        }
        requests
    }
}
