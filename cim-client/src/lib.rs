use anyhow::{bail, Result};
use clap::Args;
use thiserror::Error;
use tracing::warn;

use cim_console::{model::Role, Notifier, RoleApi, RoleDialog, Submission};
use cim_slo::errors::{self, WithBacktrace};

pub fn version() -> String {
    format!("cimctl {}", env!("CARGO_PKG_VERSION"))
}

/// Values typed into the role dialog from the command line.
#[derive(Args, Debug, Clone, Default)]
pub struct RoleArgs {
    /// Role name; locked when updating
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub alias: Option<String>,
    /// Permission policy name, repeat for several
    #[arg(long = "policy")]
    pub policies: Vec<String>,
}

/// Prints toasts on the terminal.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn success(&self, message: &str) {
        println!("{message}");
    }

    fn error(&self, message: &str) {
        eprintln!("error: {message}");
    }
}

/// A failed save the api interceptor has already shown to the user.
#[derive(Debug, Error)]
#[error("could not save role")]
pub struct Reported(#[source] pub WithBacktrace);

/// Types `args` into the dialog and presses the primary button.
pub async fn apply<A, N>(
    dialog: &mut RoleDialog<A, N>,
    args: &RoleArgs,
) -> Result<Option<Role>>
where
    A: RoleApi,
    N: Notifier,
{
    if let Some(ref name) = args.name {
        dialog.edit_name(name.as_str());
    }
    if let Some(ref alias) = args.alias {
        dialog.edit_alias(alias.as_str());
    }
    if !args.policies.is_empty() {
        dialog.select_policies(args.policies.iter().map(String::as_str));
    }
    match dialog.submit().await {
        Submission::Saved(role) => Ok(Some(role)),
        Submission::Empty => {
            warn!("role saved but the server returned no body");
            Ok(None)
        }
        Submission::Invalid => {
            if let Some(view) = dialog.view() {
                eprintln!("{view}");
            }
            let errs = dialog.state().errors().cloned().unwrap_or_default();
            Err(errors::validates(errs).into())
        }
        Submission::Failed(err) => Err(Reported(err).into()),
        Submission::Ignored | Submission::Aborted => {
            bail!("role dialog is closed")
        }
    }
}
