use std::{process::ExitCode, sync::Arc};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cim_client::{apply, version, ConsoleNotifier, Reported, RoleArgs};
use cim_console::{
    load, ConsoleConfig, HttpRoleApi, Notifier, Props, RoleDialog,
};

#[derive(Debug, Parser)]
#[command(name = "cimctl")]
#[command(author, about, long_about = None)]
struct Cli {
    /// Read the settings from a toml file instead of flags
    #[arg(short = 'c', long)]
    config: Option<String>,
    #[command(flatten)]
    console: ConsoleConfig,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    #[command(subcommand)]
    Role(RoleCommands),
    #[command(short_flag = 'v')]
    Version,
}

#[derive(Debug, Subcommand)]
enum RoleCommands {
    /// Fill the "New Roles" dialog and create the role
    Create(RoleArgs),
    /// Open the "Edit Roles" dialog for --name and update it
    Update(RoleArgs),
    /// Print the dialog without submitting it
    Form {
        /// Name of the role to edit
        #[arg(long)]
        edit: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    let config = match cli.config {
        Some(ref path) => load(path)?,
        None => cli.console.clone(),
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.rust_log))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    debug!("{:#?}", &config);
    match cli.command {
        Commands::Role(command) => match run_role(config, command).await {
            // already printed by the notifier
            Err(err) if err.is::<Reported>() => {
                debug!("{:?}", err);
                Ok(ExitCode::FAILURE)
            }
            result => result.map(|()| ExitCode::SUCCESS),
        },
        Commands::Version => {
            println!("{}", version());
            Ok(ExitCode::SUCCESS)
        }
    }
}

async fn run_role(config: ConsoleConfig, command: RoleCommands) -> Result<()> {
    let notifier: Arc<dyn Notifier> = Arc::new(ConsoleNotifier);
    let api = HttpRoleApi::new(&config, Arc::clone(&notifier))
        .context("could not initialize the role api client")?;
    let perm_policies = api
        .list_perm_policies()
        .await
        .context("could not list permission policies")?;

    let (edit_role_item, args, submit) = match command {
        RoleCommands::Create(args) => (None, args, true),
        RoleCommands::Update(args) => {
            let name = args
                .name
                .clone()
                .context("--name is required to update a role")?;
            (Some(api.get_role(&name).await?), args, true)
        }
        RoleCommands::Form { edit: Some(name) } => {
            (Some(api.get_role(&name).await?), RoleArgs::default(), false)
        }
        RoleCommands::Form { edit: None } => {
            (None, RoleArgs::default(), false)
        }
    };

    let props = Props {
        visible: true,
        is_edit_role: edit_role_item.is_some(),
        edit_role_item,
        perm_policies,
        on_create: Box::new(|| info!("role saved")),
        on_close_create: Box::new(|| info!("role dialog closed")),
    };
    let mut dialog = RoleDialog::mount(props, api, notifier, config.locale);
    if !submit {
        if let Some(view) = dialog.view() {
            println!("{view}");
        }
        dialog.cancel();
        return Ok(());
    }
    apply(&mut dialog, &args).await?;
    dialog.dispose();
    Ok(())
}
