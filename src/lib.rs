mod activate;
mod auth;
mod cli;
mod common;
mod current;
mod keychain;
mod messages;
mod profiles;
mod store;
#[cfg(test)]
mod test_utils;
mod ui;

pub(crate) use activate::*;
pub(crate) use auth::*;
pub(crate) use common::*;
pub(crate) use current::*;
pub(crate) use keychain::*;
pub(crate) use messages::*;
pub(crate) use profiles::*;
pub(crate) use store::*;
pub(crate) use ui::*;

pub use auth::{AuthDoc, AuthMode, SettingsDoc, classify, validate_for_save};
pub use keychain::{CREDENTIALS_SERVICE, SecureStore};

use clap::{FromArgMatches, error::ErrorKind};

use crate::cli::{Cli, Commands, command_with_examples};

pub fn run_cli() {
    let args: Vec<std::ffi::OsString> = std::env::args_os().collect();
    if let Err(message) = run_cli_with_args(args) {
        eprintln!("{}", format_error(&message));
        std::process::exit(1);
    }
}

fn run_cli_with_args(args: Vec<std::ffi::OsString>) -> Result<(), String> {
    if args.len() == 1 {
        let name = package_command_name();
        println!("{name} {}", env!("CARGO_PKG_VERSION"));
        println!();
        let mut cmd = command_with_examples();
        let _ = cmd.print_help();
        println!();
        return Ok(());
    }
    let cmd = command_with_examples();
    let matches = match cmd.clone().try_get_matches_from(args) {
        Ok(matches) => matches,
        Err(err) => {
            if err.kind() == ErrorKind::DisplayHelp {
                let name = package_command_name();
                println!("{name} {}", env!("CARGO_PKG_VERSION"));
                println!();
                let _ = err.print();
                println!();
                return Ok(());
            }
            return Err(err.to_string());
        }
    };
    let cli = Cli::from_arg_matches(&matches).map_err(|err| err.to_string())?;
    set_plain(cli.plain);
    if let Err(message) = run(cli) {
        if message == CANCELLED_MESSAGE {
            let message = format_cancel(use_color_stdout());
            print_output_block(&message);
            return Ok(());
        }
        return Err(message);
    }
    Ok(())
}

fn run(cli: Cli) -> Result<(), String> {
    let paths = resolve_paths()?;
    ensure_paths(&paths)?;

    match cli.command {
        Commands::List => list_profiles(&paths),
        Commands::Current => current_profile(&paths),
        Commands::Create {
            name,
            api_key,
            base_url,
            model,
            from_live,
            yes,
        } => create_profile(
            &paths,
            &name,
            CreateArgs {
                api_key,
                base_url,
                model,
                from_live,
                yes,
            },
        ),
        Commands::Save { name, yes } => save_profile(&paths, &name, yes),
        Commands::Activate { name, yes } => activate_profile(&paths, &name, yes),
        Commands::Delete { name, yes } => delete_profile(&paths, &name, yes),
        Commands::Repair => repair_profiles(&paths),
        Commands::MigrateKeychain => migrate_keychain(&paths),
    }
}
