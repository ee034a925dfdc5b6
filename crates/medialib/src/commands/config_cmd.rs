//! Config subcommand handlers.

use medialib_config::{Profile, parse_portal_url, store_session};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{self, active_profile_name};
use crate::error::CliError;
use crate::output;

const VALID_KEYS: &str =
    "portal, session_env, ca_cert, insecure, timeout, can_create, can_list, widgets";

fn parse_bool(field: &str, value: &str) -> Result<bool, CliError> {
    value.parse().map_err(|_| CliError::Validation {
        field: field.into(),
        reason: "must be 'true' or 'false'".into(),
    })
}

fn set_key(profile: &mut Profile, key: &str, value: String) -> Result<(), CliError> {
    match key {
        "portal" => {
            parse_portal_url(&value)?;
            profile.portal = value;
        }
        "session_env" | "session-env" => profile.session_env = Some(value),
        "ca_cert" | "ca-cert" => profile.ca_cert = Some(value.into()),
        "insecure" => profile.insecure = Some(parse_bool("insecure", &value)?),
        "timeout" => {
            let secs: u64 = value.parse().map_err(|_| CliError::Validation {
                field: "timeout".into(),
                reason: "must be a number (seconds)".into(),
            })?;
            profile.timeout = Some(secs);
        }
        "can_create" | "can-create" => profile.can_create = parse_bool("can_create", &value)?,
        "can_list" | "can-list" => profile.can_list = parse_bool("can_list", &value)?,
        "widgets" => {
            let names: Vec<String> = value
                .split(',')
                .map(str::trim)
                .filter(|n| !n.is_empty())
                .map(str::to_owned)
                .collect();
            profile.widgets = (!names.is_empty()).then_some(names);
        }
        other => {
            return Err(CliError::Validation {
                field: other.into(),
                reason: format!("unknown config key '{other}'. Valid keys: {VALID_KEYS}"),
            });
        }
    }
    Ok(())
}

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Path => {
            output::print_output(&config::config_path().display().to_string(), global.quiet);
            Ok(())
        }

        ConfigCommand::Show => {
            let mut cfg = config::load_config_or_default();
            for profile in cfg.profiles.values_mut() {
                if profile.session_id.is_some() {
                    profile.session_id = Some("********".into());
                }
            }
            let out = output::render_single(
                &global.output,
                &cfg,
                |c| format!("{c:#?}"),
                |_| "config".into(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ConfigCommand::Set { key, value } => {
            let mut cfg = config::load_config_or_default();
            let profile_name = active_profile_name(global, &cfg);
            let profile = cfg
                .profiles
                .entry(profile_name.clone())
                .or_insert_with(|| Profile::new(String::new()));

            set_key(profile, &key, value)?;
            config::save_config(&cfg)?;
            if !global.quiet {
                eprintln!("✓ Set {key} on profile '{profile_name}'");
            }
            Ok(())
        }

        ConfigCommand::SetSession {
            session_id,
            plaintext,
        } => {
            let mut cfg = config::load_config_or_default();
            let profile_name = active_profile_name(global, &cfg);

            if plaintext {
                cfg.profiles
                    .entry(profile_name.clone())
                    .or_insert_with(|| Profile::new(String::new()))
                    .session_id = Some(session_id);
                config::save_config(&cfg)?;
                if !global.quiet {
                    eprintln!("✓ Session stored in config file for profile '{profile_name}'");
                }
            } else {
                store_session(&profile_name, &session_id)?;
                if !global.quiet {
                    eprintln!("✓ Session stored in system keyring for profile '{profile_name}'");
                }
            }
            Ok(())
        }
    }
}
