//! Translation from config file + CLI flags to `medialib_core::SessionConfig`.
//!
//! Profiles live in `medialib-config`; this module only layers the global
//! flags on top of them.

use secrecy::SecretString;

use medialib_config::{Config, Profile};
use medialib_core::SessionConfig;

use crate::cli::GlobalOpts;
use crate::error::CliError;

pub use medialib_config::{config_path, load_config_or_default, save_config};

/// Profile selected by `--profile`, else the config's default.
pub fn active_profile_name(global: &GlobalOpts, cfg: &Config) -> String {
    cfg.profile_name(global.profile.as_deref()).to_owned()
}

/// Build a `SessionConfig` from the config file, profile, and CLI overrides.
pub fn build_session_config(global: &GlobalOpts) -> Result<SessionConfig, CliError> {
    let cfg = load_config_or_default();
    let profile_name = active_profile_name(global, &cfg);

    let mut profile = match cfg.profiles.get(&profile_name) {
        Some(profile) => profile.clone(),
        // No profile: build one from CLI flags / env vars alone
        None => {
            let portal = global.portal.as_deref().ok_or_else(|| CliError::NoConfig {
                path: config_path().display().to_string(),
            })?;
            Profile::new(portal)
        }
    };
    apply_overrides(&mut profile, global);

    let config = match global.session {
        Some(ref session) => medialib_config::session_config_with(
            &profile,
            &cfg.defaults,
            SecretString::from(session.clone()),
        )?,
        None => medialib_config::profile_to_session_config(&profile, &profile_name, &cfg.defaults)?,
    };

    tracing::debug!(
        profile = %profile_name,
        portal = %config.url,
        rights = ?config.rights,
        "session config resolved"
    );
    Ok(config)
}

fn apply_overrides(profile: &mut Profile, global: &GlobalOpts) {
    if let Some(ref portal) = global.portal {
        profile.portal.clone_from(portal);
    }
    if global.insecure {
        profile.insecure = Some(true);
    }
    if let Some(timeout) = global.timeout {
        profile.timeout = Some(timeout);
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;
    use crate::cli::Cli;

    fn global(args: &[&str]) -> GlobalOpts {
        let mut argv = vec!["medialib"];
        argv.extend_from_slice(args);
        argv.extend_from_slice(&["widgets"]);
        match Cli::try_parse_from(argv) {
            Ok(cli) => cli.global,
            Err(e) => panic!("parse failed: {e}"),
        }
    }

    #[test]
    fn flags_override_profile_values() {
        let mut profile = Profile::new("https://ent.example.org");
        profile.timeout = Some(10);
        apply_overrides(
            &mut profile,
            &global(&["--portal", "https://other.example.org", "-k", "--timeout", "3"]),
        );
        assert_eq!(profile.portal, "https://other.example.org");
        assert_eq!(profile.insecure, Some(true));
        assert_eq!(profile.timeout, Some(3));
    }

    #[test]
    fn absent_flags_keep_profile_values() {
        let mut profile = Profile::new("https://ent.example.org");
        profile.insecure = Some(false);
        apply_overrides(&mut profile, &global(&[]));
        assert_eq!(profile.portal, "https://ent.example.org");
        assert_eq!(profile.insecure, Some(false));
        assert_eq!(profile.timeout, None);
    }
}
