use crate::cli::{actions::Action, globals::GlobalArgs};
use anyhow::{anyhow, Result};
use secrecy::SecretString;

pub fn handler(matches: &clap::ArgMatches) -> Result<(Action, GlobalArgs)> {
    let required = |name: &str| -> Result<String> {
        matches
            .get_one::<String>(name)
            .map(ToString::to_string)
            .ok_or_else(|| anyhow!("missing required argument: --{name}"))
    };

    let globals = GlobalArgs::new(
        required("directory-url")?,
        required("client-id")?,
        SecretString::from(required("client-secret")?),
        required("pool-id")?,
        SecretString::from(required("service-token")?),
    );

    let action = Action::Server {
        port: matches.get_one::<u16>("port").copied().unwrap_or(8080),
    };

    Ok((action, globals))
}
