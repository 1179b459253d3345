use clap::{
    builder::{
        styling::{AnsiColor, Effects, Styles},
        ValueParser,
    },
    Arg, ColorChoice, Command,
};

pub fn validator_log_level() -> ValueParser {
    ValueParser::from(move |level: &str| -> std::result::Result<u8, String> {
        if let Ok(parsed) = level.parse::<u8>() {
            // Successfully parsed as a number
            if parsed <= 5 {
                return Ok(parsed);
            }
        }

        match level.to_lowercase().as_str() {
            "error" => Ok(0),
            "warn" => Ok(1),
            "info" => Ok(2),
            "debug" => Ok(3),
            "trace" => Ok(4),
            _ => Err("invalid log level".to_string()),
        }
    })
}

pub fn new() -> Command {
    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Blue.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Green.on_default());

    Command::new("entrata")
        .about("Authentication gateway for a managed identity directory")
        .version(env!("CARGO_PKG_VERSION"))
        .color(ColorChoice::Auto)
        .styles(styles)
        .arg(
            Arg::new("port")
                .short('p')
                .long("port")
                .help("Port to listen on")
                .default_value("8080")
                .env("ENTRATA_PORT")
                .value_parser(clap::value_parser!(u16)),
        )
        .arg(
            Arg::new("directory-url")
                .long("directory-url")
                .help("Identity directory endpoint, example: https://directory.tld:8443")
                .env("ENTRATA_DIRECTORY_URL")
                .required(true),
        )
        .arg(
            Arg::new("client-id")
                .long("client-id")
                .help("Application client id registered with the directory")
                .env("ENTRATA_CLIENT_ID")
                .required(true),
        )
        .arg(
            Arg::new("client-secret")
                .long("client-secret")
                .help("Application client secret, used to derive the per-request secret hash")
                .env("ENTRATA_CLIENT_SECRET")
                .required(true),
        )
        .arg(
            Arg::new("pool-id")
                .long("pool-id")
                .help("User pool identifier, required by the privileged admin calls")
                .env("ENTRATA_POOL_ID")
                .required(true),
        )
        .arg(
            Arg::new("service-token")
                .long("service-token")
                .help("Service credential authorizing the privileged admin calls")
                .env("ENTRATA_SERVICE_TOKEN")
                .required(true),
        )
        .arg(
            Arg::new("verbosity")
                .short('v')
                .long("verbose")
                .help("Verbosity level: ERROR, WARN, INFO, DEBUG, TRACE (default: ERROR)")
                .env("ENTRATA_LOG_LEVEL")
                .global(true)
                .action(clap::ArgAction::Count)
                .value_parser(validator_log_level()),
        )
}
