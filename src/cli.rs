use clap::{Arg, ArgAction, ArgMatches, Command};

pub fn build_cli() -> Command {
    Command::new("github-tools")
        .about("GitHub REST tools over stdio (newline-delimited JSON)")
        .arg(
            Arg::new("log-level")
                .long("log-level")
                .num_args(1)
                .help("Override RUST_LOG level (e.g., info, debug)"),
        )
        .arg(
            Arg::new("version")
                .long("version")
                .help("Print version and exit")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("list-tools")
                .long("list-tools")
                .help("Print the tool catalog as JSON and exit")
                .action(ArgAction::SetTrue),
        )
}

pub fn log_level(matches: &ArgMatches) -> Option<&str> {
    matches.get_one::<String>("log-level").map(String::as_str)
}

/// Logs go to stderr; stdout is reserved for replies.
pub fn init_logging(level: Option<&str>) {
    // Explicit level wins, then RUST_LOG, then info
    if let Some(lvl) = level {
        std::env::set_var("RUST_LOG", lvl);
    } else if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info");
    }
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_flags() {
        let m = build_cli()
            .try_get_matches_from(["github-tools", "--log-level", "debug", "--list-tools"])
            .unwrap();
        assert_eq!(log_level(&m), Some("debug"));
        assert!(m.get_flag("list-tools"));
        assert!(!m.get_flag("version"));
    }
}
