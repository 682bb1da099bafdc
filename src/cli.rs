use clap::{Args, Parser, Subcommand};
use std::net::SocketAddr;
use std::path::PathBuf;
use time::Duration;

const DEFAULT_AUTH_COOKIE_NAME: &str = "livescore_auth";

#[allow(clippy::large_enum_variant)]
pub(crate) enum RunOutcome {
    Serve {
        addr: SocketAddr,
        config: livescore::config::AppConfig,
    },
    Exit(i32),
}

pub(crate) fn run() -> RunOutcome {
    let cli = Cli::parse();
    match &cli.command {
        Some(Command::Vapid(args)) => return RunOutcome::Exit(run_vapid(args)),
        Some(Command::AuthKey) => return RunOutcome::Exit(run_auth_key()),
        Some(Command::Token(args)) => return RunOutcome::Exit(run_token(&cli, args)),
        None => {}
    }

    let config = match resolve_config(&cli) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("error: {err}");
            return RunOutcome::Exit(2);
        }
    };

    RunOutcome::Serve {
        addr: cli.bind,
        config,
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "livescore",
    version,
    about = "Live score push notification service"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
    #[arg(long, env = "LIVESCORE_BIND", default_value = "127.0.0.1:3000")]
    bind: SocketAddr,
    #[arg(long, default_value = "Livescore")]
    app_name: String,
    /// TOML file for subscriber registrations; kept in memory when omitted.
    #[arg(long, env = "LIVESCORE_STORE")]
    store: Option<PathBuf>,
    #[arg(long, env = "LIVESCORE_VAPID_PRIVATE_KEY")]
    vapid_private_key: Option<String>,
    #[arg(long, env = "LIVESCORE_VAPID_PUBLIC_KEY")]
    vapid_public_key: Option<String>,
    #[arg(long, env = "LIVESCORE_VAPID_SUBJECT")]
    vapid_subject: Option<String>,
    #[arg(long, env = "LIVESCORE_AUTH_KEY")]
    auth_key: Option<String>,
    #[arg(long, env = "LIVESCORE_AUTH_TOKEN_TTL")]
    auth_token_ttl: Option<String>,
    #[arg(long, env = "LIVESCORE_AUTH_COOKIE_NAME")]
    auth_cookie_name: Option<String>,
    /// Roles allowed to trigger notifications.
    #[arg(long, env = "LIVESCORE_NOTIFY_ROLES", value_delimiter = ',')]
    notify_role: Vec<String>,
    /// Upper bound for a single push delivery, e.g. `10s`.
    #[arg(long, env = "LIVESCORE_DELIVERY_TIMEOUT")]
    delivery_timeout: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a VAPID key pair.
    Vapid(VapidArgs),
    /// Generate a secret for signing auth tokens.
    AuthKey,
    /// Issue a bearer token for the notify endpoint.
    Token(TokenArgs),
}

#[derive(Args, Debug)]
struct VapidArgs {
    #[arg(long)]
    subject: Option<String>,
}

#[derive(Args, Debug)]
struct TokenArgs {
    #[arg(long)]
    subject: String,
    #[arg(long, default_value = "admin")]
    role: String,
}

fn run_vapid(args: &VapidArgs) -> i32 {
    let credentials = match livescore::generate_vapid_credentials() {
        Ok(credentials) => credentials,
        Err(err) => {
            eprintln!("failed to generate VAPID credentials: {err}");
            return 1;
        }
    };
    let (subject, show_subject_note) = match args.subject.as_deref() {
        Some(subject) => (subject.to_string(), false),
        None => ("mailto:you@example.com".to_string(), true),
    };

    println!("VAPID credentials generated.");
    println!();
    println!("LIVESCORE_VAPID_PRIVATE_KEY=\"{}\"", credentials.private_key);
    println!("LIVESCORE_VAPID_PUBLIC_KEY=\"{}\"", credentials.public_key);
    println!("LIVESCORE_VAPID_SUBJECT=\"{subject}\"");
    if show_subject_note {
        println!();
        println!("Note: replace LIVESCORE_VAPID_SUBJECT with a contact URI you control.");
    }
    0
}

fn run_auth_key() -> i32 {
    let secret = match livescore::auth::generate_auth_key() {
        Ok(secret) => secret,
        Err(err) => {
            eprintln!("failed to generate auth key: {err}");
            return 1;
        }
    };
    println!("{secret}");
    0
}

fn run_token(cli: &Cli, args: &TokenArgs) -> i32 {
    let config = match resolve_config(cli) {
        Ok(config) if config.auth.is_some() => config,
        Ok(_) => {
            eprintln!("error: --auth-key is required to issue tokens");
            return 2;
        }
        Err(err) => {
            eprintln!("error: {err}");
            return 2;
        }
    };
    match livescore::auth::issue_token(&config, &args.subject, &args.role) {
        Ok(token) => {
            println!("{token}");
            0
        }
        Err(err) => {
            eprintln!("failed to issue token: {err}");
            1
        }
    }
}

fn resolve_config(cli: &Cli) -> Result<livescore::config::AppConfig, String> {
    let delivery_timeout: std::time::Duration = match cli.delivery_timeout.as_deref() {
        Some(raw) => parse_duration("delivery timeout", raw)?
            .try_into()
            .map_err(|_| "delivery timeout is out of range".to_string())?,
        None => livescore::config::DEFAULT_DELIVERY_TIMEOUT,
    };

    Ok(livescore::config::AppConfig {
        app_name: cli.app_name.clone(),
        store_path: cli.store.clone(),
        vapid_private_key: cli.vapid_private_key.clone(),
        vapid_public_key: cli.vapid_public_key.clone(),
        vapid_subject: cli.vapid_subject.clone(),
        auth: resolve_auth_config(cli)?,
        delivery_timeout,
    })
}

fn resolve_auth_config(cli: &Cli) -> Result<Option<livescore::config::AuthConfig>, String> {
    let has_any = cli.auth_key.is_some()
        || cli.auth_token_ttl.is_some()
        || cli.auth_cookie_name.is_some()
        || !cli.notify_role.is_empty();

    if !has_any {
        return Ok(None);
    }

    let auth_key = cli
        .auth_key
        .as_ref()
        .ok_or("auth is configured but --auth-key is missing")?
        .trim();
    if auth_key.is_empty() {
        return Err("auth key cannot be empty".to_string());
    }

    if let Some(name) = cli.auth_cookie_name.as_deref()
        && name.trim().is_empty()
    {
        return Err("auth cookie name cannot be empty".to_string());
    }

    let token_ttl = match cli.auth_token_ttl.as_deref() {
        Some(raw) => parse_duration("auth token ttl", raw)?,
        None => default_auth_token_ttl(),
    };
    let cookie_name = cli
        .auth_cookie_name
        .as_deref()
        .map(|name| name.trim().to_string())
        .unwrap_or_else(|| DEFAULT_AUTH_COOKIE_NAME.to_string());
    let mut allowed_roles: Vec<String> = cli
        .notify_role
        .iter()
        .map(|role| role.trim().to_string())
        .filter(|role| !role.is_empty())
        .collect();
    if allowed_roles.is_empty() {
        allowed_roles = livescore::config::DEFAULT_NOTIFY_ROLES
            .iter()
            .map(|role| role.to_string())
            .collect();
    }

    Ok(Some(livescore::config::AuthConfig {
        key: auth_key.to_string(),
        token_ttl,
        cookie_name,
        allowed_roles,
    }))
}

fn default_auth_token_ttl() -> Duration {
    Duration::days(14)
}

fn parse_duration(name: &str, raw: &str) -> Result<Duration, String> {
    let value = raw.trim();
    if value.is_empty() {
        return Err(format!("{name} cannot be empty"));
    }

    let (amount, unit) = match value.chars().last() {
        Some(ch) if ch.is_ascii_alphabetic() => {
            (&value[..value.len() - 1], ch.to_ascii_lowercase())
        }
        _ => (value, 's'),
    };

    let amount: i64 = amount
        .parse()
        .map_err(|_| format!("invalid {name} '{value}'; expected <number>[s|m|h|d]"))?;

    if amount <= 0 {
        return Err(format!("{name} must be greater than 0"));
    }

    match unit {
        's' => Ok(Duration::seconds(amount)),
        'm' => Ok(Duration::minutes(amount)),
        'h' => Ok(Duration::hours(amount)),
        'd' => Ok(Duration::days(amount)),
        _ => Err(format!(
            "invalid {name} '{value}'; expected <number>[s|m|h|d]"
        )),
    }
}
