use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tracing::info;
use uuid::Uuid;

use chatfmt::chat::DEFAULT_COLOR;
use chatfmt::{
    register, ChatEvent, ChatEventBus, ChatFormatter, ChatSender, ChatSettings, Config,
    SharedChatSettings, StaticGroups,
};

/// Comma-separated permission groups, e.g. `admin,vip`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct GroupList(Vec<String>);

fn parse_groups(s: &str) -> Result<GroupList, String> {
    Ok(GroupList(
        s.split(',')
            .map(str::trim)
            .filter(|g| !g.is_empty())
            .map(String::from)
            .collect(),
    ))
}

#[derive(Parser, Debug)]
#[command(name = "chatfmt")]
#[command(about = "Format a chat message with group templates and color codes", long_about = None)]
struct Cli {
    /// Config file, created from the bundled default if missing
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Print the message as a JSON text component
    #[arg(long)]
    json: bool,

    /// Sender display name
    player: String,

    /// Comma-separated permission groups (may be empty)
    #[arg(value_parser = parse_groups)]
    groups: GroupList,

    /// Message text; everything after the groups, flags included
    #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
    message: Vec<String>,
}

/// Load the config at `path`, writing the bundled default first if missing.
///
/// Logging is configured from the file, so diagnostics go to stderr directly.
fn load_config(path: &Path) -> Config {
    match Config::create_if_missing(path) {
        Ok(true) => eprintln!("Created default config at {}", path.display()),
        Ok(false) => {}
        Err(e) => eprintln!("Failed to create default config: {e}"),
    }

    match Config::load_with_env(path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load {}: {e}", path.display());
            eprintln!("Using default configuration.");
            let mut config = Config::default();
            config.apply_env_overrides();
            config
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = load_config(&cli.config);

    if let Err(e) = chatfmt::logging::init(&config.logging) {
        eprintln!("Failed to initialize logging: {e}");
        chatfmt::logging::init_console_only(&config.logging.level);
    }

    info!(
        chat_enabled = config.chat.enabled,
        chat_formats = config.chat.formats.len(),
        "Config loaded"
    );

    let sender = ChatSender::new(Uuid::new_v4(), cli.player);
    let groups = StaticGroups::new().with(sender.id, cli.groups.0);
    let settings = SharedChatSettings::new(ChatSettings::from(&config.chat));
    let formatter = Arc::new(ChatFormatter::new(settings, Arc::new(groups)));

    let mut bus = ChatEventBus::new();
    register(&mut bus, formatter);
    let message = bus.dispatch(ChatEvent::new(sender, cli.message.join(" ")));

    if cli.json {
        match serde_json::to_string(&message) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("Failed to encode message: {e}");
                return ExitCode::FAILURE;
            }
        }
    } else if message.segments().iter().all(|s| s.color == DEFAULT_COLOR) {
        println!("{message}");
    } else {
        println!("{}", message.to_ansi());
    }

    ExitCode::SUCCESS
}
