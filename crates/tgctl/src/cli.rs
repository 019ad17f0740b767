use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use tgctl_core::{buttons::DEFAULT_COLUMNS, contacts::DEFAULT_KIND, messaging::types::FormatMode};

#[derive(Parser, Debug)]
#[command(name = "tgctl", version)]
#[command(about = "Send Telegram bot messages and manage saved contacts", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Credentials file (default: $TGCTL_ENV_FILE, then ./.env)
    #[arg(long, global = true, value_name = "PATH")]
    pub env_file: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Write the credentials file (bot token, optional default chat id)
    Init(InitArgs),
    /// Verify the bot token works
    TestConnection,
    /// Show bot identity and capabilities
    BotInfo,
    /// Show metadata for one chat
    ChatInfo {
        /// Chat ID to query
        #[arg(long, allow_hyphen_values = true)]
        chat_id: String,
    },
    /// List chats seen in recent updates (useful for discovering chat IDs)
    ListChats,
    /// Send a text message
    SendMessage(SendMessageArgs),
    /// Send a photo
    SendPhoto(SendPhotoArgs),
    /// Send a file as a document
    SendFile(SendFileArgs),
    /// Send a message with inline keyboard buttons
    SendButtons(SendButtonsArgs),
    /// Manage saved contacts
    #[command(subcommand)]
    Contacts(ContactsCommand),
}

impl Command {
    /// Verb phrase used in failure messages ("Failed to <action>").
    pub fn action(&self) -> &'static str {
        match self {
            Command::Init(_) => "initialize",
            Command::TestConnection => "connect",
            Command::BotInfo => "get bot info",
            Command::ChatInfo { .. } => "get chat info",
            Command::ListChats => "fetch chats",
            Command::SendMessage(_) | Command::SendButtons(_) => "send message",
            Command::SendPhoto(_) => "send photo",
            Command::SendFile(_) => "send file",
            Command::Contacts(ContactsCommand::Import) => "import",
            Command::Contacts(_) => "update contacts",
        }
    }

    /// Extra advice printed after a remote failure.
    pub fn remote_hint(&self) -> Option<&'static str> {
        match self {
            Command::TestConnection => Some("Check your bot token and internet connection"),
            Command::ChatInfo { .. } => {
                Some("Make sure the chat ID is correct and the bot has access to this chat")
            }
            _ => None,
        }
    }
}

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Bot token from @BotFather (prompted when omitted)
    #[arg(long)]
    pub token: Option<String>,

    /// Default chat ID for commands run with --use-default
    #[arg(long)]
    pub default_chat_id: Option<String>,

    /// Overwrite an existing credentials file
    #[arg(long)]
    pub force: bool,
}

#[derive(Args, Debug, Default)]
pub struct TargetArgs {
    /// Contact name or chat ID
    #[arg(long, allow_hyphen_values = true)]
    pub to: Option<String>,

    /// Target chat ID
    #[arg(long, allow_hyphen_values = true)]
    pub chat_id: Option<String>,

    /// Use DEFAULT_CHAT_ID from the credentials file
    #[arg(long)]
    pub use_default: bool,
}

#[derive(Copy, Clone, Debug, Default, ValueEnum)]
pub enum FormatArg {
    Markdown,
    Html,
    #[default]
    None,
}

impl From<FormatArg> for FormatMode {
    fn from(f: FormatArg) -> Self {
        match f {
            FormatArg::Markdown => FormatMode::Markdown,
            FormatArg::Html => FormatMode::Html,
            FormatArg::None => FormatMode::Plain,
        }
    }
}

#[derive(Args, Debug)]
pub struct SendMessageArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Message text
    #[arg(short, long)]
    pub message: String,

    /// Message format
    #[arg(long, value_enum, default_value_t = FormatArg::None)]
    pub format: FormatArg,
}

#[derive(Args, Debug)]
pub struct SendPhotoArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Path to photo
    #[arg(long)]
    pub photo: PathBuf,

    /// Photo caption
    #[arg(long)]
    pub caption: Option<String>,
}

#[derive(Args, Debug)]
pub struct SendFileArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Path to file
    #[arg(long)]
    pub file: PathBuf,

    /// File caption/description
    #[arg(long)]
    pub caption: Option<String>,
}

#[derive(Args, Debug)]
pub struct SendButtonsArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Message text
    #[arg(short, long)]
    pub message: String,

    /// Button labels separated by commas (e.g. "Option 1,Option 2")
    #[arg(long)]
    pub buttons: String,

    /// Buttons per row
    #[arg(long, default_value_t = DEFAULT_COLUMNS)]
    pub columns: usize,
}

#[derive(Subcommand, Debug)]
pub enum ContactsCommand {
    /// Add or update a contact
    Add {
        /// Friendly name
        name: String,
        /// Telegram chat ID (negative for groups and channels)
        #[arg(allow_hyphen_values = true)]
        chat_id: String,
        /// Chat type (private, group, supergroup, channel)
        #[arg(long = "type", default_value = DEFAULT_KIND)]
        kind: String,
        /// Display title
        #[arg(long)]
        title: Option<String>,
    },
    /// Remove a contact
    Remove { name: String },
    /// List all contacts
    List,
    /// Search contacts by partial name
    Search { query: String },
    /// Print the chat ID for a contact
    Get { name: String },
    /// Import contacts from recent chats
    Import,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_send_message_with_contact_target() {
        let cli = Cli::try_parse_from([
            "tgctl",
            "send-message",
            "--to",
            "John",
            "-m",
            "hi",
            "--format",
            "html",
        ])
        .unwrap();
        match cli.command {
            Command::SendMessage(args) => {
                assert_eq!(args.target.to.as_deref(), Some("John"));
                assert_eq!(args.message, "hi");
                assert_eq!(FormatMode::from(args.format), FormatMode::Html);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn contacts_add_defaults_to_private() {
        let cli = Cli::try_parse_from(["tgctl", "contacts", "add", "John", "111"]).unwrap();
        match cli.command {
            Command::Contacts(ContactsCommand::Add { kind, title, .. }) => {
                assert_eq!(kind, "private");
                assert_eq!(title, None);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn negative_chat_ids_are_values() {
        let cli = Cli::try_parse_from(["tgctl", "contacts", "add", "Dev Team", "-100"]).unwrap();
        match cli.command {
            Command::Contacts(ContactsCommand::Add { chat_id, .. }) => assert_eq!(chat_id, "-100"),
            other => panic!("unexpected command: {other:?}"),
        }

        let cli =
            Cli::try_parse_from(["tgctl", "send-message", "--to", "-100", "-m", "x"]).unwrap();
        match cli.command {
            Command::SendMessage(args) => assert_eq!(args.target.to.as_deref(), Some("-100")),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn buttons_default_to_two_columns() {
        let cli = Cli::try_parse_from([
            "tgctl",
            "send-buttons",
            "--use-default",
            "-m",
            "Pick",
            "--buttons",
            "A,B,C",
        ])
        .unwrap();
        match cli.command {
            Command::SendButtons(args) => {
                assert!(args.target.use_default);
                assert_eq!(args.columns, 2);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
