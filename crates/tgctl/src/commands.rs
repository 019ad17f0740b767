use std::{
    io::{self, BufRead, Write},
    sync::Arc,
};

use anyhow::Context;
use tracing::info;

use tgctl_core::{
    attachments, buttons,
    config::{write_credentials, Config, CredentialsFile},
    contacts::ContactStore,
    discovery::unique_chats,
    domain::ChatId,
    errors::Error,
    messaging::{
        client::BotClient,
        port::BotApi,
        types::{FormatMode, InlineKeyboard},
    },
    render,
    target::Target,
};
use tgctl_telegram::TelegramBotApi;

use crate::cli::{
    Command, ContactsCommand, InitArgs, SendButtonsArgs, SendFileArgs, SendMessageArgs,
    SendPhotoArgs, TargetArgs,
};

type Connector = Box<dyn Fn(&Config) -> Arc<dyn BotApi>>;

/// One-shot command runner.
///
/// The bot API is only constructed for commands that talk to Telegram, so the
/// contact commands work without credentials.
pub struct App {
    creds: CredentialsFile,
    connector: Connector,
}

impl App {
    pub fn new(creds: CredentialsFile) -> Self {
        Self::with_connector(
            creds,
            Box::new(|cfg: &Config| Arc::new(TelegramBotApi::from_config(cfg)) as Arc<dyn BotApi>),
        )
    }

    pub fn with_connector(creds: CredentialsFile, connector: Connector) -> Self {
        Self { creds, connector }
    }

    fn client(&self) -> tgctl_core::Result<BotClient> {
        let cfg = Config::load(&self.creds)?;
        info!("using credentials from {}", cfg.env_file.display());
        Ok(BotClient::new((self.connector)(&cfg), cfg.default_chat_id))
    }

    /// Stdout carries command output only; the recovery warning goes to stderr.
    fn contacts(&self) -> ContactStore {
        let store = ContactStore::open(self.creds.contacts_file());
        if let Some(w) = store.load_warning() {
            eprintln!("⚠️  Warning: {w}");
        }
        store
    }

    pub async fn run(&self, command: Command, out: &mut dyn Write) -> anyhow::Result<()> {
        match command {
            Command::Init(args) => self.init(args, out),
            Command::TestConnection => self.test_connection(out).await,
            Command::BotInfo => self.bot_info(out).await,
            Command::ChatInfo { chat_id } => self.chat_info(&chat_id, out).await,
            Command::ListChats => self.list_chats(out).await,
            Command::SendMessage(args) => self.send_message(args, out).await,
            Command::SendPhoto(args) => self.send_photo(args, out).await,
            Command::SendFile(args) => self.send_file(args, out).await,
            Command::SendButtons(args) => self.send_buttons(args, out).await,
            Command::Contacts(cmd) => self.contacts_command(cmd, out).await,
        }
    }

    fn init(&self, args: InitArgs, out: &mut dyn Write) -> anyhow::Result<()> {
        let path = self.creds.path();
        writeln!(out, "🤖 Telegram Bot Initialization\n")?;

        let (token, default_chat_id) = match args.token {
            Some(token) => (token, args.default_chat_id),
            None => {
                writeln!(out, "📝 Get your bot token from @BotFather on Telegram\n")?;
                let token = prompt(out, "Bot Token: ")?;
                let default_chat_id = match args.default_chat_id {
                    Some(id) => Some(id),
                    None => Some(prompt(out, "Default Chat ID (optional): ")?),
                };
                (token, default_chat_id)
            }
        };

        let outcome = write_credentials(path, &token, default_chat_id.as_deref(), args.force)?;

        writeln!(
            out,
            "\n✅ Configuration saved to {}",
            outcome.env_file.display()
        )?;
        if outcome.created_gitignore {
            writeln!(out, "✅ Created .gitignore file")?;
        }
        writeln!(out, "\n📋 Next steps:")?;
        writeln!(out, "   1. Test connection: tgctl test-connection")?;
        writeln!(out, "   2. Message your bot on Telegram")?;
        writeln!(out, "   3. Get chat IDs: tgctl list-chats")?;
        writeln!(out, "\n⚠️  Security reminder: Never commit the credentials file!")?;
        Ok(())
    }

    async fn test_connection(&self, out: &mut dyn Write) -> anyhow::Result<()> {
        writeln!(out, "🔍 Testing Telegram Bot connection...\n")?;
        let client = self.client()?;
        let me = client.get_identity().await?;
        write!(out, "{}", render::connection_ok(&me, client.default_chat_id()))?;
        Ok(())
    }

    async fn bot_info(&self, out: &mut dyn Write) -> anyhow::Result<()> {
        writeln!(out, "🤖 Telegram Bot Information\n")?;
        let client = self.client()?;
        let me = client.get_identity().await?;
        write!(out, "{}", render::bot_info(&me, client.default_chat_id()))?;
        Ok(())
    }

    async fn chat_info(&self, chat_id: &str, out: &mut dyn Write) -> anyhow::Result<()> {
        writeln!(out, "🔍 Fetching information for chat {chat_id}...\n")?;
        let client = self.client()?;
        let info = client.get_chat(&ChatId::new(chat_id)).await?;
        write!(out, "{}", render::chat_info(&info))?;
        Ok(())
    }

    async fn list_chats(&self, out: &mut dyn Write) -> anyhow::Result<()> {
        writeln!(out, "📋 Fetching recent chats...\n")?;
        let client = self.client()?;
        let updates = client.get_updates(None).await?;
        let chats = unique_chats(&updates);
        write!(out, "{}", render::chat_list(updates.len(), &chats))?;
        Ok(())
    }

    /// Resolve `--to/--chat-id/--use-default`, listing saved contacts when a name misses.
    fn target(&self, args: &TargetArgs, out: &mut dyn Write) -> anyhow::Result<Target> {
        let store = self.contacts();
        match Target::resolve(
            args.to.as_deref(),
            args.chat_id.as_deref(),
            args.use_default,
            &store,
        ) {
            Ok(t) => Ok(t),
            Err(e @ Error::ContactNotFound(_)) => {
                write!(out, "{}", render::contact_suggestions(&store.list_all()))?;
                Err(e.into())
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn send_message(&self, args: SendMessageArgs, out: &mut dyn Write) -> anyhow::Result<()> {
        let target = self.target(&args.target, out)?;
        match target.contact_name() {
            Some(name) => writeln!(out, "📤 Sending message to {name}...")?,
            None => writeln!(out, "📤 Sending message...")?,
        }

        let client = self.client()?;
        let sent = client
            .send_text(&args.message, target.chat_id(), args.format.into(), None)
            .await?;
        write!(
            out,
            "{}",
            render::sent("Message", &sent, target.contact_name())
        )?;
        Ok(())
    }

    async fn send_photo(&self, args: SendPhotoArgs, out: &mut dyn Write) -> anyhow::Result<()> {
        let target = self.target(&args.target, out)?;
        let att = attachments::check_photo(&args.photo)?;
        write!(out, "{}", render::attachment_warnings(&att))?;
        writeln!(out, "📤 Sending photo: {}...", att.file_name)?;

        let client = self.client()?;
        let sent = client
            .send_photo(&att.path, target.chat_id(), args.caption.as_deref())
            .await?;
        write!(out, "{}", render::sent("Photo", &sent, target.contact_name()))?;
        Ok(())
    }

    async fn send_file(&self, args: SendFileArgs, out: &mut dyn Write) -> anyhow::Result<()> {
        let target = self.target(&args.target, out)?;
        let att = attachments::check_document(&args.file)?;
        write!(out, "{}", render::attachment_warnings(&att))?;
        writeln!(
            out,
            "📤 Sending file: {} ({:.2} MB)...",
            att.file_name,
            att.size_mb()
        )?;

        let client = self.client()?;
        let sent = client
            .send_document(&att.path, target.chat_id(), args.caption.as_deref())
            .await?;
        write!(out, "{}", render::sent("File", &sent, target.contact_name()))?;
        writeln!(out, "   File: {}", att.file_name)?;
        Ok(())
    }

    async fn send_buttons(&self, args: SendButtonsArgs, out: &mut dyn Write) -> anyhow::Result<()> {
        let target = self.target(&args.target, out)?;
        let labels = buttons::parse_labels(&args.buttons);
        if labels.is_empty() {
            return Err(Error::Config("--buttons needs at least one label".to_string()).into());
        }
        let keyboard = InlineKeyboard::from_rows(&buttons::arrange(&labels, args.columns));
        writeln!(
            out,
            "📤 Sending message with {} button(s)...",
            keyboard.button_count()
        )?;

        let client = self.client()?;
        let sent = client
            .send_text(
                &args.message,
                target.chat_id(),
                FormatMode::Plain,
                Some(keyboard),
            )
            .await?;
        write!(
            out,
            "{}",
            render::sent("Message", &sent, target.contact_name())
        )?;
        writeln!(out, "   Buttons: {}", labels.join(", "))?;
        writeln!(
            out,
            "\n💡 Note: button clicks arrive as callback queries; handle them in a bot listener."
        )?;
        Ok(())
    }

    async fn contacts_command(
        &self,
        cmd: ContactsCommand,
        out: &mut dyn Write,
    ) -> anyhow::Result<()> {
        let mut store = self.contacts();

        match cmd {
            ContactsCommand::Add {
                name,
                chat_id,
                kind,
                title,
            } => {
                let is_new = store.add(&name, &chat_id, &kind, title.as_deref())?;
                let verb = if is_new { "Added" } else { "Updated" };
                writeln!(out, "✅ {verb} contact: {name} → {chat_id}")?;
            }
            ContactsCommand::Remove { name } => {
                if store.remove(&name)? {
                    writeln!(out, "✅ Removed contact: {name}")?;
                } else {
                    writeln!(out, "❌ Contact not found: {name}")?;
                }
            }
            ContactsCommand::List => {
                write!(out, "{}", render::contact_list(&store.list_all()))?;
            }
            ContactsCommand::Search { query } => {
                write!(out, "{}", render::search_results(&query, &store.search(&query)))?;
            }
            ContactsCommand::Get { name } => match store.get_chat_id(&name) {
                Some(id) => writeln!(out, "{id}")?,
                None => return Err(Error::ContactNotFound(name).into()),
            },
            ContactsCommand::Import => {
                let client = self.client()?;
                let updates = client.get_updates(None).await?;
                let chats = unique_chats(&updates);
                let imported = store.import_from_chats(&chats)?;
                writeln!(
                    out,
                    "✅ Imported {imported} new contact(s) from {} chat(s)",
                    chats.len()
                )?;
                writeln!(out, "\n💡 View contacts: tgctl contacts list")?;
            }
        }
        Ok(())
    }
}

fn prompt(out: &mut dyn Write, label: &str) -> anyhow::Result<String> {
    write!(out, "{label}")?;
    out.flush()?;
    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("read from stdin")?;
    Ok(line.trim().to_string())
}
