use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;

use mimo::admin::{self, MessageLevel};
use mimo::{
    MessageText, MimoClient, NewSender, PhoneNumber, RawPhoneNumber, SendSms, SenderFilter,
    SenderName, SenderStatus, Settings, Store, Username, callbacks, logging,
};

#[derive(Parser, Debug)]
#[command(name = "mimo-admin", version, about = "MIMO SMS operator console")]
struct Cli {
    /// Settings file; defaults to `mimo.toml` when present.
    #[arg(long, global = true)]
    settings: Option<PathBuf>,

    /// Print records as JSON instead of tables.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Sender ids
    #[command(subcommand)]
    Senders(SendersCmd),
    /// Vouchers and account balance
    #[command(subcommand)]
    Credits(CreditsCmd),
    /// Outbound SMS
    #[command(subcommand)]
    Sms(SmsCmd),
}

#[derive(Subcommand, Debug)]
enum SendersCmd {
    /// List locally registered senders
    List {
        /// Substring of the sender id
        #[arg(long)]
        search: Option<String>,
        #[arg(long, value_enum)]
        status: Option<StatusArg>,
    },
    /// Show senders as MIMO reports them
    Remote {
        /// Only senders still awaiting approval
        #[arg(long)]
        requested: bool,
    },
    /// Request a new sender id
    Register {
        sender: String,
        #[arg(long, default_value = "")]
        reason: String,
    },
    /// Enable the given local senders that MIMO reports as enabled
    Check {
        #[arg(required = true)]
        ids: Vec<i64>,
    },
}

#[derive(Subcommand, Debug)]
enum CreditsCmd {
    /// Redeem a voucher
    Charge { voucher: String },
    /// Show the account balance
    View,
    /// Transfer credits to another user
    Transfer { username: String, balance: u64 },
    /// List recorded voucher activities
    History,
}

#[derive(Subcommand, Debug)]
enum SmsCmd {
    /// Send one text to one or more phones
    Send(SendArgs),
    /// List sent messages, newest first
    List {
        #[arg(long, default_value_t = 1)]
        page: usize,
    },
    /// List the recipients of a sent message
    Recipients { message_id: i64 },
}

#[derive(Args, Debug)]
struct SendArgs {
    #[arg(long)]
    sender: String,
    #[arg(long)]
    text: String,
    /// Phone numbers; local numbers are read as Angolan
    #[arg(required = true)]
    phones: Vec<String>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum StatusArg {
    Enable,
    Disabled,
}

impl From<StatusArg> for SenderStatus {
    fn from(value: StatusArg) -> Self {
        match value {
            StatusArg::Enable => SenderStatus::Enable,
            StatusArg::Disabled => SenderStatus::Disabled,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    logging::init();
    let cli = Cli::parse();

    let settings = Settings::load(cli.settings.as_deref()).context("failed to load settings")?;
    let client = MimoClient::from_settings(&settings).context("failed to build MIMO client")?;
    let store = Store::open(&settings.database)
        .with_context(|| format!("failed to open {}", settings.database.display()))?;

    match cli.command {
        Command::Senders(cmd) => senders(&client, &store, cmd, cli.json).await,
        Command::Credits(cmd) => credits(&client, &store, cmd, cli.json).await,
        Command::Sms(cmd) => sms(&client, &store, cmd, cli.json).await,
    }
}

async fn senders(client: &MimoClient, store: &Store, cmd: SendersCmd, json: bool) -> Result<()> {
    match cmd {
        SendersCmd::List { search, status } => {
            let filter = SenderFilter {
                search,
                status: status.map(SenderStatus::from),
            };
            let senders = admin::senders(store, &filter)?;
            if json {
                return print_json(&senders);
            }
            println!("{:>5}  {:<11}  {:<8}  {:<7}  {:<5}  REASON", "ID", "SENDER", "STATUS", "DEFAULT", "CHECK");
            for sender in &senders {
                println!(
                    "{:>5}  {:<11}  {:<8}  {:<7}  {:<5}  {}",
                    sender.id,
                    sender.sender,
                    sender.status.map(SenderStatus::label).unwrap_or("-"),
                    if sender.is_default { "yes" } else { "no" },
                    sender.hours_to_check(),
                    sender.reason,
                );
            }
            Ok(())
        }
        SendersCmd::Remote { requested } => {
            let body = client.senders().list(requested).await?;
            print_json(&body)
        }
        SendersCmd::Register { sender, reason } => {
            let request = NewSender::new(SenderName::new(sender)?, reason);
            let sender = admin::register_sender(client, store, &request).await?;
            println!("registered sender {} (id {}), awaiting approval", sender.sender, sender.id);
            Ok(())
        }
        SendersCmd::Check { ids } => {
            let outcome = admin::check_sender_availability(client, store, &ids).await?;
            match outcome.level {
                MessageLevel::Success => {
                    println!("{} ({} updated)", outcome.message, outcome.updated);
                    Ok(())
                }
                MessageLevel::Error => bail!(outcome.message),
            }
        }
    }
}

async fn credits(client: &MimoClient, store: &Store, cmd: CreditsCmd, json: bool) -> Result<()> {
    match cmd {
        CreditsCmd::Charge { voucher } => {
            let activity = admin::redeem_voucher(client, store, &voucher).await?;
            if json {
                return print_json(&activity);
            }
            println!(
                "{} voucher {}: {} credits, price {}, balance {}",
                activity.kind.label(),
                activity.voucher,
                activity.credits,
                activity.price_format(),
                activity.current_credits,
            );
            Ok(())
        }
        CreditsCmd::View => print_json(&client.credits().view().await?),
        CreditsCmd::Transfer { username, balance } => {
            let body = client
                .credits()
                .transfer(&Username::new(username)?, balance)
                .await?;
            print_json(&body)
        }
        CreditsCmd::History => {
            let activities = admin::activities(store)?;
            if json {
                return print_json(&activities);
            }
            println!("{:>5}  {:<14}  {:<7}  {:>8}  {:>12}  {:>8}  USER", "ID", "VOUCHER", "TYPE", "CREDITS", "PRICE", "BALANCE");
            for activity in &activities {
                println!(
                    "{:>5}  {:<14}  {:<7}  {:>8}  {:>12}  {:>8}  {}",
                    activity.id,
                    activity.voucher,
                    activity.kind.label(),
                    activity.credits,
                    activity.price_format(),
                    activity.current_credits,
                    activity.user,
                );
            }
            Ok(())
        }
    }
}

async fn sms(client: &MimoClient, store: &Store, cmd: SmsCmd, json: bool) -> Result<()> {
    match cmd {
        SmsCmd::Send(args) => {
            let phones = args
                .phones
                .iter()
                .map(|raw| {
                    PhoneNumber::parse(Some(PhoneNumber::DEFAULT_REGION), raw.as_str())
                        .map(RawPhoneNumber::from)
                })
                .collect::<Result<Vec<_>, _>>()?;
            let request = SendSms::new(
                SenderName::new(args.sender)?,
                phones,
                MessageText::new(args.text)?,
            )?;
            match callbacks::send_sms(client, store, &request).await? {
                Some(message) if json => print_json(&message),
                Some(message) => {
                    let recipients = store.count_recipients(message.id)?;
                    println!("message {} recorded for {recipients} recipient(s)", message.id);
                    Ok(())
                }
                None => bail!("MIMO did not accept the message"),
            }
        }
        SmsCmd::List { page } => {
            let page = admin::message_page(store, page)?;
            if json {
                return print_json(&page.messages);
            }
            println!("{:>5}  {:>10}  {:<25}  TEXT", "ID", "PROVIDER", "CREATED");
            for message in &page.messages {
                println!(
                    "{:>5}  {:>10}  {:<25}  {}",
                    message.id,
                    message
                        .message_id
                        .map(|id| id.to_string())
                        .unwrap_or_else(|| "-".to_owned()),
                    message.created_at.format("%Y-%m-%d %H:%M:%S"),
                    message.text,
                );
            }
            println!("page {} of {}", page.page, page.page_count());
            Ok(())
        }
        SmsCmd::Recipients { message_id } => {
            let recipients = admin::message_recipients(store, message_id)?;
            if json {
                return print_json(&recipients);
            }
            println!("{:>5}  {:<15}  {:<10}  PROVIDER ID", "ID", "PHONE", "STATUS");
            for recipient in &recipients {
                println!(
                    "{:>5}  {:<15}  {:<10}  {}",
                    recipient.id,
                    recipient.phone,
                    recipient.status.label(),
                    recipient.provider_message_id,
                );
            }
            Ok(())
        }
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
