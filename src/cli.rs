//! CLI interface for the interview wizard.
//!
//! With no subcommand the interactive wizard opens in the terminal.
//! `compose` drives the same wizard from flags, one step at a time,
//! so scripts get exactly the checks a person would.

mod format;

use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Instant;

use clap::{Args, Parser, Subcommand};
use jiff::civil::Date;
use serde::Serialize;
use tracing::warn;

use crate::config::Config;
use crate::logging;
use crate::mail::{Handoff, HandoffError, MailDraft, SystemMailer};
use crate::model::{Field, InterviewRequest};
use crate::tui::{self, App, HomeScreen};
use crate::wizard::{Progress, Wizard};

use format::{format_config, format_fields, format_slots};

/// Interview: request a technical interview by mail.
#[derive(Debug, Parser)]
#[command(name = "interview", version, after_long_help = USAGE_HELP)]
pub struct Cli {
    /// Config file to read instead of `~/.interview/config.toml`.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Recipient address. Overrides `INTERVIEW_RECIPIENT` and the config file.
    #[arg(long, global = true)]
    to: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

const USAGE_HELP: &str = r#"Examples:
  interview
     → opens the three-step wizard in the terminal
  interview compose --name "Jane Doe" --email jane@co.com --company Acme \
      --position CTO --date 2026-10-20 --time "10:00 AM" \
      --message "Let's discuss the backend architecture."
     → prints the mailto: link
  interview compose ... --open
     → opens the link in the system mail client"#;

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Open the interactive wizard (the default).
    Schedule,

    /// Build a request from flags without the interactive wizard.
    ///
    /// Steps are validated in order: contact details, then date and time,
    /// then the message. The first step that fails is reported with the
    /// fields it is missing.
    Compose(ComposeArgs),

    /// List the selectable time slots.
    Slots,

    /// Show where configuration is read from and the effective settings.
    Config,
}

impl Command {
    /// Whether the command runs the wizard and so writes a log file.
    fn logs(&self) -> bool {
        matches!(self, Self::Schedule | Self::Compose(_))
    }
}

#[derive(Debug, Args)]
pub struct ComposeArgs {
    /// Full name.
    #[arg(long, default_value = "")]
    name: String,

    /// Email address to be contacted at.
    #[arg(long, default_value = "")]
    email: String,

    /// Company name.
    #[arg(long, default_value = "")]
    company: String,

    /// Position being hired for.
    #[arg(long, default_value = "")]
    position: String,

    /// Preferred date, `YYYY-MM-DD`. Must be after today.
    #[arg(long)]
    date: Option<String>,

    /// Preferred time slot, e.g. `"10:00 AM"` or `14:30`.
    #[arg(long)]
    time: Option<String>,

    /// What to discuss. More than 10 characters.
    #[arg(long, default_value = "")]
    message: String,

    /// Open the system mail client instead of printing the link.
    #[arg(long)]
    open: bool,

    /// Print the request, subject, body and link as JSON.
    #[arg(long, conflicts_with = "open")]
    json: bool,
}

/// Run the CLI, returning an error message on failure.
pub fn run() -> Result<(), String> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    let command = cli.command.unwrap_or(Command::Schedule);

    if command.logs()
        && let Some(dir) = config.log_dir()
        && let Err(e) = logging::init(&dir)
    {
        eprintln!("warning: logging disabled: {e}");
    }

    let recipient = config.resolve_recipient(cli.to.as_deref());

    match command {
        Command::Schedule => cmd_schedule(&config, &recipient),
        Command::Compose(args) => cmd_compose(&config, &recipient, &args, today()),
        Command::Slots => {
            for line in format_slots() {
                println!("{line}");
            }
            Ok(())
        }
        Command::Config => {
            for line in format_config(&config, cli.config.as_deref(), &recipient) {
                println!("{line}");
            }
            Ok(())
        }
    }
}

fn today() -> Date {
    jiff::Zoned::now().date()
}

fn cmd_schedule(config: &Config, recipient: &str) -> Result<(), String> {
    let mailer = SystemMailer::new(recipient, config.opener.as_deref());
    let wizard = Wizard::new(config.email_rule(), config.reset_delay());
    let mut app = App::new(wizard, &mailer, HomeScreen::new(recipient), today);
    tui::run(&mut app).map_err(|e| format!("terminal error: {e}"))
}

fn cmd_compose(
    config: &Config,
    recipient: &str,
    args: &ComposeArgs,
    today: Date,
) -> Result<(), String> {
    let mut wizard = Wizard::new(config.email_rule(), config.reset_delay());
    wizard.open(today);

    let mut fields = vec![
        (Field::Name, args.name.as_str()),
        (Field::Email, args.email.as_str()),
        (Field::Company, args.company.as_str()),
        (Field::Position, args.position.as_str()),
        (Field::Message, args.message.as_str()),
    ];
    fields.extend(args.date.as_deref().map(|d| (Field::Date, d)));
    fields.extend(args.time.as_deref().map(|t| (Field::Time, t)));

    for (field, value) in fields {
        wizard
            .update(field, value)
            .map_err(|e| format!("--{field}: {e}"))?;
    }

    let handoff: Box<dyn Handoff> = if args.open {
        Box::new(SystemMailer::new(recipient, config.opener.as_deref()))
    } else {
        Box::new(Printer {
            recipient: recipient.to_string(),
            json: args.json,
        })
    };

    loop {
        let progress = wizard
            .submit(handoff.as_ref(), Instant::now())
            .map_err(|e| format!("failed to schedule interview: {e}"))?;
        match progress {
            Progress::Moved(_) => {}
            Progress::Submitted(_) => break,
            Progress::Blocked(step) => {
                return Err(format!(
                    "{step} is incomplete: {}",
                    format_fields(&wizard.missing())
                ));
            }
            Progress::Ignored => {
                warn!("compose ended with the wizard not editing");
                return Err("the request could not be submitted".to_string());
            }
        }
    }

    if args.open {
        eprintln!("Opened mail composer for {recipient}");
    }
    Ok(())
}

/// Hand-off that prints the composed link (or JSON) instead of opening it.
struct Printer {
    recipient: String,
    json: bool,
}

#[derive(Serialize)]
struct ComposeOutput<'a> {
    request: &'a InterviewRequest,
    mail: &'a MailDraft,
    uri: String,
}

impl Handoff for Printer {
    fn hand_off(&self, request: &InterviewRequest) -> Result<(), HandoffError> {
        let mail = MailDraft::compose(&self.recipient, request);
        let text = if self.json {
            let output = ComposeOutput {
                request,
                uri: mail.uri(),
                mail: &mail,
            };
            serde_json::to_string_pretty(&output).map_err(io::Error::other)?
        } else {
            mail.uri()
        };
        writeln!(io::stdout().lock(), "{text}")?;
        Ok(())
    }
}
