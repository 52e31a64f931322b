use anyhow::Result;
use clap::{Parser, Subcommand};
use parlor::console::is_exit_command;
use parlor::{run_console, Bot, BotKind, ChatWidget, ConsoleOptions, TerminalSink};
use parlor_agent::RunConfig;
use parlor_config::Settings;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "parlor")]
#[command(version, about = "Chat bots on hosted models")]
struct Cli {
    /// Settings file (defaults to <config dir>/parlor/parlor.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Maximum model calls per message
    #[arg(long, global = true)]
    max_turns: Option<usize>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the available bots
    List,

    /// Ask a bot questions at a console prompt
    Ask {
        bot: BotKind,

        /// Answer one question and exit
        #[arg(long)]
        once: bool,
    },

    /// Chat with a bot in widget style
    Chat { bot: BotKind },

    /// Serve a bot's chat widget over HTTP
    Serve {
        bot: BotKind,

        #[arg(short, long, default_value = "8000")]
        port: u16,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let bot = match cli.command {
        Command::List => return list_bots(),
        Command::Ask { bot, .. } | Command::Chat { bot } | Command::Serve { bot, .. } => bot,
    };

    let mut settings = Settings::load(cli.config.as_deref())?;
    if let Some(turns) = cli.max_turns {
        settings.max_turns = turns;
    }
    let config = RunConfig::default().with_max_turns(settings.max_turns);
    let bot = Bot::build(bot, &settings)?;
    info!(bot = %bot.kind(), max_turns = config.max_turns, "Bot ready");

    match cli.command {
        Command::List => {}
        Command::Ask { once, .. } => {
            let stdin = io::stdin();
            run_console(&bot, &config, stdin.lock(), io::stdout(), ConsoleOptions { once }).await?;
        }
        Command::Chat { .. } => {
            chat(&ChatWidget::new(bot, config)).await?;
        }
        Command::Serve { port, .. } => {
            let kind = bot.kind();
            let widget = Arc::new(ChatWidget::new(bot, config));
            println!("Serving the {} bot on http://localhost:{}", kind, port);
            parlor::server::serve(widget, port).await?;
        }
    }

    Ok(())
}

fn list_bots() -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    for kind in BotKind::ALL {
        writeln!(out, "{:<16} {}", kind.name(), kind.about())?;
    }
    Ok(())
}

async fn chat(widget: &ChatWidget) -> Result<()> {
    let sink = TerminalSink::new(io::stdout());
    widget.on_chat_start(&sink).await?;

    let mut lines = io::stdin().lock().lines();
    loop {
        print!("> ");
        io::stdout().flush()?;

        let Some(line) = lines.next().transpose()? else {
            println!();
            break;
        };
        let text = line.trim();
        if text.is_empty() {
            continue;
        }
        if is_exit_command(text) {
            break;
        }
        widget.on_message(&sink, text).await?;
    }

    Ok(())
}
