use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::sync::mpsc;

use chat_onboarding::cli::{self, Command, ONBOARDING_HELP, Reply, THREAD_HELP, ThreadCommand};
use chat_onboarding::config::{FlowConfig, ThreadConfig};
use chat_onboarding::error::Result;
use chat_onboarding::onboarding::{Navigator, OnboardingFlow, TokioDelay};
use chat_onboarding::thread::model::{Message, demo_media, demo_messages, demo_user};
use chat_onboarding::thread::{ProfilePanel, ThreadView};

type InputLines = Lines<BufReader<Stdin>>;

/// Signals the event loop that login succeeded.
struct HomeRedirect {
    tx: mpsc::UnboundedSender<()>,
}

impl Navigator for HomeRedirect {
    fn go_home(&self) {
        let _ = self.tx.send(());
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let flow_config = FlowConfig::from_env();
    let thread_config = ThreadConfig::from_env();

    eprintln!("💬 Chat Onboarding v{}", env!("CARGO_PKG_VERSION"));
    eprintln!(
        "   Delays: login {}ms, suggestion {}ms, bio {}ms",
        flow_config.login_redirect_delay.as_millis(),
        flow_config.suggestion_delay.as_millis(),
        flow_config.bio_finish_delay.as_millis(),
    );
    eprintln!("   Type 'help' for commands. /quit to exit.\n");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    // Logging out of the thread starts a fresh onboarding session.
    while run_onboarding(flow_config.clone(), &mut lines).await? {
        if !run_thread(&thread_config, &mut lines).await? {
            break;
        }
    }
    Ok(())
}

/// Drive onboarding until login succeeds (`true`) or input ends (`false`).
async fn run_onboarding(config: FlowConfig, lines: &mut InputLines) -> Result<bool> {
    let (delay, mut timers) = TokioDelay::new();
    let (home_tx, mut home_rx) = mpsc::unbounded_channel();
    let mut flow = OnboardingFlow::new(config, Arc::new(delay), Arc::new(HomeRedirect { tx: home_tx }));
    tracing::info!(session = %flow.session(), "Onboarding started");

    eprintln!("[{}] {}", flow.stage(), flow.stage().title());
    eprint!("> ");

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    flow.teardown();
                    return Ok(false);
                };
                if line.trim().is_empty() {
                    eprint!("> ");
                    continue;
                }
                let cmd = match line.parse::<Command>() {
                    Ok(cmd) => cmd,
                    Err(e) => {
                        eprintln!("{e}");
                        eprint!("> ");
                        continue;
                    }
                };
                match cli::apply(&mut flow, cmd) {
                    Ok(Reply::Transition(t)) => eprintln!("{}", cli::render_transition(&t)),
                    Ok(Reply::Edited) => {}
                    Ok(Reply::Snapshot(snapshot)) => println!("{}", serde_json::to_string_pretty(&snapshot)?),
                    Ok(Reply::Help) => eprintln!("{ONBOARDING_HELP}"),
                    Ok(Reply::Quit) => {
                        flow.teardown();
                        return Ok(false);
                    }
                    Err(e) => eprintln!("{e}"),
                }
                eprint!("> ");
            }
            Some(timer) = timers.recv() => {
                if let Some(t) = flow.handle_timer(timer) {
                    eprintln!("\n{}", cli::render_transition(&t));
                    eprint!("> ");
                }
            }
            Some(()) = home_rx.recv() => {
                flow.teardown();
                eprintln!("\nWelcome home.\n");
                return Ok(true);
            }
        }
    }
}

/// Show the demo conversation and accept compose input. Returns `true` on logout.
async fn run_thread(config: &ThreadConfig, lines: &mut InputLines) -> Result<bool> {
    let mut view = ThreadView::new(config);
    let mut messages = demo_messages(view.local_user_id());
    let media = demo_media();

    view.select(demo_user());
    view.set_messages(Arc::from(messages.clone()));
    println!("{}", serde_json::to_string_pretty(&view.render())?);
    eprint!("> ");

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            eprint!("> ");
            continue;
        }
        let cmd = match line.parse::<ThreadCommand>() {
            Ok(cmd) => cmd,
            Err(e) => {
                eprintln!("{e}");
                eprint!("> ");
                continue;
            }
        };

        let sent = match cmd {
            ThreadCommand::Say(text) => {
                view.set_compose_text(text);
                view.press_enter(false)
            }
            ThreadCommand::Image(url) => {
                view.attach_image(url);
                None
            }
            ThreadCommand::Send => view.send(),
            ThreadCommand::Open => {
                view.select(demo_user());
                println!("{}", serde_json::to_string_pretty(&view.render())?);
                None
            }
            ThreadCommand::Back => {
                view.back();
                println!("{}", serde_json::to_string_pretty(&view.render())?);
                None
            }
            ThreadCommand::Profile => {
                let panel = ProfilePanel::for_user(view.selected(), &media);
                println!("{}", serde_json::to_string_pretty(&panel)?);
                None
            }
            ThreadCommand::Help => {
                eprintln!("{THREAD_HELP}");
                None
            }
            ThreadCommand::Logout => {
                tracing::info!(user_id = %view.local_user_id(), "Logged out");
                eprintln!("Logged out.\n");
                return Ok(true);
            }
            ThreadCommand::Quit => break,
        };

        if let Some(event) = sent {
            let mut message = Message::text(view.local_user_id(), &event.text, chrono::Utc::now());
            message.image = event.image;
            messages.push(message);
            if view.set_messages(Arc::from(messages.clone())) {
                tracing::debug!(count = messages.len(), "Scrolled to newest message");
            }
            println!("{}", serde_json::to_string_pretty(&view.render())?);
        }
        eprint!("> ");
    }
    Ok(false)
}
