use anyhow::{Context, Result};
use interview_audio::CommandPlayer;
use interview_core::{DoneSource, EditorPanel, PanelCollaborators, PanelConfig, SelectionRange};
use interview_remote::{HttpClosingEndpoint, PistonClient};
use interview_shell::commands::{CommandParser, FontChange, HELP, PanelCommand, RecordCommand};
use interview_shell::config::{self, ShellArgs};
use interview_shell::navigator::ChannelNavigator;
use interview_shell::recorder::SimulatedRecorder;
use interview_shell::runs::RunSlot;
use interview_shell::util;

use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

/// How long the simulated recorder spends flushing after a stop.
const FINALIZE_DELAY: Duration = Duration::from_millis(1500);

#[tokio::main]
async fn main() -> Result<()> {
    util::init_tracing();
    util::install_panic_hook();

    let args = ShellArgs::parse(std::env::args().skip(1))?;
    let config = config::load(&args)?;
    let (mut panel, mut navigations) = build_panel(&config)?;

    tracing::info!("Interview shell starting");
    println!("Code Editor ({}). Type 'help' for commands.", panel.language());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;
    let (mut runs, mut run_results) = RunSlot::new();

    let time_limit = args.time_limit;
    let deadline = async move {
        match time_limit {
            Some(secs) => tokio::time::sleep(Duration::from_secs(secs)).await,
            None => std::future::pending::<()>().await,
        }
    };
    tokio::pin!(deadline);
    let mut deadline_fired = false;

    loop {
        tokio::select! {
            Some(route) = navigations.recv() => {
                println!("→ navigated to {}", route);
                break;
            }
            Some(result) = run_results.recv() => {
                runs.finish();
                println!("Output:\n{}", result.output());
            }
            () = &mut deadline, if !deadline_fired => {
                deadline_fired = true;
                println!("Time is up.");
                panel.done_interview(DoneSource::TimerExpired);
            }
            line = lines.next_line(), if stdin_open => {
                match line.context("failed to read stdin")? {
                    Some(line) => {
                        if !handle(&mut panel, &mut runs, &line).await? {
                            break;
                        }
                    }
                    None => stdin_open = false,
                }
            }
        }

        if panel.termination_state().is_terminal() && navigations.is_empty() {
            break;
        }
        // With input closed, stay only for a pending run or an ending interview.
        if !stdin_open && !runs.is_busy() && !panel.termination().is_triggered() {
            break;
        }
    }

    runs.cancel();
    panel.dispose();
    Ok(())
}

fn build_panel(config: &PanelConfig) -> Result<(EditorPanel, mpsc::UnboundedReceiver<String>)> {
    let executor = PistonClient::new(&config.execute_url, config.request_timeout())
        .context("failed to build execution client")?;
    let closing = HttpClosingEndpoint::new(
        &config.api_base,
        &config.end_path,
        config.session_cookie.clone(),
        config.request_timeout(),
    )
    .context("failed to build end-of-interview client")?;
    let player = CommandPlayer::from_command(&config.player)?;
    let (recorder, status) = SimulatedRecorder::start(FINALIZE_DELAY);
    let (navigator, navigations) = ChannelNavigator::new();

    let panel = EditorPanel::new(
        config.clone(),
        PanelCollaborators {
            executor: Arc::new(executor),
            recorder: Arc::new(recorder),
            status: Arc::new(status),
            closing: Arc::new(closing),
            player: Arc::new(player),
            navigator: Arc::new(navigator),
        },
    );
    Ok((panel, navigations))
}

/// Returns `false` when the shell should exit.
async fn handle(panel: &mut EditorPanel, runs: &mut RunSlot, line: &str) -> Result<bool> {
    match CommandParser::parse(line) {
        PanelCommand::Edit(text) => {
            panel.set_code(&text);
            println!("{} line(s)", panel.code().lines().count());
        }
        PanelCommand::Load(path) => match tokio::fs::read_to_string(&path).await {
            Ok(text) => {
                panel.set_code(&text);
                println!("Loaded {}", path);
            }
            Err(e) => println!("Cannot read {}: {}", path, e),
        },
        PanelCommand::Append(line) => {
            let mut code = panel.code();
            if !code.is_empty() {
                code.push('\n');
            }
            code.push_str(&line);
            panel.set_code(&code);
        }
        PanelCommand::Select(from, to) => match panel.on_update(SelectionRange::new(from, to)) {
            Ok(()) => println!("{}", panel.highlighted()),
            Err(e) => println!("{}", e),
        },
        PanelCommand::Lang(language) => {
            panel.set_language(language);
            println!("Language: {}", language);
        }
        PanelCommand::Font(change) => {
            let size = match change {
                FontChange::Increase => panel.increase_font_size(),
                FontChange::Decrease => panel.decrease_font_size(),
            };
            println!("Font size: {}px", size);
        }
        PanelCommand::Run => {
            if runs.is_busy() {
                println!("Still running the previous submission.");
            } else {
                let run = panel.start_run();
                println!("Output:\n{}", panel.output());
                runs.start(run);
            }
        }
        PanelCommand::Record(RecordCommand::Start) => panel.start_recording(),
        PanelCommand::Record(RecordCommand::Stop) => panel.stop_recording(),
        PanelCommand::Done => {
            if !panel.done_interview(DoneSource::Button) {
                println!("Already ending the interview.");
            }
        }
        PanelCommand::Show => show(panel),
        PanelCommand::Help => println!("{}", HELP),
        PanelCommand::Quit => return Ok(false),
        PanelCommand::Empty => {}
        PanelCommand::Unknown(reason) => println!("{}", reason),
    }
    Ok(true)
}

fn show(panel: &EditorPanel) {
    println!(
        "── {} · {}px · done {} · {}",
        panel.language(),
        panel.font_size(),
        if panel.is_done_enabled() { "enabled" } else { "disabled" },
        panel.termination_state()
    );
    for (i, line) in panel.code().lines().enumerate() {
        println!("{:>4} │ {}", i + 1, line);
    }
    let highlighted = panel.highlighted();
    if !highlighted.is_empty() {
        println!("Highlighted:\n{}", highlighted);
    }
    println!("Output:\n{}", panel.output());
}
