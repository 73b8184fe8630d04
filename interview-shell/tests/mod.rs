use interview_core::{Language, Navigator, PanelConfig, RecordingControl, RecordingStatusSource};
use interview_remote::ExecutionResult;
use interview_shell::commands::{CommandParser, FontChange, PanelCommand, RecordCommand};
use interview_shell::config::{ShellArgs, apply_env_overrides, resolve_config_path};
use interview_shell::navigator::ChannelNavigator;
use interview_shell::recorder::{PROCESSING, RECORDING, SimulatedRecorder};
use interview_shell::runs::RunSlot;
use interview_shell::util::panic_message;

use std::path::PathBuf;
use std::time::Duration;

fn args(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

// ════════════════════════════════════════════════════════════════
// Command parsing
// ════════════════════════════════════════════════════════════════

#[test]
fn test_parse_edit_expands_newlines() {
    assert_eq!(
        CommandParser::parse("edit abc\\ndef"),
        PanelCommand::Edit("abc\ndef".to_string())
    );
}

#[test]
fn test_parse_edit_keeps_inner_spacing() {
    assert_eq!(
        CommandParser::parse("edit   x  =  1"),
        PanelCommand::Edit("x  =  1".to_string())
    );
}

#[test]
fn test_parse_select_range_and_caret() {
    assert_eq!(CommandParser::parse("select 1 6"), PanelCommand::Select(1, 6));
    assert_eq!(CommandParser::parse("select 4"), PanelCommand::Select(4, 4));
}

#[test]
fn test_parse_select_rejects_garbage() {
    assert!(matches!(
        CommandParser::parse("select a b"),
        PanelCommand::Unknown(_)
    ));
    assert!(matches!(
        CommandParser::parse("select 1 2 3"),
        PanelCommand::Unknown(_)
    ));
}

#[test]
fn test_parse_lang() {
    assert_eq!(
        CommandParser::parse("lang python"),
        PanelCommand::Lang(Language::Python)
    );
    match CommandParser::parse("lang cobol") {
        PanelCommand::Unknown(reason) => assert!(reason.contains("cobol")),
        other => panic!("Expected Unknown, got {other:?}"),
    }
}

#[test]
fn test_parse_font_and_recorder() {
    assert_eq!(
        CommandParser::parse("font +"),
        PanelCommand::Font(FontChange::Increase)
    );
    assert_eq!(
        CommandParser::parse("font -"),
        PanelCommand::Font(FontChange::Decrease)
    );
    assert_eq!(
        CommandParser::parse("rec start"),
        PanelCommand::Record(RecordCommand::Start)
    );
    assert_eq!(
        CommandParser::parse("rec stop"),
        PanelCommand::Record(RecordCommand::Stop)
    );
}

#[test]
fn test_parse_simple_words() {
    assert_eq!(CommandParser::parse("run"), PanelCommand::Run);
    assert_eq!(CommandParser::parse("  done  "), PanelCommand::Done);
    assert_eq!(CommandParser::parse("exit"), PanelCommand::Quit);
    assert_eq!(CommandParser::parse(""), PanelCommand::Empty);
    assert_eq!(CommandParser::parse("load"), PanelCommand::Unknown("load needs a path".to_string()));
}

// ════════════════════════════════════════════════════════════════
// Arguments & config discovery
// ════════════════════════════════════════════════════════════════

#[test]
fn test_shell_args_parse() {
    let parsed = ShellArgs::parse(args(&["--config", "/tmp/p.json", "--time-limit", "1800"])).unwrap();
    assert_eq!(parsed.config, Some(PathBuf::from("/tmp/p.json")));
    assert_eq!(parsed.time_limit, Some(1800));
}

#[test]
fn test_shell_args_errors() {
    assert!(ShellArgs::parse(args(&["--config"])).is_err());
    assert!(ShellArgs::parse(args(&["--time-limit", "soon"])).is_err());
    assert!(ShellArgs::parse(args(&["--verbose"])).is_err());
}

#[test]
fn test_explicit_config_beats_env() {
    let parsed = ShellArgs {
        config: Some(PathBuf::from("/a.json")),
        time_limit: None,
    };
    assert_eq!(
        resolve_config_path(&parsed, Some("/b.json".to_string())),
        Some(PathBuf::from("/a.json"))
    );
}

#[test]
fn test_env_config_used_without_flag() {
    assert_eq!(
        resolve_config_path(&ShellArgs::default(), Some("/b.json".to_string())),
        Some(PathBuf::from("/b.json"))
    );
}

#[test]
fn test_env_overrides_apply() {
    let mut config = PanelConfig::default();
    apply_env_overrides(
        &mut config,
        Some("https://interview.example".to_string()),
        Some("sid=42".to_string()),
    );
    assert_eq!(config.api_base, "https://interview.example");
    assert_eq!(config.session_cookie.as_deref(), Some("sid=42"));
}

#[test]
fn test_blank_env_overrides_ignored() {
    let mut config = PanelConfig::default();
    apply_env_overrides(&mut config, Some("  ".to_string()), None);
    assert_eq!(config.api_base, PanelConfig::default().api_base);
    assert_eq!(config.session_cookie, None);
}

// ════════════════════════════════════════════════════════════════
// Simulated recorder & navigator
// ════════════════════════════════════════════════════════════════

#[tokio::test(start_paused = true)]
async fn test_recorder_lifecycle() {
    let (recorder, status) = SimulatedRecorder::start(Duration::from_millis(1500));
    assert!(status.current().is_ready());

    recorder.start_recording();
    assert_eq!(status.current().as_str(), RECORDING);

    recorder.stop_recording();
    assert_eq!(status.current().as_str(), PROCESSING);

    tokio::time::sleep(Duration::from_millis(1000)).await;
    assert_eq!(status.current().as_str(), PROCESSING);

    tokio::time::sleep(Duration::from_millis(600)).await;
    assert!(status.current().is_ready());
}

#[tokio::test(start_paused = true)]
async fn test_recorder_ignores_start_while_processing() {
    let (recorder, status) = SimulatedRecorder::start(Duration::from_secs(1));
    recorder.start_recording();
    recorder.stop_recording();
    recorder.start_recording();
    assert_eq!(status.current().as_str(), PROCESSING);
}

#[test]
fn test_recorder_stop_when_idle_is_noop() {
    // No spawn happens, so no runtime is needed.
    let (recorder, status) = SimulatedRecorder::start(Duration::from_secs(1));
    recorder.stop_recording();
    assert!(status.current().is_ready());
    assert!(recorder.status().is_ready());
}

#[test]
fn test_navigator_delivers_route() {
    let (navigator, mut rx) = ChannelNavigator::new();
    navigator.navigate("/demo").unwrap();
    assert_eq!(rx.try_recv().unwrap(), "/demo");
}

#[test]
fn test_navigator_errors_when_shell_gone() {
    let (navigator, rx) = ChannelNavigator::new();
    drop(rx);
    assert!(navigator.navigate("/").is_err());
}

#[test]
fn test_panic_message_reads_payload() {
    let literal = std::panic::catch_unwind(|| panic!("static text")).unwrap_err();
    assert_eq!(panic_message(literal.as_ref()), "static text");

    let formatted = std::panic::catch_unwind(|| panic!("code {}", 7)).unwrap_err();
    assert_eq!(panic_message(formatted.as_ref()), "code 7");

    let opaque = std::panic::catch_unwind(|| std::panic::panic_any(3_u8)).unwrap_err();
    assert_eq!(panic_message(opaque.as_ref()), "<non-string panic payload>");
}

// ════════════════════════════════════════════════════════════════
// Background runs
// ════════════════════════════════════════════════════════════════

fn delayed_run(after: Duration, stdout: &str) -> interview_core::PendingRun {
    let result = ExecutionResult {
        stdout: Some(stdout.to_string()),
        stderr: None,
        transport_error: false,
    };
    Box::pin(async move {
        tokio::time::sleep(after).await;
        result
    })
}

#[tokio::test(start_paused = true)]
async fn test_run_slot_reports_without_blocking() {
    let (mut runs, mut results) = RunSlot::new();
    assert!(runs.start(delayed_run(Duration::from_secs(30), "42\n")));
    assert!(runs.is_busy());

    // The caller is free while the run is pending.
    tokio::time::sleep(Duration::from_secs(10)).await;
    assert!(results.try_recv().is_err());
    assert!(runs.is_busy());

    let result = results.recv().await.unwrap();
    assert_eq!(result.output(), "42\n");
    runs.finish();
    assert!(!runs.is_busy());
}

#[tokio::test(start_paused = true)]
async fn test_run_slot_refuses_second_run() {
    let (mut runs, mut results) = RunSlot::new();
    assert!(runs.start(delayed_run(Duration::from_secs(1), "first")));
    assert!(!runs.start(delayed_run(Duration::ZERO, "second")));

    assert_eq!(results.recv().await.unwrap().output(), "first");
    runs.finish();
    assert!(runs.start(delayed_run(Duration::ZERO, "third")));
    assert_eq!(results.recv().await.unwrap().output(), "third");
}

#[tokio::test(start_paused = true)]
async fn test_run_slot_cancel_drops_result() {
    let (mut runs, mut results) = RunSlot::new();
    runs.start(delayed_run(Duration::from_secs(1), "late"));
    runs.cancel();
    assert!(!runs.is_busy());

    tokio::time::sleep(Duration::from_secs(5)).await;
    assert!(results.try_recv().is_err());
}
