use bytes::Bytes;
use interview_audio::{AudioClip, AudioError, AudioFormat, AudioPlayer, CommandPlayer};

fn cmd(parts: &[&str]) -> Vec<String> {
    parts.iter().map(|s| s.to_string()).collect()
}

fn mp3_clip() -> AudioClip {
    AudioClip::decode(Bytes::from_static(&[0xFF, 0xFB, 0x90, 0x64, 0x00, 0x00])).unwrap()
}

// ============================================================================
// AudioClip Tests
// ============================================================================

#[test]
fn test_decode_id3_tagged() {
    let clip = AudioClip::decode(Bytes::from_static(b"ID3\x04\x00\x00\x00\x00\x00\x00")).unwrap();
    assert_eq!(clip.format(), AudioFormat::Mpeg);
    assert_eq!(clip.len(), 10);
}

#[test]
fn test_decode_bare_frame() {
    let clip = mp3_clip();
    assert_eq!(clip.format().mime(), "audio/mpeg");
    assert_eq!(clip.format().extension(), "mp3");
}

#[test]
fn test_decode_empty_fails() {
    let err = AudioClip::decode(Bytes::new()).unwrap_err();
    assert!(matches!(err, AudioError::Empty));
}

#[test]
fn test_decode_json_body_fails() {
    let err = AudioClip::decode(Bytes::from_static(br#"{"error":"oops"}"#)).unwrap_err();
    match err {
        AudioError::Unrecognized(head) => assert_eq!(head, b"{\"er".to_vec()),
        other => panic!("Expected Unrecognized, got {other:?}"),
    }
}

// ============================================================================
// CommandPlayer Tests
// ============================================================================

#[test]
fn test_player_requires_program() {
    assert!(matches!(
        CommandPlayer::from_command(&[]),
        Err(AudioError::NoPlayer)
    ));
    assert!(matches!(
        CommandPlayer::from_command(&cmd(&["  "])),
        Err(AudioError::NoPlayer)
    ));
}

#[test]
fn test_player_program_name() {
    let player = CommandPlayer::from_command(&cmd(&["ffplay", "-nodisp"])).unwrap();
    assert_eq!(player.program(), "ffplay");
}

#[cfg(unix)]
#[tokio::test]
async fn test_player_success_is_natural_end() {
    let player = CommandPlayer::from_command(&cmd(&["true"])).unwrap();
    player.play(&mp3_clip()).await.unwrap();
}

#[cfg(unix)]
#[tokio::test]
async fn test_player_receives_staged_file() {
    // The clip path arrives as $1; succeed only if it exists and is non-empty.
    let player =
        CommandPlayer::from_command(&cmd(&["sh", "-c", "test -s \"$1\"", "player"])).unwrap();
    player.play(&mp3_clip()).await.unwrap();
}

#[cfg(unix)]
#[tokio::test]
async fn test_player_waits_for_exit() {
    let player =
        CommandPlayer::from_command(&cmd(&["sh", "-c", "sleep 0.2", "player"])).unwrap();
    let started = std::time::Instant::now();
    player.play(&mp3_clip()).await.unwrap();
    assert!(started.elapsed() >= std::time::Duration::from_millis(200));
}

#[cfg(unix)]
#[tokio::test]
async fn test_player_nonzero_exit_fails() {
    let player = CommandPlayer::from_command(&cmd(&["false"])).unwrap();
    let err = player.play(&mp3_clip()).await.unwrap_err();
    assert!(matches!(err, AudioError::PlayerExit(_)));
}

#[tokio::test]
async fn test_player_missing_binary_fails() {
    let player =
        CommandPlayer::from_command(&cmd(&["definitely-not-an-audio-player-xyz"])).unwrap();
    let err = player.play(&mp3_clip()).await.unwrap_err();
    match err {
        AudioError::Spawn { program, .. } => {
            assert_eq!(program, "definitely-not-an-audio-player-xyz")
        }
        other => panic!("Expected Spawn error, got {other:?}"),
    }
}
