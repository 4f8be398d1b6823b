//! Integration tests for the voice input flow
//!
//! Drives the controller through realistic event sequences with a
//! simulated clock, covering the silence auto-send contract, command
//! interception, and the continuous-listening restart loop.

use std::time::{Duration, Instant};

use probotics::messages::Attachment;
use probotics::voice::{
    RecognizerError, RecognizerEvent, VoiceConfig, VoiceController, VoiceEffect,
};

fn at(base: Instant, ms: u64) -> Instant {
    base + Duration::from_millis(ms)
}

fn start_listening(base: Instant) -> VoiceController {
    let mut ctl = VoiceController::new(VoiceConfig::default());
    assert_eq!(ctl.toggle_voice(base), vec![VoiceEffect::StartRecognition]);
    ctl.on_event(RecognizerEvent::Started, base);
    ctl
}

fn sent(effects: &[VoiceEffect]) -> Option<(String, usize)> {
    effects.iter().find_map(|e| match e {
        VoiceEffect::Send { text, attachments } => Some((text.clone(), attachments.len())),
        _ => None,
    })
}

/// "cámara" by voice with the camera off activates the camera and sends
/// no text; a dictated "hola" followed by silence sends exactly "hola"
/// with zero attachments after 2000 ms.
#[test]
fn camera_command_then_typed_hola() {
    let base = Instant::now();
    let mut ctl = start_listening(base);

    let effects = ctl.on_event(RecognizerEvent::Final("cámara".into()), base);
    assert_eq!(effects, vec![VoiceEffect::CameraOn]);
    assert_eq!(ctl.pending_input(), "");
    ctl.set_camera_active(true);

    // Nothing pending: silence alone sends nothing.
    assert!(sent(&ctl.poll(at(base, 2000))).is_none());

    // User dictates "hola" and goes quiet.
    ctl.on_event(RecognizerEvent::Final("hola".into()), at(base, 3000));
    assert!(sent(&ctl.poll(at(base, 4999))).is_none());
    let effects = ctl.poll(at(base, 5000));
    assert_eq!(sent(&effects), Some(("hola".to_string(), 0)));
}

#[test]
fn dictation_with_short_gaps_accumulates_then_sends_once() {
    let base = Instant::now();
    let mut ctl = start_listening(base);

    let segments = ["escribe un resumen", "del informe", "de ayer"];
    let mut t = 0;
    for segment in segments {
        ctl.on_event(RecognizerEvent::Final(segment.into()), at(base, t));
        // Polls inside the gap never fire.
        assert!(sent(&ctl.poll(at(base, t + 1900))).is_none());
        t += 1900;
    }

    let effects = ctl.poll(at(base, t + 100));
    assert_eq!(
        sent(&effects),
        Some(("escribe un resumen del informe de ayer".to_string(), 0))
    );
    // Exactly once.
    assert!(sent(&ctl.poll(at(base, t + 5000))).is_none());
}

#[test]
fn continuous_mode_survives_session_ends_until_toggled_off() {
    let base = Instant::now();
    let mut ctl = start_listening(base);

    for round in 0..3u64 {
        let t = round * 1000;
        ctl.on_event(RecognizerEvent::Ended, at(base, t));
        let effects = ctl.poll(at(base, t + 150));
        assert_eq!(effects, vec![VoiceEffect::StartRecognition]);
        ctl.on_event(RecognizerEvent::Started, at(base, t + 160));
    }

    // Manual stop wins over the loop.
    ctl.toggle_voice(at(base, 5000));
    ctl.on_event(RecognizerEvent::Ended, at(base, 5010));
    assert!(ctl.poll(at(base, 6000)).is_empty());
}

#[test]
fn permission_denied_stops_the_loop_for_good() {
    let base = Instant::now();
    let mut ctl = start_listening(base);

    ctl.on_event(
        RecognizerEvent::Error(RecognizerError::PermissionDenied),
        base,
    );
    ctl.on_event(RecognizerEvent::Ended, at(base, 5));
    for t in [200, 1000, 10_000] {
        assert!(ctl.poll(at(base, t)).is_empty());
    }
}

#[test]
fn stale_results_after_auto_send_are_dropped() {
    let base = Instant::now();
    let mut ctl = start_listening(base);

    ctl.on_event(RecognizerEvent::Final("manda esto".into()), base);
    let effects = ctl.poll(at(base, 2000));
    assert_eq!(sent(&effects), Some(("manda esto".to_string(), 0)));

    // The recognizer flushes its buffer again inside the lock window.
    ctl.on_event(RecognizerEvent::Final("manda esto".into()), at(base, 2200));
    ctl.on_event(RecognizerEvent::Final("manda".into()), at(base, 2700));
    assert_eq!(ctl.pending_input(), "");

    // After the lock expires, new speech is accepted again.
    ctl.on_event(RecognizerEvent::Final("nuevo mensaje".into()), at(base, 2900));
    assert_eq!(ctl.pending_input(), "nuevo mensaje");
}

#[test]
fn attachments_ride_along_with_auto_send() {
    let base = Instant::now();
    let mut ctl = start_listening(base);

    ctl.push_attachment(Attachment::binary("frame.png", "image/png", "QUJD"));
    ctl.on_event(RecognizerEvent::Final("describe la imagen".into()), base);

    let effects = ctl.poll(at(base, 2000));
    assert_eq!(sent(&effects), Some(("describe la imagen".to_string(), 1)));
    assert!(ctl.attachments().is_empty());
}

#[test]
fn explicit_send_command_flushes_immediately() {
    let base = Instant::now();
    let mut ctl = start_listening(base);

    ctl.on_event(RecognizerEvent::Final("apunta esto".into()), base);
    let effects = ctl.on_event(RecognizerEvent::Final("enviar".into()), at(base, 800));
    assert_eq!(sent(&effects), Some(("apunta esto".to_string(), 0)));
    assert_eq!(ctl.pending_input(), "");
}

#[test]
fn screen_and_terminal_commands_fire_once() {
    let base = Instant::now();
    let mut ctl = start_listening(base);

    let effects = ctl.on_event(RecognizerEvent::Final("pantalla".into()), base);
    assert_eq!(effects, vec![VoiceEffect::ScreenShareOn]);
    ctl.set_screen_share_active(true);
    assert!(ctl
        .on_event(RecognizerEvent::Final("pantalla".into()), at(base, 900))
        .is_empty());

    let effects = ctl.on_event(RecognizerEvent::Final("abrir terminal".into()), at(base, 1800));
    assert_eq!(effects, vec![VoiceEffect::OpenTerminal]);
}

#[test]
fn manual_and_auto_send_mutually_exclusive() {
    let base = Instant::now();
    let mut ctl = start_listening(base);

    // Manual send arms the lock...
    ctl.set_input("primero");
    let effects = ctl.manual_send(base);
    assert_eq!(sent(&effects), Some(("primero".to_string(), 0)));

    // ...so a silence deadline expiring right after is a no-op.
    ctl.on_event(RecognizerEvent::Final("segundo".into()), at(base, 600));
    assert!(sent(&ctl.poll(at(base, 2600))).is_some());

    // And an auto-send lock blocks manual sends symmetrically.
    ctl.set_input("tercero");
    assert!(ctl.manual_send(at(base, 2700)).is_empty());
}
