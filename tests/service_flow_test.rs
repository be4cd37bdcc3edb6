//! End-to-end flows through the runtime bridge and the stub service.

use std::sync::Arc;
use std::time::Duration;

use clone_os::app::App;
use clone_os::config;
use clone_os::core::Context;
use clone_os::domain::{CodeFile, NotificationKind, Profile};
use clone_os::event::handle_key;
use clone_os::infrastructure::RuntimeBridge;
use clone_os::service::{ServiceCall, ServiceOutput, StubAiService};
use clone_os::shell::Registry;
use clone_os::ui;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::backend::TestBackend;
use ratatui::buffer::Buffer;
use ratatui::Terminal;

const WAIT: Duration = Duration::from_secs(3);

fn bridge(fail_every: Option<u64>) -> RuntimeBridge {
    let service = StubAiService::new(Duration::ZERO, fail_every);
    RuntimeBridge::new(Arc::new(service), WAIT).unwrap()
}

fn app(bridge: &RuntimeBridge) -> App {
    let ctx = Context::new(Profile::mock(), bridge.client());
    let mut app = App::new(Registry::default_apps(), ctx);
    app.system_clipboard = false;
    app
}

fn buffer_text(buffer: &Buffer) -> String {
    let area = buffer.area;
    let mut out = String::new();
    for y in area.y..area.bottom() {
        for x in area.x..area.right() {
            out.push_str(buffer.get(x, y).symbol());
        }
        out.push('\n');
    }
    out
}

fn render_app(app: &mut App) -> String {
    let mut terminal = Terminal::new(TestBackend::new(120, 36)).unwrap();
    terminal.draw(|f| ui::draw(f, app)).unwrap();
    buffer_text(terminal.backend().buffer())
}

fn type_line(app: &mut App, text: &str) {
    for ch in text.chars() {
        handle_key(app, KeyEvent::new(KeyCode::Char(ch), KeyModifiers::NONE));
    }
    handle_key(app, KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE));
}

fn deliver_next(app: &mut App, bridge: &RuntimeBridge) {
    let reply = bridge.recv_timeout(WAIT).expect("service reply");
    app.ingest_reply(reply);
}

#[test]
fn test_analyze_code_returns_issues() {
    let bridge = bridge(None);
    let ticket = bridge
        .client()
        .submit(ServiceCall::AnalyzeCode {
            file_name: "main.py".into(),
            content: "x = eval(input())".into(),
        })
        .unwrap();
    let reply = bridge.recv_timeout(WAIT).expect("service reply");
    assert_eq!(reply.ticket, ticket);
    match reply.result {
        Ok(ServiceOutput::Analysis(analysis)) => assert!(!analysis.issues.is_empty()),
        other => panic!("unexpected reply: {other:?}"),
    }
}

#[test]
fn test_chat_reply_is_rendered() {
    let bridge = bridge(None);
    let mut app = app(&bridge);
    app.select_app("chat");
    type_line(&mut app, "status report");
    deliver_next(&mut app, &bridge);
    let text = render_app(&mut app);
    assert!(text.contains("Generated content based on your prompt"));
}

#[test]
fn test_fault_injection_shows_inline_error() {
    let bridge = bridge(Some(1));
    let mut app = app(&bridge);
    app.select_app("chat");
    type_line(&mut app, "hello");
    deliver_next(&mut app, &bridge);
    let text = render_app(&mut app);
    assert!(text.contains("neural link dropped"));
    assert!(!app.shell.is_failed());
}

#[test]
fn test_stale_reply_after_remount_is_ignored() {
    let bridge = bridge(None);
    let mut app = app(&bridge);
    app.select_app("chat");
    type_line(&mut app, "first question");

    app.select_app("terminal");
    app.select_app("chat");
    deliver_next(&mut app, &bridge);

    let text = render_app(&mut app);
    assert!(!text.contains("Generated content based on your prompt"));
    assert!(!app.shell.is_failed());
}

#[test]
fn test_risky_code_raises_warning_notification() {
    let bridge = bridge(None);
    let mut app = app(&bridge);
    app.ctx.push_code(CodeFile::new("risky.py", "value = eval(input())"));
    app.select_app("code");
    handle_key(&mut app, KeyEvent::new(KeyCode::Char('a'), KeyModifiers::CONTROL));
    deliver_next(&mut app, &bridge);

    let last = app.notifications.back().expect("notification");
    assert_eq!(last.kind, NotificationKind::Warning);
    assert_eq!(last.title, "Code Lab");
}

#[test]
fn test_config_overrides_defaults() {
    let config = config::parse(
        r#"
tick_rate_ms = 100
export_dir = "/tmp/clone-os-exports"

[service]
latency_ms = 0
fail_every = 3

[log]
filter = "clone_os=debug"
"#,
    )
    .unwrap();
    assert_eq!(config.tick_rate(), Duration::from_millis(100));
    assert_eq!(config.service.fail_every(), Some(3));
    assert_eq!(config.service.timeout_ms, 5_000);
    assert_eq!(config.log.filter, "clone_os=debug");
    assert_eq!(
        config.export_dir(),
        std::path::PathBuf::from("/tmp/clone-os-exports")
    );

    assert!(config::parse("tick_rate_ms = \"fast\"").is_err());
}
