use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};
use scanline::config::ConsoleProfile;
use scanline::console::io::{MockEventStream, MockRenderStream, RenderCommand};
use scanline::console::models::NoticeLevel;
use scanline::{AppController, StatusFilter, Theme, ThemeStore};
use serde_json::json;
use tempfile::TempDir;
use wiremock::{
    matchers::{method, path, query_param},
    Mock, MockServer, ResponseTemplate,
};

type TestController = AppController<MockEventStream, MockRenderStream>;

fn press(code: KeyCode) -> Event {
    Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
}

fn shift(code: KeyCode) -> Event {
    Event::Key(KeyEvent::new(code, KeyModifiers::SHIFT))
}

async fn mount_scan_list(server: &MockServer, expected_calls: u64) {
    Mock::given(method("POST"))
        .and(path("/api/scanlist"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": "A", "name": "alpha", "target": "a.example", "status": "FINISHED"},
            {"id": "B", "name": "bravo", "target": "b.example", "status": "RUNNING"},
            {"id": "C", "name": "charlie", "target": "c.example", "status": "FINISHED"},
            {"id": "D", "name": "delta", "target": "d.example", "status": "ABORTED"}
        ])))
        .expect(expected_calls)
        .mount(server)
        .await;
}

fn controller(server: &MockServer, prefs: &TempDir) -> TestController {
    let profile = ConsoleProfile {
        server: server.uri(),
        export_dir: Some(prefs.path().join("exports")),
        ..ConsoleProfile::default()
    };
    AppController::with_io_streams(
        profile,
        ThemeStore::new(prefs.path().join("prefs")),
        MockEventStream::empty(),
        MockRenderStream::new(),
    )
    .unwrap()
}

async fn keys(app: &mut TestController, events: Vec<Event>) {
    for event in events {
        app.handle_event(event).unwrap();
    }
    app.settle().await.unwrap();
}

#[tokio::test]
async fn refresh_should_render_filtered_table() {
    let server = MockServer::start().await;
    mount_scan_list(&server, 2).await;
    let prefs = tempfile::tempdir().unwrap();
    let mut app = controller(&server, &prefs);

    keys(&mut app, vec![press(KeyCode::F(5))]).await;
    assert_eq!(app.state().table().row_ids(), vec!["A", "B", "C", "D"]);
    assert!(!app.state().status_line().is_loading());

    keys(&mut app, vec![press(KeyCode::Char('3'))]).await;
    assert_eq!(app.state().filter(), StatusFilter::Finished);
    assert_eq!(app.state().table().row_ids(), vec!["A", "C"]);
    assert_eq!(app.in_flight(), 0);
}

#[tokio::test]
async fn confirmed_delete_should_refresh_once_with_same_filter() {
    let server = MockServer::start().await;
    mount_scan_list(&server, 2).await;
    Mock::given(method("GET"))
        .and(path("/api/scandelete"))
        .and(query_param("id", "A,C"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "Scans deleted."
        })))
        .expect(1)
        .mount(&server)
        .await;
    let prefs = tempfile::tempdir().unwrap();
    let mut app = controller(&server, &prefs);

    keys(&mut app, vec![press(KeyCode::Char('3'))]).await;
    keys(
        &mut app,
        vec![
            press(KeyCode::Char(' ')),
            press(KeyCode::Char('j')),
            shift(KeyCode::Char(' ')),
            press(KeyCode::Char('d')),
        ],
    )
    .await;
    assert_eq!(
        app.state().status_line().prompt(),
        Some("Delete 2 scan(s)? (y/n)")
    );

    keys(&mut app, vec![press(KeyCode::Char('y'))]).await;

    let notice = app.state().status_line().notice().unwrap();
    assert_eq!(notice.level, NoticeLevel::Success);
    assert_eq!(notice.text, "Scans deleted.");
    assert_eq!(app.state().filter(), StatusFilter::Finished);
    assert!(app.state().prompt().is_none());
    assert_eq!(app.state().selection().checked_count(), 0);
}

#[tokio::test]
async fn declined_delete_should_not_call_server() {
    let server = MockServer::start().await;
    mount_scan_list(&server, 1).await;
    Mock::given(method("GET"))
        .and(path("/api/scandelete"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    let prefs = tempfile::tempdir().unwrap();
    let mut app = controller(&server, &prefs);

    keys(&mut app, vec![press(KeyCode::F(5))]).await;
    keys(
        &mut app,
        vec![
            press(KeyCode::Char('a')),
            press(KeyCode::Char('d')),
            press(KeyCode::Char('n')),
        ],
    )
    .await;

    assert!(app.state().prompt().is_none());
    assert_eq!(
        app.state().status_line().notice().unwrap().text,
        "Delete cancelled."
    );
}

#[tokio::test]
async fn failed_bulk_action_should_show_server_message_without_refresh() {
    let server = MockServer::start().await;
    mount_scan_list(&server, 1).await;
    Mock::given(method("GET"))
        .and(path("/api/rerunscanmulti"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": {"message": "Scan D could not be re-run."}
        })))
        .expect(1)
        .mount(&server)
        .await;
    let prefs = tempfile::tempdir().unwrap();
    let mut app = controller(&server, &prefs);

    keys(&mut app, vec![press(KeyCode::F(5))]).await;
    keys(
        &mut app,
        vec![press(KeyCode::Char('G')), press(KeyCode::Char('R'))],
    )
    .await;

    let notice = app.state().status_line().notice().unwrap();
    assert_eq!(notice.level, NoticeLevel::Error);
    assert_eq!(notice.text, "Scan D could not be re-run.");
    assert_eq!(app.state().table().rows().len(), 4);
}

#[tokio::test]
async fn bulk_action_without_selection_should_only_warn() {
    let server = MockServer::start().await;
    mount_scan_list(&server, 1).await;
    let prefs = tempfile::tempdir().unwrap();
    let mut app = controller(&server, &prefs);

    keys(&mut app, vec![press(KeyCode::F(5))]).await;
    keys(&mut app, vec![press(KeyCode::Char('r'))]).await;

    let notice = app.state().status_line().notice().unwrap();
    assert_eq!(notice.level, NoticeLevel::Warning);
    assert_eq!(notice.text, "No scans selected.");
    assert_eq!(app.in_flight(), 0);
}

#[tokio::test]
async fn export_should_download_checked_scans() {
    let server = MockServer::start().await;
    mount_scan_list(&server, 1).await;
    Mock::given(method("GET"))
        .and(path("/scanexportjsonmulti"))
        .and(query_param("ids", "A"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Content-Disposition", "attachment; filename=SpiderFoot.json")
                .set_body_string("[]"),
        )
        .expect(1)
        .mount(&server)
        .await;
    let prefs = tempfile::tempdir().unwrap();
    let mut app = controller(&server, &prefs);

    keys(&mut app, vec![press(KeyCode::F(5))]).await;
    keys(
        &mut app,
        vec![
            press(KeyCode::Char(' ')),
            press(KeyCode::Char('e')),
            press(KeyCode::Char('j')),
        ],
    )
    .await;

    let saved = prefs.path().join("exports").join("SpiderFoot.json");
    assert_eq!(std::fs::read_to_string(saved).unwrap(), "[]");
}

#[tokio::test]
async fn clone_and_theme_keys_should_not_touch_server() {
    let server = MockServer::start().await;
    mount_scan_list(&server, 1).await;
    let prefs = tempfile::tempdir().unwrap();
    let mut app = controller(&server, &prefs);

    keys(&mut app, vec![press(KeyCode::F(5))]).await;
    keys(&mut app, vec![press(KeyCode::Char('c'))]).await;
    let notice = app.state().status_line().notice().unwrap();
    assert!(notice.text.contains("clonescan?id=A"), "{}", notice.text);

    keys(&mut app, vec![press(KeyCode::Char('t'))]).await;
    assert_eq!(app.state().theme(), Theme::Dark);
    assert_eq!(ThemeStore::new(prefs.path().join("prefs")).load(), Theme::Dark);
}

#[tokio::test]
async fn run_should_restore_terminal_on_quit() {
    let server = MockServer::start().await;
    mount_scan_list(&server, 1).await;
    let prefs = tempfile::tempdir().unwrap();
    let profile = ConsoleProfile {
        server: server.uri(),
        ..ConsoleProfile::default()
    };
    let render_stream = MockRenderStream::new();
    let handle = render_stream.handle();
    let mut app = AppController::with_io_streams(
        profile,
        ThemeStore::new(prefs.path().join("prefs")),
        MockEventStream::new(vec![press(KeyCode::Char('q'))]),
        render_stream,
    )
    .unwrap();

    app.run().await.unwrap();
    app.settle().await.unwrap();

    assert!(app.state().should_quit());
    let commands = handle.commands();
    assert_eq!(commands.first(), Some(&RenderCommand::BeginConsole));
    assert_eq!(commands.last(), Some(&RenderCommand::EndConsole));
    assert_eq!(
        commands
            .iter()
            .filter(|command| **command == RenderCommand::EndConsole)
            .count(),
        1
    );
}
