#![allow(clippy::unwrap_used)]
// End-to-end tests for `MediaLibrary` against a wiremock portal.

use std::sync::{Arc, Mutex};

use pretty_assertions::assert_eq;
use serde_json::json;
use url::Url;
use wiremock::matchers::{body_string_contains, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use medialib_core::{
    ChangeEvent, CoreError, DocumentQuery, FileUpload, MediaLibrary, Role, SearchFilter,
    SessionConfig, Source, SourceKind, Target, WorkflowRights,
};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup(rights: WorkflowRights) -> (MockServer, MediaLibrary) {
    let server = MockServer::start().await;
    let mut config = SessionConfig::new(Url::parse(&server.uri()).unwrap());
    config.rights = rights;
    let library = MediaLibrary::new(config).unwrap();
    (server, library)
}

fn doc_json(id: &str, filename: &str, content_type: &str) -> serde_json::Value {
    json!({
        "_id": id,
        "metadata": { "filename": filename, "content-type": content_type, "size": 10 },
        "created": "2024-03-01 09:15.02.117",
        "owner": "u1",
        "ownerName": "Ada Lovelace"
    })
}

async fn mount_owner_tree(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/workspace/folders/list"))
        .and(query_param("filter", "owner"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "_id": "f1", "name": "Cours", "folder": "Cours" },
            { "_id": "f2", "name": "Maths", "folder": "Cours_Maths" },
            { "_id": "f3", "name": "2024", "folder": "Cours_Maths_2024" },
            { "_id": "f4", "name": "Perso", "folder": "Perso" },
            { "_id": "broken" }
        ])))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/workspace/documents"))
        .and(query_param("filter", "owner"))
        .and(query_param("hierarchical", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            doc_json("d1", "report.pdf", "application/pdf"),
            doc_json("d2", "notes.v2.txt", "text/plain"),
            doc_json("d3", "readme", "text/plain")
        ])))
        .mount(server)
        .await;

    for (folder, id) in [("Cours", "c1"), ("Cours_Maths", "c2"), ("Perso", "p1")] {
        Mock::given(method("GET"))
            .and(path(format!("/workspace/documents/{folder}")))
            .and(query_param("filter", "owner"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                doc_json(id, &format!("{folder}.png"), "image/png")
            ])))
            .mount(server)
            .await;
    }
}

fn record_events(library: &MediaLibrary) -> Arc<Mutex<Vec<String>>> {
    let log = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&log);
    library
        .bus()
        .on_any(move |e: &ChangeEvent| sink.lock().unwrap().push(e.to_string()));
    log
}

// ── Sync ────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_my_documents_sync() {
    let (server, library) = setup(WorkflowRights::ALL).await;
    mount_owner_tree(&server).await;
    let log = record_events(&library);

    library.sync_source(SourceKind::Mine).await.unwrap();

    let folders: Vec<String> = library
        .folders(SourceKind::Mine)
        .iter()
        .map(|f| f.path.clone())
        .collect();
    assert_eq!(folders, vec!["Cours", "Perso"]);
    // The malformed folder record was skipped.
    assert_eq!(library.my_documents().all_folders().len(), 4);

    let docs = library.documents(SourceKind::Mine);
    let roles: Vec<Role> = docs.iter().map(|d| d.role()).collect();
    let titles: Vec<&str> = docs.iter().map(|d| d.title()).collect();
    assert_eq!(roles, vec![Role::Pdf, Role::Unknown, Role::Unknown]);
    assert_eq!(titles, vec!["report", "notes.v2", "readme"]);
    assert_eq!(docs[0].owner_name.as_deref(), Some("Ada Lovelace"));

    let events = log.lock().unwrap().clone();
    assert_eq!(events.len(), 3);
    assert_eq!(events.last().unwrap(), "myDocuments.sync");
}

#[tokio::test]
async fn test_search_by_role_and_text() {
    let (server, library) = setup(WorkflowRights::ALL).await;
    mount_owner_tree(&server).await;
    library.sync_source(SourceKind::Mine).await.unwrap();

    let found = library.search(SourceKind::Mine, &DocumentQuery::new(Role::Pdf, "REP"));
    let names: Vec<&str> = found.iter().map(|d| d.filename.as_str()).collect();
    assert_eq!(names, vec!["report.pdf"]);

    let unknown = library.search(SourceKind::Mine, &DocumentQuery::new(Role::Unknown, ""));
    assert_eq!(unknown.len(), 2);

    let folders = library.search_folders(SourceKind::Mine, &SearchFilter::new("per"));
    assert_eq!(folders.len(), 1);
}

#[tokio::test]
async fn test_app_documents_skip_trash() {
    let (server, library) = setup(WorkflowRights::ALL).await;

    let mut trashed = doc_json("t1", "old.png", "image/png");
    trashed["folder"] = json!("Trash");
    Mock::given(method("GET"))
        .and(path("/workspace/documents"))
        .and(query_param("filter", "protected"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            doc_json("a1", "kept.png", "image/png"),
            trashed
        ])))
        .expect(1)
        .mount(&server)
        .await;

    library.sync_source(SourceKind::App).await.unwrap();
    let ids: Vec<String> = library
        .documents(SourceKind::App)
        .iter()
        .map(|d| d.id.to_string())
        .collect();
    assert_eq!(ids, vec!["a1"]);
}

#[tokio::test]
async fn test_mistyped_record_is_skipped() {
    let (server, library) = setup(WorkflowRights::ALL).await;
    Mock::given(method("GET"))
        .and(path("/workspace/documents"))
        .and(query_param("filter", "protected"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            doc_json("a1", "kept.png", "image/png"),
            { "_id": "bad", "metadata": { "filename": "b.pdf", "size": "12" } },
            doc_json("a2", "also.png", "image/png")
        ])))
        .mount(&server)
        .await;

    library.sync_source(SourceKind::App).await.unwrap();
    let ids: Vec<String> = library
        .documents(SourceKind::App)
        .iter()
        .map(|d| d.id.to_string())
        .collect();
    assert_eq!(ids, vec!["a1", "a2"]);
}

#[tokio::test]
async fn test_shared_documents_require_list_right() {
    let (server, library) = setup(WorkflowRights { create: true, list: false }).await;
    Mock::given(method("GET"))
        .and(path("/workspace/documents"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&server)
        .await;
    let log = record_events(&library);

    let err = library.sync_source(SourceKind::Shared).await.unwrap_err();
    assert!(matches!(err, CoreError::SyncFailed { .. }));
    assert_eq!(
        *log.lock().unwrap(),
        vec![
            "sharedDocuments.documents.sync-failed: Missing workflow right: workspace.documents.list",
            "sharedDocuments.sync-failed: documents: Missing workflow right: workspace.documents.list",
        ]
    );
}

#[tokio::test]
async fn test_server_error_keeps_previous_snapshot() {
    let (server, library) = setup(WorkflowRights::ALL).await;
    Mock::given(method("GET"))
        .and(path("/workspace/documents"))
        .and(query_param("filter", "shared"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            doc_json("s1", "shared.pdf", "application/pdf")
        ])))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/workspace/documents"))
        .and(query_param("filter", "shared"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    library.sync_source(SourceKind::Shared).await.unwrap();
    let mut events = library.bus().subscribe();
    assert!(library.sync_source(SourceKind::Shared).await.is_err());

    assert_eq!(library.documents(SourceKind::Shared).len(), 1);
    let aggregate_failed = loop {
        let event = events.recv().await.unwrap();
        if event.target() == &Target::Aggregate(Source::SharedDocuments) {
            break event.is_failure();
        }
    };
    assert!(aggregate_failed);
}

// ── Folder navigation ───────────────────────────────────────────────

#[tokio::test]
async fn test_open_folder_lists_children_and_documents() {
    let (server, library) = setup(WorkflowRights::ALL).await;
    mount_owner_tree(&server).await;
    library.sync_source(SourceKind::Mine).await.unwrap();

    let cours = library.open_folder_path("Cours").await.unwrap();
    let children: Vec<String> = cours.folders().snapshot().iter().map(|f| f.path.clone()).collect();
    assert_eq!(children, vec!["Cours_Maths", "Cours_Maths_2024"]);
    assert_eq!(cours.documents().snapshot()[0].filename, "Cours.png");

    // Descending keeps the parent open.
    let maths = library.open_folder_path("Cours_Maths").await.unwrap();
    assert_eq!(cours.folders().len(), 2);
    assert_eq!(maths.folders().len(), 1);

    // Moving elsewhere closes the previous folder.
    library.open_folder_path("Perso").await.unwrap();
    assert!(maths.folders().is_empty());
    assert_eq!(library.opened_folder().unwrap().path(), "Perso");
}

#[tokio::test]
async fn test_navigation_closes_only_unrelated_folders() {
    let (server, library) = setup(WorkflowRights::ALL).await;
    mount_owner_tree(&server).await;
    library.sync_source(SourceKind::Mine).await.unwrap();
    let log = record_events(&library);

    let cours = library.open_folder_path("Cours").await.unwrap();
    let maths = library.open_folder_path("Cours_Maths").await.unwrap();
    assert_eq!(cours.folders().len(), 2);
    assert!(!log.lock().unwrap().iter().any(|e| e == "folder[Cours].folders.change"));

    library.open_folder_path("Perso").await.unwrap();
    assert!(maths.folders().is_empty());
    let events = log.lock().unwrap().clone();
    assert!(events.iter().any(|e| e == "folder[Cours_Maths].folders.change"));
}

// ── Widgets ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_widget_allowlist_filters_sync() {
    let server = MockServer::start().await;
    let mut config = SessionConfig::new(Url::parse(&server.uri()).unwrap());
    config.widget_allowlist = Some(vec!["notes".into()]);
    let library = MediaLibrary::new(config).unwrap();

    Mock::given(method("GET"))
        .and(path("/widgets"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "name": "calendar" },
            { "name": "notes", "path": "/notes" },
            { "name": "weather" }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    library.widgets().sync().await.unwrap();
    let names: Vec<String> = library
        .widgets()
        .widgets()
        .snapshot()
        .iter()
        .map(|w| w.name.clone())
        .collect();
    assert_eq!(names, vec!["notes"]);
    assert!(library.widgets().find_widget("calendar").is_none());
}

#[tokio::test]
async fn test_open_unknown_folder_is_not_found() {
    let (_server, library) = setup(WorkflowRights::ALL).await;
    let err = library.open_folder_path("Nowhere").await.err().unwrap();
    assert!(matches!(err, CoreError::NotFound { .. }));
}

// ── Upload & duplicate ──────────────────────────────────────────────

#[tokio::test]
async fn test_upload_builds_document_without_inserting() {
    let (server, library) = setup(WorkflowRights::ALL).await;
    Mock::given(method("POST"))
        .and(path("/workspace/document"))
        .and(query_param("protected", "true"))
        .and(query_param("application", "media-library"))
        .and(query_param("thumbnail", "120x120"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "_id": "new1" })))
        .expect(1)
        .mount(&server)
        .await;

    let file = FileUpload::new("photo.png", b"png-bytes".to_vec()).with_content_type("image/png");
    let doc = library.upload(file, "file-upload-photo.png-0").await.unwrap();

    assert_eq!(doc.id.to_string(), "new1");
    assert_eq!(doc.title(), "photo");
    assert_eq!(doc.role(), Role::Img);
    assert!(library.documents(SourceKind::App).is_empty());
}

#[tokio::test]
async fn test_select_shared_documents_makes_protected_copies() {
    let (server, library) = setup(WorkflowRights::ALL).await;
    Mock::given(method("GET"))
        .and(path("/workspace/documents"))
        .and(query_param("filter", "shared"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            doc_json("s1", "slides.pdf", "application/pdf")
        ])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/workspace/document/s1"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"%PDF-1.4".to_vec()))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/workspace/document"))
        .and(body_string_contains("filename=\"slides.pdf\""))
        .and(body_string_contains("%PDF-1.4"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "_id": "copy1",
            "protected": true,
            "metadata": { "filename": "slides.pdf", "content-type": "application/pdf" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    library.sync_source(SourceKind::Shared).await.unwrap();
    let picked = library.documents(SourceKind::Shared).to_vec();
    let copies = library
        .select_documents(SourceKind::Shared, &picked)
        .await
        .unwrap();

    assert_eq!(copies.len(), 1);
    assert_eq!(copies[0].id.to_string(), "copy1");
    assert!(copies[0].protected);
}

#[tokio::test]
async fn test_duplicate_survives_blank_content_type() {
    let (server, library) = setup(WorkflowRights::ALL).await;
    Mock::given(method("GET"))
        .and(path("/workspace/documents"))
        .and(query_param("filter", "shared"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            doc_json("s2", "scan.bin", "")
        ])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/workspace/document/s2"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"raw".to_vec()))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/workspace/document"))
        .and(body_string_contains("filename=\"scan.bin\""))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "_id": "copy2" })))
        .expect(1)
        .mount(&server)
        .await;

    library.sync_source(SourceKind::Shared).await.unwrap();
    let picked = library.documents(SourceKind::Shared).to_vec();
    let copies = library
        .select_documents(SourceKind::Shared, &picked)
        .await
        .unwrap();

    assert_eq!(copies[0].id.to_string(), "copy2");
    assert_eq!(copies[0].filename, "scan.bin");
    assert_eq!(copies[0].role(), Role::Unknown);
}

#[tokio::test]
async fn test_select_app_documents_returns_them_unchanged() {
    let (server, library) = setup(WorkflowRights::ALL).await;
    Mock::given(method("GET"))
        .and(path("/workspace/documents"))
        .and(query_param("filter", "protected"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            doc_json("a1", "logo.png", "image/png")
        ])))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    library.sync_source(SourceKind::App).await.unwrap();
    let picked = library.documents(SourceKind::App).to_vec();
    let selected = library.select_documents(SourceKind::App, &picked).await.unwrap();
    assert!(Arc::ptr_eq(&selected[0], &picked[0]));
}

#[tokio::test]
async fn test_import_reports_each_file_and_resyncs_once() {
    let (server, library) = setup(WorkflowRights::ALL).await;
    Mock::given(method("POST"))
        .and(path("/workspace/document"))
        .and(body_string_contains("filename=\"bad.png\""))
        .respond_with(ResponseTemplate::new(500).set_body_string("disk full"))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/workspace/document"))
        .and(body_string_contains("filename=\"good.png\""))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "_id": "g1" })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/workspace/documents"))
        .and(query_param("filter", "protected"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            doc_json("g1", "good.png", "image/png")
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let results = library
        .import_files(vec![
            FileUpload::new("good.png", b"ok".to_vec()),
            FileUpload::new("bad.png", b"ko".to_vec()),
        ])
        .await;

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].as_ref().unwrap().id.to_string(), "g1");
    assert!(matches!(results[1], Err(CoreError::Api { status: Some(500), .. })));
    assert_eq!(library.documents(SourceKind::App).len(), 1);
}
