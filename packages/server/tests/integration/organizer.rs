use sea_orm::{EntityTrait, PaginatorTrait};

use eventgate_server::entity::organizer::{self, OrganizerStatus};

use crate::common::{Document, TestApp, UPLOAD_LIMIT, organizer_fields, routes};

async fn organizer_rows(app: &TestApp) -> u64 {
    organizer::Entity::find().count(&app.db).await.unwrap()
}

#[tokio::test]
async fn organizer_signup_stores_pending_row_and_document() {
    let app = TestApp::spawn().await;

    let res = app
        .signup_organizer(organizer_fields("o@b.com"), Some(Document::pdf()))
        .await;

    assert_eq!(res.status, 201, "{}", res.text);
    assert_eq!(res.body["status"], "pending");
    assert!(res.body.get("token").is_none());

    let row = organizer::Entity::find_by_id(res.id())
        .one(&app.db)
        .await
        .unwrap()
        .expect("organizer row should exist");
    assert_eq!(row.status, OrganizerStatus::Pending);
    assert_eq!(row.email, "o@b.com");
    assert_eq!(
        row.portfolio_link.as_deref(),
        Some("https://example.com/portfolio")
    );
    assert!(row.accepts_contract);

    let stored = std::path::Path::new(&row.id_document_path);
    assert!(stored.starts_with(&app.upload_dir));
    assert_eq!(stored.extension().unwrap(), "pdf");
    assert_eq!(std::fs::read(stored).unwrap(), Document::pdf().bytes);
}

#[tokio::test]
async fn contract_must_be_accepted() {
    let app = TestApp::spawn().await;
    let fields = organizer_fields("o@b.com")
        .into_iter()
        .map(|(name, value)| {
            if name == "acceptsContract" {
                (name, "false".to_string())
            } else {
                (name, value)
            }
        })
        .collect();

    let res = app.signup_organizer(fields, Some(Document::pdf())).await;

    assert_eq!(res.status, 400);
    assert_eq!(res.message(), "You must accept the contract");
    assert_eq!(organizer_rows(&app).await, 0);
    assert_eq!(app.stored_documents(), 0);
}

#[tokio::test]
async fn document_is_required() {
    let app = TestApp::spawn().await;

    let res = app.signup_organizer(organizer_fields("o@b.com"), None).await;

    assert_eq!(res.status, 400);
    assert_eq!(res.message(), "All required fields must be provided");
    assert_eq!(organizer_rows(&app).await, 0);
}

#[tokio::test]
async fn unsupported_file_type_is_rejected_before_field_checks() {
    let app = TestApp::spawn().await;
    // Invalid phone too: the file check must win.
    let fields = organizer_fields("o@b.com")
        .into_iter()
        .map(|(name, value)| {
            if name == "phone" {
                (name, "123".to_string())
            } else {
                (name, value)
            }
        })
        .collect();
    let doc = Document {
        file_name: "notes.txt",
        mime: "text/plain",
        bytes: b"hello".to_vec(),
    };

    let res = app.signup_organizer(fields, Some(doc)).await;

    assert_eq!(res.status, 400);
    assert_eq!(res.body["code"], "FILE_REJECTED");
    assert_eq!(
        res.message(),
        "File type not supported. Use PDF, JPG, or PNG."
    );
    assert_eq!(app.stored_documents(), 0);
}

#[tokio::test]
async fn extension_and_mime_must_both_match() {
    let app = TestApp::spawn().await;
    let doc = Document {
        file_name: "scan.pdf",
        mime: "application/zip",
        bytes: b"PK".to_vec(),
    };

    let res = app
        .signup_organizer(organizer_fields("o@b.com"), Some(doc))
        .await;

    assert_eq!(res.status, 400);
    assert_eq!(res.body["code"], "FILE_REJECTED");
}

#[tokio::test]
async fn images_are_accepted() {
    let app = TestApp::spawn().await;
    let doc = Document {
        file_name: "id.JPG",
        mime: "image/jpeg",
        bytes: vec![0xFF, 0xD8, 0xFF, 0xE0],
    };

    let res = app
        .signup_organizer(organizer_fields("o@b.com"), Some(doc))
        .await;

    assert_eq!(res.status, 201, "{}", res.text);
    assert_eq!(app.stored_documents(), 1);
}

#[tokio::test]
async fn oversized_document_is_rejected() {
    let app = TestApp::spawn().await;
    let doc = Document {
        file_name: "huge.pdf",
        mime: "application/pdf",
        bytes: vec![b'x'; UPLOAD_LIMIT + 1],
    };

    let res = app
        .signup_organizer(organizer_fields("o@b.com"), Some(doc))
        .await;

    assert_eq!(res.status, 400);
    assert_eq!(res.body["code"], "FILE_REJECTED");
    assert!(res.message().starts_with("File too large"));
    assert_eq!(organizer_rows(&app).await, 0);
    assert_eq!(app.stored_documents(), 0);
}

#[tokio::test]
async fn duplicate_organizer_email_is_a_conflict_and_leaves_no_file() {
    let app = TestApp::spawn().await;
    app.create_organizer("o@b.com").await;
    assert_eq!(app.stored_documents(), 1);

    let res = app
        .signup_organizer(organizer_fields("o@b.com"), Some(Document::pdf()))
        .await;

    assert_eq!(res.status, 409);
    assert_eq!(res.message(), "Email already registered");
    assert_eq!(organizer_rows(&app).await, 1);
    assert_eq!(app.stored_documents(), 1);
}

#[tokio::test]
async fn json_body_is_rejected() {
    let app = TestApp::spawn().await;

    let res = app
        .post_json(
            routes::SIGNUP_ORGANIZER,
            &serde_json::json!({"email": "o@b.com"}),
        )
        .await;

    assert_eq!(res.status, 400);
    assert_eq!(res.body["code"], "VALIDATION_ERROR");
}
