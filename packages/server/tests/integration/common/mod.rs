use std::net::SocketAddr;
use std::path::PathBuf;

use reqwest::Client;
use reqwest::multipart::{Form, Part};
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};
use serde_json::{Value, json};
use tempfile::TempDir;

use eventgate_server::config::{
    AdminBootstrapConfig, AppConfig, AuthConfig, CorsConfig, DatabaseConfig, ServerConfig,
    UploadConfig,
};
use eventgate_server::entity::organizer::{self, OrganizerStatus};
use eventgate_server::state::AppState;
use eventgate_server::utils::upload::DocumentStore;

pub const JWT_SECRET: &str = "test-secret-for-integration-tests";
pub const ADMIN_EMAIL: &str = "root@eventgate.test";
pub const ADMIN_PASSWORD: &str = "admin-password";
pub const UPLOAD_LIMIT: usize = 64 * 1024;

pub mod routes {
    pub const SIGNUP_PARTICIPANT: &str = "/signup-participant";
    pub const SIGNUP_ORGANIZER: &str = "/signup-organizer";
    pub const LOGIN_PARTICIPANT: &str = "/login-participant";
    pub const LOGIN_ORGANIZER: &str = "/login-organizer";
    pub const LOGIN_ADMIN: &str = "/login-admin";
    pub const PROTECTED: &str = "/protected";
    pub const ADMIN_ORGANIZERS: &str = "/admin/organizers";

    pub fn organizer_status(id: i32) -> String {
        format!("/admin/organizers/{id}/status")
    }
}

/// A running test server backed by its own SQLite file.
pub struct TestApp {
    pub addr: SocketAddr,
    pub client: Client,
    pub db: DatabaseConnection,
    pub upload_dir: PathBuf,
    _dir: TempDir,
}

/// Parsed HTTP response for test assertions.
pub struct TestResponse {
    pub status: u16,
    /// Raw response body as text.
    pub text: String,
    /// Parsed JSON body, or `Null` if the response is not valid JSON.
    pub body: Value,
}

/// Identity document attached to an organizer signup.
pub struct Document {
    pub file_name: &'static str,
    pub mime: &'static str,
    pub bytes: Vec<u8>,
}

impl Document {
    pub fn pdf() -> Self {
        Self {
            file_name: "passport.pdf",
            mime: "application/pdf",
            bytes: b"%PDF-1.4 test document".to_vec(),
        }
    }
}

pub fn participant_body(email: &str) -> Value {
    json!({
        "fullName": "A B",
        "email": email,
        "password": "password1",
        "phone": "1234567890",
        "birthDate": "2000-01-01",
        "acceptsTerms": true,
    })
}

/// Text fields of a valid organizer signup.
pub fn organizer_fields(email: &str) -> Vec<(&'static str, String)> {
    vec![
        ("fullName", "O Rganizer".to_string()),
        ("email", email.to_string()),
        ("password", "password1".to_string()),
        ("phone", "1234567890".to_string()),
        ("idNumber", "ID-123456".to_string()),
        ("portfolioLink", "https://example.com/portfolio".to_string()),
        ("acceptsContract", "true".to_string()),
    ]
}

impl TestApp {
    pub async fn spawn() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let db_url = format!("sqlite://{}?mode=rwc", dir.path().join("test.db").display());
        let upload_dir = dir.path().join("uploads");

        let app_config = AppConfig {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                cors: CorsConfig {
                    allow_origins: vec![],
                    max_age: 3600,
                },
            },
            database: DatabaseConfig {
                url: db_url,
                max_connections: 5,
            },
            auth: AuthConfig {
                jwt_secret: JWT_SECRET.to_string(),
                participant_ttl_hours: 9,
                organizer_ttl_hours: 1,
                admin_ttl_hours: 6,
            },
            upload: UploadConfig {
                dir: upload_dir.clone(),
                max_size: UPLOAD_LIMIT,
                allowed_types: ["jpeg", "jpg", "png", "pdf"].map(String::from).to_vec(),
            },
            admin: AdminBootstrapConfig {
                email: Some(ADMIN_EMAIL.to_string()),
                password: Some(ADMIN_PASSWORD.to_string()),
            },
        };

        let db = eventgate_server::database::init_db(&app_config.database)
            .await
            .expect("Failed to initialize test database");
        eventgate_server::seed::ensure_admin(&db, &app_config.admin)
            .await
            .expect("Failed to seed admin");

        let documents = DocumentStore::new(upload_dir.clone(), UPLOAD_LIMIT)
            .await
            .expect("Failed to create upload dir");

        let state = AppState {
            db: db.clone(),
            config: app_config,
            documents,
        };

        let app = eventgate_server::build_router(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            addr,
            client: Client::new(),
            db,
            upload_dir,
            _dir: dir,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub async fn post_json(&self, path: &str, body: &Value) -> TestResponse {
        let res = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .expect("Failed to send POST request");

        TestResponse::from_response(res).await
    }

    pub async fn get_with_token(&self, path: &str, token: &str) -> TestResponse {
        self.get_with_header(path, &format!("Bearer {token}")).await
    }

    pub async fn get_with_header(&self, path: &str, authorization: &str) -> TestResponse {
        let res = self
            .client
            .get(self.url(path))
            .header("Authorization", authorization)
            .send()
            .await
            .expect("Failed to send GET request");

        TestResponse::from_response(res).await
    }

    pub async fn get_without_token(&self, path: &str) -> TestResponse {
        let res = self
            .client
            .get(self.url(path))
            .send()
            .await
            .expect("Failed to send GET request");

        TestResponse::from_response(res).await
    }

    pub async fn patch_with_token(&self, path: &str, body: &Value, token: &str) -> TestResponse {
        let res = self
            .client
            .patch(self.url(path))
            .header("Authorization", format!("Bearer {token}"))
            .json(body)
            .send()
            .await
            .expect("Failed to send PATCH request");

        TestResponse::from_response(res).await
    }

    /// Submit an organizer signup form, optionally with an identity document.
    pub async fn signup_organizer(
        &self,
        fields: Vec<(&'static str, String)>,
        document: Option<Document>,
    ) -> TestResponse {
        let mut form = Form::new();
        for (name, value) in fields {
            form = form.text(name, value);
        }
        if let Some(doc) = document {
            let part = Part::bytes(doc.bytes)
                .file_name(doc.file_name)
                .mime_str(doc.mime)
                .expect("Failed to set MIME type");
            form = form.part("idDocument", part);
        }

        let res = self
            .client
            .post(self.url(routes::SIGNUP_ORGANIZER))
            .multipart(form)
            .send()
            .await
            .expect("Failed to send multipart signup request");

        TestResponse::from_response(res).await
    }

    /// Register a participant and log in, returning the token.
    pub async fn participant_token(&self, email: &str) -> String {
        let reg = self
            .post_json(routes::SIGNUP_PARTICIPANT, &participant_body(email))
            .await;
        assert_eq!(reg.status, 201, "Registration failed: {}", reg.text);

        let res = self
            .post_json(
                routes::LOGIN_PARTICIPANT,
                &json!({"email": email, "password": "password1"}),
            )
            .await;
        assert_eq!(res.status, 200, "Login failed: {}", res.text);
        res.token()
    }

    /// Log in as the bootstrap admin.
    pub async fn admin_token(&self) -> String {
        let res = self
            .post_json(
                routes::LOGIN_ADMIN,
                &json!({"email": ADMIN_EMAIL, "password": ADMIN_PASSWORD}),
            )
            .await;
        assert_eq!(res.status, 200, "Admin login failed: {}", res.text);
        res.token()
    }

    /// Register an organizer with a PDF document and return its `id`.
    pub async fn create_organizer(&self, email: &str) -> i32 {
        let res = self
            .signup_organizer(organizer_fields(email), Some(Document::pdf()))
            .await;
        assert_eq!(res.status, 201, "Organizer signup failed: {}", res.text);
        res.id()
    }

    /// Change an organizer's status directly in the database.
    pub async fn set_organizer_status(&self, id: i32, status: OrganizerStatus) {
        let row = organizer::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .expect("DB query failed")
            .expect("Organizer not found");

        let mut active: organizer::ActiveModel = row.into();
        active.status = Set(status);
        active
            .update(&self.db)
            .await
            .expect("Failed to update organizer status");
    }

    /// Number of files currently in the upload directory.
    pub fn stored_documents(&self) -> usize {
        std::fs::read_dir(&self.upload_dir)
            .map(|entries| entries.count())
            .unwrap_or(0)
    }
}

impl TestResponse {
    pub async fn from_response(res: reqwest::Response) -> Self {
        let status = res.status().as_u16();
        let text = res.text().await.unwrap_or_default();
        let body = serde_json::from_str(&text).unwrap_or(Value::Null);
        Self { status, text, body }
    }

    pub fn id(&self) -> i32 {
        self.body["id"]
            .as_i64()
            .expect("response body should contain 'id'") as i32
    }

    pub fn token(&self) -> String {
        self.body["token"]
            .as_str()
            .expect("response body should contain 'token'")
            .to_string()
    }

    pub fn message(&self) -> &str {
        self.body["message"].as_str().unwrap_or_default()
    }
}
