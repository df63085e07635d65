//! Integration test harness for Stockroom.
//!
//! Each test spawns the full axum application on an ephemeral port with an
//! in-memory `SQLite` database, then drives it over HTTP with a
//! cookie-holding reqwest client. No external services are required.
//!
//! ```rust,ignore
//! let app = TestApp::spawn().await;
//! let client = TestApp::client();
//! let resp = client.get(app.url("/health")).send().await.unwrap();
//! assert_eq!(resp.status(), 200);
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::net::{Ipv4Addr, SocketAddr};

use reqwest::Client;
use secrecy::SecretString;
use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;

use stockroom_core::{Email, Role};
use stockroom_server::config::ServerConfig;
use stockroom_server::db::UserRepository;
use stockroom_server::models::User;
use stockroom_server::session::SessionCodec;
use stockroom_server::state::AppState;

/// Signing secret used by every spawned test app.
///
/// Direct construction bypasses the entropy validation that `from_env`
/// applies, but keep it realistic anyway.
const TEST_SESSION_SECRET: &str = "k9PqR2vX8mZ4nW7jL3tY6bF1dH5gC0sA";

/// A running application instance bound to an ephemeral port.
pub struct TestApp {
    /// Base URL of the spawned server, e.g. `http://127.0.0.1:49152`.
    pub base_url: String,
    /// Handle to the same pool the server uses; tests reach through it to
    /// seed data and flip roles.
    pub pool: SqlitePool,
}

impl TestApp {
    /// Spawn the application on an ephemeral port with a fresh database.
    ///
    /// # Panics
    ///
    /// Panics if the database or listener cannot be set up; tests have no
    /// useful way to continue from that.
    pub async fn spawn() -> Self {
        // A single connection keeps the whole test on one shared in-memory
        // database; the pool must never recycle it.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await
            .expect("Failed to open in-memory database");

        stockroom_server::db::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");

        let listener = tokio::net::TcpListener::bind(SocketAddr::from((Ipv4Addr::LOCALHOST, 0)))
            .await
            .expect("Failed to bind ephemeral port");
        let addr = listener.local_addr().expect("Failed to read local addr");

        let config = ServerConfig {
            database_url: SecretString::from("sqlite::memory:"),
            host: addr.ip(),
            port: addr.port(),
            base_url: format!("http://{addr}"),
            session_secret: SecretString::from(TEST_SESSION_SECRET),
        };

        let state = AppState::new(config, pool.clone());
        let router = stockroom_server::app(state);

        tokio::spawn(async move {
            axum::serve(listener, router)
                .await
                .expect("Test server crashed");
        });

        Self {
            base_url: format!("http://{addr}"),
            pool,
        }
    }

    /// Create an HTTP client that retains cookies across requests.
    ///
    /// # Panics
    ///
    /// Panics if the client cannot be built.
    #[must_use]
    pub fn client() -> Client {
        Client::builder()
            .cookie_store(true)
            .build()
            .expect("Failed to create HTTP client")
    }

    /// Absolute URL for a path on the spawned server.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// A codec sharing the spawned server's signing secret, for minting
    /// tokens with controlled expiry.
    #[must_use]
    pub fn codec(&self) -> SessionCodec {
        SessionCodec::new(&SecretString::from(TEST_SESSION_SECRET))
    }

    /// Register a user over HTTP and return the signed-in client.
    ///
    /// # Panics
    ///
    /// Panics if registration does not return 201.
    pub async fn register_user(&self, email: &str, password: &str, name: &str) -> Client {
        let client = Self::client();
        let resp = client
            .post(self.url("/auth/register"))
            .json(&serde_json::json!({
                "email": email,
                "password": password,
                "name": name,
            }))
            .send()
            .await
            .expect("Failed to send register request");
        assert_eq!(resp.status(), 201, "registration failed for {email}");
        client
    }

    /// Flip a user's role to admin directly in the database, the same way
    /// the provisioning CLI does.
    ///
    /// # Panics
    ///
    /// Panics if the user does not exist.
    pub async fn promote_to_admin(&self, email: &str) {
        let email = Email::parse(email).expect("Invalid email in test");
        UserRepository::new(&self.pool)
            .set_role(&email, Role::Admin)
            .await
            .expect("Failed to promote user");
    }

    /// Fetch a user row directly, for building tokens in tests.
    ///
    /// # Panics
    ///
    /// Panics if the user does not exist.
    pub async fn user_by_email(&self, email: &str) -> User {
        let email = Email::parse(email).expect("Invalid email in test");
        UserRepository::new(&self.pool)
            .get_by_email(&email)
            .await
            .expect("Failed to query user")
            .expect("No such user")
    }
}
