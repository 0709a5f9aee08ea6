//! Integration test support for Bazaar.
//!
//! # Running Tests
//!
//! ```bash
//! # Migrate the database and start the server
//! cargo run -p bazaar-cli -- migrate
//! cargo run -p bazaar-server
//!
//! # Run the ignored HTTP tests
//! cargo test -p bazaar-integration-tests -- --ignored
//! ```
//!
//! Tests create their own users and products directly in the database with
//! unique names, then drive the running server over HTTP. The concurrency
//! tests only need the database and call the services directly.

use bazaar_core::{Email, Price, ProductId, UserRole};
use bazaar_server::db::{NewProduct, ProductRepository, create_pool};
use bazaar_server::models::User;
use bazaar_server::services::{AuthService, UserService};
use reqwest::{Client, Response};
use secrecy::SecretString;
use serde_json::{Value, json};
use sqlx::PgPool;
use uuid::Uuid;

/// Password given to every account created by [`TestContext::user`].
pub const PASSWORD: &str = "integration-password";

/// Base URL of the running server (configurable via environment).
#[must_use]
pub fn base_url() -> String {
    std::env::var("BAZAAR_TEST_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

/// Database and HTTP handles shared by a test.
pub struct TestContext {
    pub pool: PgPool,
    pub base_url: String,
}

impl TestContext {
    /// Connect to the database named by `BAZAAR_DATABASE_URL` / `DATABASE_URL`.
    ///
    /// # Panics
    ///
    /// Panics if no database URL is set or the database is unreachable.
    #[allow(clippy::expect_used)]
    pub async fn new() -> Self {
        let url = std::env::var("BAZAAR_DATABASE_URL")
            .or_else(|_| std::env::var("DATABASE_URL"))
            .expect("BAZAAR_DATABASE_URL must be set for integration tests");
        let pool = create_pool(&SecretString::from(url), 4)
            .await
            .expect("Failed to connect to test database");

        Self {
            pool,
            base_url: base_url(),
        }
    }

    /// Create a user with a unique email and return that email.
    ///
    /// # Panics
    ///
    /// Panics if the user cannot be created.
    #[allow(clippy::expect_used)]
    pub async fn user(&self, role: UserRole) -> String {
        let email = format!("it-{}@bazaar.test", Uuid::new_v4().simple());
        AuthService::new(&self.pool)
            .create_user(&email, PASSWORD, role)
            .await
            .expect("Failed to create test user");
        email
    }

    /// Load the user record behind `email`.
    ///
    /// # Panics
    ///
    /// Panics if the email is invalid or the user does not exist.
    #[allow(clippy::expect_used)]
    pub async fn resolve_user(&self, email: &str) -> User {
        let email = Email::parse(email).expect("Invalid test email");
        UserService::new(&self.pool)
            .get_user_by_email(&email)
            .await
            .expect("Failed to load test user")
    }

    /// Delete a user (and, by cascade, their cart) behind a live session.
    ///
    /// # Panics
    ///
    /// Panics if the delete fails.
    #[allow(clippy::expect_used)]
    pub async fn delete_user(&self, email: &str) {
        sqlx::query("DELETE FROM shop.user WHERE email = $1")
            .bind(email)
            .execute(&self.pool)
            .await
            .expect("Failed to delete test user");
    }

    /// Create a product with the given price in cents and stock.
    ///
    /// # Panics
    ///
    /// Panics if the product cannot be created.
    #[allow(clippy::expect_used)]
    pub async fn product(&self, cents: u32, stock: u32) -> ProductId {
        let product = NewProduct {
            name: format!("Test product {}", Uuid::new_v4().simple()),
            description: None,
            price: Price::from_cents(cents),
            stock,
        };
        ProductRepository::new(&self.pool)
            .create(&product)
            .await
            .expect("Failed to create test product")
            .id
    }

    /// Current stock of a product.
    ///
    /// # Panics
    ///
    /// Panics if the product does not exist.
    #[allow(clippy::expect_used)]
    pub async fn stock(&self, id: ProductId) -> u32 {
        ProductRepository::new(&self.pool)
            .get_by_id(id)
            .await
            .expect("Failed to load product")
            .expect("Product missing")
            .stock
    }

    /// A client with a cookie store, logged in as `email`.
    ///
    /// # Panics
    ///
    /// Panics if the login request fails.
    #[allow(clippy::expect_used)]
    pub async fn login(&self, email: &str) -> Client {
        let client = Client::builder()
            .cookie_store(true)
            .build()
            .expect("Failed to create HTTP client");

        let resp = client
            .post(self.url("/auth/login"))
            .json(&json!({"email": email, "password": PASSWORD}))
            .send()
            .await
            .expect("Login request failed");
        assert!(resp.status().is_success(), "login failed: {}", resp.status());

        client
    }

    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

/// Read a response body as JSON.
///
/// # Panics
///
/// Panics if the body is not JSON.
#[allow(clippy::expect_used)]
pub async fn json_body(resp: Response) -> Value {
    resp.json().await.expect("Response body is not JSON")
}
