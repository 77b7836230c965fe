use std::sync::Arc;
use std::sync::OnceLock;

use auth::Authenticator;
use auth::JwtHandler;
use auth::KeyManager;
use auth::PasswordHasher;
use auth_service::domain::identity::models::DefaultAccount;
use auth_service::domain::identity::models::Username;
use auth_service::domain::identity::service::AuthService;
use auth_service::inbound::http::router::create_router;
use auth_service::outbound::repositories::InMemoryIdentityRepository;

pub const DEFAULT_USERNAME: &str = "admin";
pub const DEFAULT_PASSWORD: &str = "Password123!";

/// Test application that spawns a real server
pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub repository: Arc<InMemoryIdentityRepository>,
    pub keys: Arc<KeyManager>,
    pub api_client: reqwest::Client,
}

/// One keypair for the whole test binary; RSA generation dominates otherwise.
fn shared_keys() -> Arc<KeyManager> {
    static KEYS: OnceLock<Arc<KeyManager>> = OnceLock::new();
    KEYS.get_or_init(|| Arc::new(KeyManager::generate().expect("Failed to generate keypair")))
        .clone()
}

impl TestApp {
    /// Spawn the application in a background task and return TestApp
    pub async fn spawn() -> Self {
        // Use random port (0 = OS assigns)
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let keys = shared_keys();
        let repository = Arc::new(InMemoryIdentityRepository::new());

        let authenticator = Arc::new(Authenticator::new(
            PasswordHasher::with_cost(4).expect("Failed to create password hasher"),
            JwtHandler::new(Arc::clone(&keys)),
        ));

        let default_account = DefaultAccount::new(
            Username::new(DEFAULT_USERNAME.to_string()).unwrap(),
            DEFAULT_PASSWORD.to_string(),
        );

        let auth_service = Arc::new(AuthService::new(
            Arc::clone(&repository),
            authenticator,
            default_account,
        ));

        let router = create_router(auth_service);

        // Spawn server in background
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            port,
            repository,
            keys,
            api_client: reqwest::Client::builder()
                .build()
                .expect("Failed to create reqwest client"),
        }
    }

    /// Helper to make GET request
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(format!("{}{}", self.address, path))
    }

    /// Helper to make POST request
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(format!("{}{}", self.address, path))
    }

    /// Run the bootstrap through the health probe
    pub async fn bootstrap(&self) -> reqwest::Response {
        self.get("/health")
            .send()
            .await
            .expect("Failed to execute request")
    }

    /// Helper to POST credentials to the login endpoint
    pub async fn login(&self, username: &str, password: &str) -> reqwest::Response {
        self.post("/login")
            .json(&serde_json::json!({
                "username": username,
                "password": password
            }))
            .send()
            .await
            .expect("Failed to execute request")
    }
}
