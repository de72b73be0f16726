//! Application bootstrap example using ferrous-registry
//!
//! Wires a small service graph, resolves it lazily and runs an entry point
//! through function injection. Run with `RUST_LOG=ferrous_registry=debug` to
//! see every factory call.

use ferrous_registry::{BoxError, DiError, Message, Registry, RegistryOptions};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracing_subscriber::EnvFilter;

// ===== Domain Services =====

#[derive(Debug)]
struct AppConfig {
    database_url: String,
    cache_capacity: usize,
}

struct Database {
    url: String,
    rows: Mutex<HashMap<u32, String>>,
}

impl Database {
    fn connect(config: &AppConfig) -> Result<Self, Message> {
        if !config.database_url.starts_with("memory://") {
            return Err(Message(format!("unsupported database url: {}", config.database_url)));
        }
        Ok(Self {
            url: config.database_url.clone(),
            rows: Mutex::new(HashMap::new()),
        })
    }
}

struct UserCache {
    capacity: usize,
}

struct UserRepository {
    db: Arc<Database>,
    cache: Arc<UserCache>,
}

impl UserRepository {
    fn insert(&self, id: u32, name: &str) {
        if let Ok(mut rows) = self.db.rows.lock() {
            rows.insert(id, name.to_string());
        }
    }

    fn count(&self) -> usize {
        self.db.rows.lock().map(|rows| rows.len()).unwrap_or(0)
    }
}

struct AuditLog;

fn build_registry() -> Result<Registry, DiError> {
    let registry = Registry::with_options(RegistryOptions {
        log_resolutions: true,
        ..RegistryOptions::default()
    });

    registry.register(|| {
        Ok::<_, BoxError>(AppConfig {
            database_url: "memory://users".to_string(),
            cache_capacity: 256,
        })
    })?;
    registry.register(|config: Arc<AppConfig>| Database::connect(&config))?;
    registry.register(|config: Arc<AppConfig>| {
        Ok::<_, BoxError>(UserCache {
            capacity: config.cache_capacity,
        })
    })?;
    registry.register(|db: Arc<Database>, cache: Arc<UserCache>| {
        Ok::<_, BoxError>(UserRepository { db, cache })
    })?;
    registry.register(|| Err::<AuditLog, _>(Message("audit sink unreachable".to_string())))?;

    Ok(registry)
}

fn main() -> Result<(), BoxError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let registry = build_registry()?;
    println!("registered {} services", registry.len());

    registry.inject(|repo: Arc<UserRepository>| {
        repo.insert(1, "ada");
        repo.insert(2, "grace");
        println!(
            "{} users in {} (cache capacity {})",
            repo.count(),
            repo.db.url,
            repo.cache.capacity
        );
        Ok::<_, BoxError>(())
    })?;

    // The database was built once, as a dependency of the repository.
    let db = registry.get::<Database>()?;
    let repo = registry.get::<UserRepository>()?;
    println!("shared database: {}", Arc::ptr_eq(&db, &repo.db));

    match registry.get::<AuditLog>() {
        Ok(_) => println!("audit log ready"),
        Err(err) => println!("audit log unavailable: {}", err),
    }

    match registry.register(|| Ok::<_, BoxError>(UserCache { capacity: 1 })) {
        Err(DiError::DuplicateRegistration(name)) => println!("{} is already bound", name),
        other => println!("unexpected: {:?}", other),
    }

    Ok(())
}
