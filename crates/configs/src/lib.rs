use anyhow::Result;
use serde::Deserialize;
use anyhow::anyhow;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub dependencies: DependenciesConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "127.0.0.1".into(), port: 8000, worker_threads: Some(4) }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_database_name")]
    pub name: String,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
}

/// Base URLs of the services consulted during product creation, plus the
/// bound on how long a single lookup may block the handling request.
#[derive(Debug, Clone, Deserialize)]
pub struct DependenciesConfig {
    #[serde(default)]
    pub unit_measure_url: String,
    #[serde(default)]
    pub department_url: String,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

impl Default for DependenciesConfig {
    fn default() -> Self {
        Self {
            unit_measure_url: String::new(),
            department_url: String::new(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

fn default_database_name() -> String { "product_management".to_string() }
fn default_connect_timeout() -> u64 { 30 }
fn default_request_timeout() -> u64 { 5 }

pub fn load_default() -> Result<AppConfig> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    load_from_file(&path)
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    let cfg: AppConfig = toml::from_str(&content)?;
    Ok(cfg)
}

impl AppConfig {
    pub fn load_and_validate() -> Result<Self> {
        let mut cfg = load_default().unwrap_or_default();
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        // 归一化 server
        self.server.normalize()?;
        // 归一化 database（支持从环境变量填充 URL）
        self.database.normalize_from_env();
        self.database.validate()?;
        // 依赖服务地址同样允许由环境变量提供
        self.dependencies.normalize_from_env();
        self.dependencies.validate()?;
        Ok(())
    }
}

impl ServerConfig {
    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = "127.0.0.1".to_string();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be in 1..=65535"));
        }
        if let Some(w) = self.worker_threads {
            if w == 0 { self.worker_threads = Some(4); }
        } else {
            self.worker_threads = Some(4);
        }
        Ok(())
    }
}

impl DatabaseConfig {
    pub fn normalize_from_env(&mut self) {
        // 若 TOML 中未提供 URL，则尝试从环境变量填充
        if self.url.trim().is_empty() {
            if let Ok(url) = std::env::var("MONGODB_URL") {
                self.url = url;
            }
        }
        if self.name.trim().is_empty() {
            self.name = std::env::var("MONGODB_DATABASE")
                .unwrap_or_else(|_| default_database_name());
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.url.trim().is_empty() {
            return Err(anyhow!("database.url is empty; provide it in config.toml or the MONGODB_URL env var"));
        }
        let lower = self.url.to_lowercase();
        if !(lower.starts_with("mongodb://") || lower.starts_with("mongodb+srv://")) {
            return Err(anyhow!("database.url must start with mongodb:// or mongodb+srv://"));
        }
        if self.connect_timeout_secs == 0 {
            return Err(anyhow!("database.connect_timeout_secs must be a positive number of seconds"));
        }
        Ok(())
    }
}

impl DependenciesConfig {
    pub fn normalize_from_env(&mut self) {
        if self.unit_measure_url.trim().is_empty() {
            self.unit_measure_url = std::env::var("QUERY_UNIT_MEASURE_BY_ID")
                .unwrap_or_else(|_| "http://127.0.0.1:8000/unitmeasure/".to_string());
        }
        if self.department_url.trim().is_empty() {
            self.department_url = std::env::var("QUERY_DEPARTMENT_BY_ID")
                .unwrap_or_else(|_| "http://127.0.0.1:8000/departments/".to_string());
        }
    }

    pub fn validate(&self) -> Result<()> {
        for (key, url) in [
            ("dependencies.unit_measure_url", &self.unit_measure_url),
            ("dependencies.department_url", &self.department_url),
        ] {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(anyhow!("{} must start with http(s)", key));
            }
        }
        if self.request_timeout_secs == 0 {
            return Err(anyhow!("dependencies.request_timeout_secs must be a positive number of seconds"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_config() {
        let cfg: AppConfig = toml::from_str(
            r#"
            [server]
            host = "0.0.0.0"
            port = 8000

            [database]
            url = "mongodb://localhost:27017"
            name = "inventory"

            [dependencies]
            unit_measure_url = "http://localhost:8000/unitmeasure/"
            department_url = "http://localhost:8000/departments/"
            request_timeout_secs = 3
            "#,
        )
        .expect("parse toml");
        assert_eq!(cfg.server.port, 8000);
        assert_eq!(cfg.database.name, "inventory");
        assert_eq!(cfg.dependencies.request_timeout_secs, 3);
    }

    #[test]
    fn rejects_non_mongodb_url() {
        let db = DatabaseConfig {
            url: "postgres://localhost/db".into(),
            name: "x".into(),
            connect_timeout_secs: 30,
        };
        assert!(db.validate().is_err());
    }

    #[test]
    fn rejects_zero_request_timeout() {
        let deps = DependenciesConfig {
            unit_measure_url: "http://localhost:8000/unitmeasure/".into(),
            department_url: "http://localhost:8000/departments/".into(),
            request_timeout_secs: 0,
        };
        assert!(deps.validate().is_err());
    }

    #[test]
    fn normalize_defaults_missing_sections() {
        let mut cfg: AppConfig = toml::from_str(
            r#"
            [database]
            url = "mongodb://localhost:27017"
            "#,
        )
        .expect("parse toml");
        cfg.normalize_and_validate().expect("validate");
        assert_eq!(cfg.server.host, "127.0.0.1");
        assert_eq!(cfg.database.name, "product_management");
        assert!(cfg.dependencies.unit_measure_url.starts_with("http"));
    }
}
