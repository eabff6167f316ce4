use anyhow::Error;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors_permissive: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 5000,
            cors_permissive: true,
        }
    }
}

impl ServerConfig {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct DatabaseConfig {
    pub user: String,
    pub password: String,
    /// Host, optional port and database name, ex. `localhost:5432/ratings`
    pub connect_string: String,
    /// Full connection url, takes precedence over the other fields
    pub url: Option<String>,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            user: "postgres".into(),
            password: String::new(),
            connect_string: "localhost/ratings".into(),
            url: None,
        }
    }
}

impl DatabaseConfig {
    /// Connection url, credentials are percent-encoded so `@`, `:` or `/`
    /// in them can't be read as url delimiters
    pub fn url(&self) -> String {
        match &self.url {
            Some(url) => url.clone(),
            None => format!(
                "postgres://{}:{}@{}",
                urlencoding::encode(&self.user),
                urlencoding::encode(&self.password),
                self.connect_string
            ),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
}

impl Config {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, Error> {
        let contents = std::fs::read_to_string(path)?;
        let parsed: Self = toml::from_str(&contents)?;
        Ok(parsed)
    }

    /// Override values with the ones found in `vars`, usually `dotenv::vars()`
    pub fn apply_env(&mut self, vars: &HashMap<String, String>) -> Result<(), Error> {
        if let Some(port) = vars.get("PORT") {
            self.server.port = port.parse()?;
        }

        if let Some(user) = vars.get("DB_USER") {
            self.database.user = user.clone();
        }

        if let Some(password) = vars.get("DB_PASSWORD") {
            self.database.password = password.clone();
        }

        if let Some(connect_string) = vars.get("DB_CONNECT_STRING") {
            self.database.connect_string = connect_string.clone();
        }

        if let Some(url) = vars.get("DATABASE_URL") {
            self.database.url = Some(url.clone());
        }

        Ok(())
    }
}
