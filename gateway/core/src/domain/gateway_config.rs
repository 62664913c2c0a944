// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

// Gateway Configuration Types
//
// Defines the configuration schema for the ERP dashboard gateway, including:
// - Kubernetes-style manifest format (apiVersion/kind/metadata/spec)
// - Upstream services (base URL, connect and request timeouts)
// - Domain to service mapping
// - Bearer token verification settings
// - Dashboard defaults and role dispatch overrides
// - Server and observability settings

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::dispatch::{DispatchConfigError, DispatchEntry, DispatchTable, TabBinding};
use super::source::Domain;

pub const API_VERSION: &str = "erp-gateway/v1";
pub const KIND: &str = "GatewayConfig";

/// Environment variable naming an explicit config file.
pub const CONFIG_PATH_ENV: &str = "ERP_GATEWAY_CONFIG_PATH";

/// Top-level Kubernetes-style gateway configuration manifest
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfigManifest {
    /// API version (must be "erp-gateway/v1")
    #[serde(rename = "apiVersion")]
    pub api_version: String,

    /// Resource kind (must be "GatewayConfig")
    pub kind: String,

    pub metadata: ManifestMetadata,

    #[serde(default)]
    pub spec: GatewayConfigSpec,
}

/// Manifest metadata (Kubernetes-style)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestMetadata {
    /// Human-readable gateway instance name
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<HashMap<String, String>>,
}

/// Gateway configuration specification (content under spec:)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfigSpec {
    #[serde(default)]
    pub server: ServerConfig,

    /// Upstream services keyed by service key (e.g. "business", "scm")
    #[serde(default = "default_services")]
    pub services: BTreeMap<String, ServiceConfig>,

    /// Explicit domain to service key mapping. Unlisted domains use
    /// their default service.
    #[serde(default)]
    pub domains: BTreeMap<Domain, String>,

    #[serde(default)]
    pub auth: AuthConfig,

    #[serde(default)]
    pub dashboard: DashboardConfig,

    #[serde(default)]
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Network bind address (e.g. "0.0.0.0" or "127.0.0.1")
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// HTTP API port
    #[serde(default = "default_api_port")]
    pub port: u16,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceConfig {
    pub base_url: String,

    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,

    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

impl ServiceConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            connect_timeout_ms: default_connect_timeout_ms(),
            request_timeout_ms: default_request_timeout_ms(),
        }
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthConfig {
    /// HS256 signing secret (supports "env:VAR_NAME"). Absent disables auth.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jwt_secret: Option<String>,

    /// Required `iss` claim, when set
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issuer: Option<String>,
}

impl AuthConfig {
    /// Resolve the secret (supports "env:VAR_NAME" syntax)
    pub fn resolve_secret(&self) -> anyhow::Result<Option<String>> {
        match self.jwt_secret.as_deref() {
            Some(value) => match value.strip_prefix("env:") {
                Some(var_name) => std::env::var(var_name)
                    .map(Some)
                    .map_err(|_| anyhow::anyhow!("Environment variable not set: {}", var_name)),
                None if value.is_empty() => Ok(None),
                None => Ok(Some(value.to_string())),
            },
            None => Ok(None),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Item count requested per tab when the caller sends no size
    #[serde(default = "default_size")]
    pub default_size: u32,

    /// Additional or replacement role dispatch entries
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub roles: Vec<RoleOverride>,
}

/// Role dispatch entry as written in configuration.
///
/// ```yaml
/// roles:
///   - role_key: QA
///     tabs:
///       - { tab_code: MES, operation: production_in_progress }
///       - { tab_code: OUT, operation: outbound_deliveries }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleOverride {
    pub role_key: String,
    pub tabs: Vec<TabBinding>,
}

impl DashboardConfig {
    /// Standard dispatch table with the configured overrides merged in.
    pub fn dispatch_table(&self) -> Result<DispatchTable, DispatchConfigError> {
        let overrides = self
            .roles
            .iter()
            .map(|role| DispatchEntry::from_bindings(role.role_key.clone(), &role.tabs))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(DispatchTable::standard().with_overrides(overrides))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub metrics: MetricsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (e.g., "info", "debug", "trace")
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format ("json" or "text")
    #[serde(default = "default_log_format")]
    pub format: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsConfig {
    /// Enable Prometheus exposition
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Metrics listener port
    #[serde(default = "default_metrics_port")]
    pub port: u16,
}

// Default value functions
fn default_true() -> bool {
    true
}

fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}

fn default_api_port() -> u16 {
    8080
}

fn default_connect_timeout_ms() -> u64 {
    5_000
}

fn default_request_timeout_ms() -> u64 {
    10_000
}

fn default_size() -> u32 {
    5
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

fn default_metrics_port() -> u16 {
    9090
}

fn default_services() -> BTreeMap<String, ServiceConfig> {
    BTreeMap::from([
        ("business".to_string(), ServiceConfig::new("http://localhost:8081")),
        ("scm".to_string(), ServiceConfig::new("http://localhost:8082")),
    ])
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            port: default_api_port(),
        }
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            default_size: default_size(),
            roles: vec![],
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            port: default_metrics_port(),
        }
    }
}

impl Default for GatewayConfigSpec {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            services: default_services(),
            domains: BTreeMap::new(),
            auth: AuthConfig::default(),
            dashboard: DashboardConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

impl GatewayConfigSpec {
    /// Service key hosting `domain`.
    pub fn service_for(&self, domain: Domain) -> &str {
        self.domains
            .get(&domain)
            .map(String::as_str)
            .unwrap_or_else(|| domain.default_service())
    }
}

impl Default for GatewayConfigManifest {
    fn default() -> Self {
        let hostname = hostname::get()
            .ok()
            .and_then(|h| h.into_string().ok())
            .unwrap_or_else(|| "erp-gateway".to_string());

        Self {
            api_version: API_VERSION.to_string(),
            kind: KIND.to_string(),
            metadata: ManifestMetadata {
                name: hostname,
                version: Some("1.0.0".to_string()),
                labels: None,
            },
            spec: GatewayConfigSpec::default(),
        }
    }
}

impl GatewayConfigManifest {
    /// Load configuration from YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Parse configuration from YAML string
    pub fn from_yaml_str(yaml: &str) -> anyhow::Result<Self> {
        let config = serde_yaml::from_str(yaml)?;
        Ok(config)
    }

    pub fn to_yaml_string(&self) -> anyhow::Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Discover configuration file using precedence order
    /// 1. ERP_GATEWAY_CONFIG_PATH environment variable
    /// 2. ./erp-gateway.yaml (working directory)
    /// 3. ~/.erp-gateway/config.yaml (user home)
    /// 4. /etc/erp-gateway/config.yaml (system, Unix) or C:\ProgramData\ErpGateway\config.yaml (Windows)
    pub fn discover_config() -> Option<PathBuf> {
        if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
            let path = PathBuf::from(path);
            if path.exists() {
                return Some(path);
            }
        }

        let cwd = PathBuf::from("./erp-gateway.yaml");
        if cwd.exists() {
            return Some(cwd);
        }

        if let Some(home) = dirs::home_dir() {
            let user_config = home.join(".erp-gateway").join("config.yaml");
            if user_config.exists() {
                return Some(user_config);
            }
        }

        #[cfg(unix)]
        let system_config = PathBuf::from("/etc/erp-gateway/config.yaml");
        #[cfg(windows)]
        let system_config = PathBuf::from("C:\\ProgramData\\ErpGateway\\config.yaml");

        if system_config.exists() {
            return Some(system_config);
        }

        None
    }

    /// Load configuration with discovery, fallback to default
    pub fn load_or_default(cli_path: Option<PathBuf>) -> anyhow::Result<Self> {
        // Explicit CLI path must exist and parse
        if let Some(path) = cli_path {
            tracing::info!("Loading configuration from explicit path: {:?}", path);
            let mut config = Self::from_yaml_file(&path)
                .map_err(|e| anyhow::anyhow!("Failed to load config at {:?}: {}", path, e))?;
            config.apply_env_overrides();
            return Ok(config);
        }

        if let Some(config_path) = Self::discover_config() {
            tracing::info!("Loading configuration from discovered path: {:?}", config_path);
            let mut config = Self::from_yaml_file(&config_path)
                .map_err(|e| anyhow::anyhow!("Failed to load config at {:?}: {}", config_path, e))?;
            config.apply_env_overrides();
            Ok(config)
        } else {
            tracing::warn!("No configuration file found in standard locations. Using defaults.");
            let mut config = Self::default();
            config.apply_env_overrides();
            Ok(config)
        }
    }

    /// Apply environment variable overrides to configuration
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|name| std::env::var(name).ok());
    }

    /// Apply overrides from an arbitrary variable lookup
    pub fn apply_overrides_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        for (var, service_key) in [
            ("ERP_GATEWAY_BUSINESS_URL", "business"),
            ("ERP_GATEWAY_SCM_URL", "scm"),
        ] {
            if let Some(url) = lookup(var) {
                tracing::info!("Environment override: {}={}", var, url);
                self.spec
                    .services
                    .entry(service_key.to_string())
                    .and_modify(|service| service.base_url = url.clone())
                    .or_insert_with(|| ServiceConfig::new(url));
            }
        }

        if let Some(secret) = lookup("ERP_GATEWAY_JWT_SECRET") {
            tracing::info!("Environment override: ERP_GATEWAY_JWT_SECRET=<redacted>");
            self.spec.auth.jwt_secret = Some(secret);
        }

        if let Some(val) = lookup("ERP_GATEWAY_DEFAULT_SIZE") {
            match val.trim().parse::<u32>() {
                Ok(size) => {
                    tracing::info!("Environment override: ERP_GATEWAY_DEFAULT_SIZE={}", size);
                    self.spec.dashboard.default_size = size;
                }
                Err(_) => {
                    tracing::warn!(
                        "Invalid value for ERP_GATEWAY_DEFAULT_SIZE: '{}'. Expected a non-negative integer. Ignoring.",
                        val
                    );
                }
            }
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.api_version != API_VERSION {
            anyhow::bail!(
                "Invalid apiVersion: '{}'. Must be '{}'",
                self.api_version,
                API_VERSION
            );
        }

        if self.kind != KIND {
            anyhow::bail!("Invalid kind: '{}'. Must be '{}'", self.kind, KIND);
        }

        if self.metadata.name.is_empty() {
            anyhow::bail!("metadata.name cannot be empty");
        }

        for (key, service) in &self.spec.services {
            if key.is_empty() {
                anyhow::bail!("Service key cannot be empty");
            }
            if service.base_url.trim().is_empty() {
                anyhow::bail!("Service base_url cannot be empty for: {}", key);
            }
            if !service.base_url.starts_with("http://") && !service.base_url.starts_with("https://") {
                anyhow::bail!(
                    "Service base_url must be an http(s) URL for '{}': {}",
                    key,
                    service.base_url
                );
            }
        }

        for (domain, service_key) in &self.spec.domains {
            if !self.spec.services.contains_key(service_key) {
                anyhow::bail!(
                    "Domain '{}' is mapped to unknown service '{}'",
                    domain,
                    service_key
                );
            }
        }

        self.spec
            .dashboard
            .dispatch_table()
            .map_err(|e| anyhow::anyhow!("Invalid dashboard.roles: {}", e))?;

        Ok(())
    }
}
