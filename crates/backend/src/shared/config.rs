use serde::Deserialize;
use std::net::SocketAddr;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub llm: LlmConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub bind: SocketAddr,
    /// Каталог собранного фронтенда (trunk build)
    pub static_dir: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LlmConfig {
    /// OpenAI-совместимый endpoint
    pub api_base: String,
    /// Имя переменной окружения с ключом API
    pub api_key_env: String,
    /// Модели в порядке приоритета
    pub models: Vec<String>,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl LlmConfig {
    /// Ключ API из окружения; пустое значение считается отсутствующим
    pub fn api_key(&self) -> Option<String> {
        std::env::var(&self.api_key_env)
            .ok()
            .filter(|k| !k.trim().is_empty())
    }
}

/// Default configuration embedded in the binary
const DEFAULT_CONFIG: &str = r#"
[server]
bind = "0.0.0.0:3000"
static_dir = "dist"

[llm]
api_base = "https://api.groq.com/openai/v1"
api_key_env = "LLM_API_KEY"
models = ["llama-3.3-70b-versatile", "llama-3.1-70b-versatile", "llama-3.1-8b-instant"]
temperature = 0.1
max_tokens = 4096
"#;

/// Load configuration from config.toml file
///
/// Search order:
/// 1. Next to the executable (for production)
/// 2. Falls back to embedded default config
pub fn load_config() -> anyhow::Result<Config> {
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            let config_path = exe_dir.join("config.toml");

            if config_path.exists() {
                tracing::info!("Loading config from: {}", config_path.display());
                let contents = std::fs::read_to_string(&config_path)?;
                return parse_config(&contents);
            } else {
                tracing::warn!("config.toml not found at: {}", config_path.display());
            }
        }
    }

    tracing::info!("Using default embedded configuration");
    parse_config(DEFAULT_CONFIG)
}

fn parse_config(contents: &str) -> anyhow::Result<Config> {
    let config: Config = toml::from_str(contents)?;
    if !(0.0..=2.0).contains(&config.llm.temperature) {
        anyhow::bail!(
            "llm.temperature must be within 0.0..=2.0, got {}",
            config.llm.temperature
        );
    }
    if config.llm.max_tokens == 0 {
        anyhow::bail!("llm.max_tokens must be positive");
    }
    if config.llm.models.iter().all(|m| m.trim().is_empty()) {
        anyhow::bail!("llm.models must name at least one model");
    }
    Ok(config)
}
