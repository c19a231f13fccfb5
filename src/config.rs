use anyhow::{anyhow, bail, Result};
use serenity::all::ChannelId;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::io::AsyncReadExt;

const CONFIG_PATH_REL_HOME: &str = ".config/reactbot/config.toml";

const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_MODEL: &str = "gpt-4o-mini";
const DEFAULT_SYSTEM_PROMPT: &str = "You react to Discord messages with a single emoji. \
Read the message (and any images) and reply with exactly one emoji that fits its mood or content. \
Output only the emoji, with no words, punctuation, or explanation.";

/// Substrings of model names that accept image input
const VISION_MODEL_INDICATORS: [&str; 6] =
    ["gpt-4", "gpt-4o", "gpt-4.1", "vision", "claude", "gemini"];

/// Bot configuration as written in the TOML file
#[derive(serde::Serialize, serde::Deserialize)]
pub struct Config {
    pub bot_token: String,
    #[serde(default)]
    pub client_id: Option<u64>,
    pub openai_api_key: String,
    #[serde(default = "default_openai_base_url")]
    pub openai_base_url: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_model")]
    pub tone_model: String,
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,
    #[serde(default)]
    pub whitelisted_channels: Vec<u64>,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default = "default_true")]
    pub ignore_bots: bool,
    #[serde(default = "default_true")]
    pub ignore_links_only: bool,
    #[serde(default)]
    pub check_tone_appropriateness: bool,
    #[serde(default = "default_request_timeout_seconds")]
    pub request_timeout_seconds: u64,
}

fn default_openai_base_url() -> String {
    DEFAULT_OPENAI_BASE_URL.to_owned()
}

fn default_model() -> String {
    DEFAULT_MODEL.to_owned()
}

fn default_system_prompt() -> String {
    DEFAULT_SYSTEM_PROMPT.to_owned()
}

fn default_log_level() -> String {
    "info".to_owned()
}

fn default_true() -> bool {
    true
}

fn default_request_timeout_seconds() -> u64 {
    30
}

/// Validated, immutable settings shared by every pipeline stage.
///
/// Built once at startup and only ever handed out by reference.
pub struct Settings {
    pub bot_token: String,
    pub client_id: Option<u64>,
    pub openai_api_key: String,
    pub openai_base_url: String,
    pub model: String,
    pub tone_model: String,
    pub system_prompt: String,
    pub whitelisted_channels: HashSet<ChannelId>,
    pub log_level: tracing::Level,
    pub ignore_bots: bool,
    pub ignore_links_only: bool,
    pub check_tone_appropriateness: bool,
    pub request_timeout: Duration,
    /// Whether `model` accepts image input
    pub supports_vision: bool,
    /// Whether `tone_model` accepts image input
    pub tone_supports_vision: bool,
}

impl Config {
    pub fn default_path() -> Result<PathBuf> {
        dirs::home_dir()
            .map(|p| p.join(CONFIG_PATH_REL_HOME))
            .ok_or(anyhow!("Could not find home directory"))
    }

    pub async fn load(path: &Path) -> Result<Self> {
        let mut file = tokio::fs::File::open(path).await.map_err(|e| {
            anyhow!(
                "Could not open configuration at `{}`: {}",
                path.to_string_lossy(),
                e
            )
        })?;

        let mut contents = String::new();
        file.read_to_string(&mut contents).await.map_err(|e| {
            anyhow!(
                "Could not read configuration at `{}`: {}",
                path.to_string_lossy(),
                e
            )
        })?;

        Self::parse(&contents).map_err(|e| {
            anyhow!(
                "Could not parse configuration at `{}`: {}",
                path.to_string_lossy(),
                e
            )
        })
    }

    pub fn parse(contents: &str) -> Result<Self> {
        toml::from_str(contents).map_err(Into::into)
    }
}

impl TryFrom<Config> for Settings {
    type Error = anyhow::Error;

    fn try_from(cfg: Config) -> Result<Self> {
        if cfg.bot_token.trim().is_empty() {
            bail!("Missing required config: bot_token");
        }
        if cfg.openai_api_key.trim().is_empty() {
            bail!("Missing required config: openai_api_key");
        }
        if cfg.request_timeout_seconds == 0 {
            bail!("request_timeout_seconds must be greater than zero");
        }

        // Discord snowflakes are never zero, and serenity refuses to build one.
        let whitelisted_channels = cfg
            .whitelisted_channels
            .iter()
            .map(|&id| {
                if id == 0 {
                    Err(anyhow!("Invalid channel id in whitelisted_channels: 0"))
                } else {
                    Ok(ChannelId::new(id))
                }
            })
            .collect::<Result<HashSet<_>>>()?;

        let log_level = parse_log_level(&cfg.log_level)?;

        let supports_vision = is_vision_model(&cfg.model);
        let tone_supports_vision = is_vision_model(&cfg.tone_model);

        Ok(Self {
            bot_token: cfg.bot_token,
            client_id: cfg.client_id,
            openai_api_key: cfg.openai_api_key,
            openai_base_url: cfg.openai_base_url.trim_end_matches('/').to_owned(),
            model: cfg.model,
            tone_model: cfg.tone_model,
            system_prompt: cfg.system_prompt,
            whitelisted_channels,
            log_level,
            ignore_bots: cfg.ignore_bots,
            ignore_links_only: cfg.ignore_links_only,
            check_tone_appropriateness: cfg.check_tone_appropriateness,
            request_timeout: Duration::from_secs(cfg.request_timeout_seconds),
            supports_vision,
            tone_supports_vision,
        })
    }
}

impl Settings {
    pub async fn load(path: &Path) -> Result<Self> {
        Config::load(path).await?.try_into()
    }

    pub fn is_whitelisted(&self, channel_id: ChannelId) -> bool {
        self.whitelisted_channels.contains(&channel_id)
    }

    /// Whether any model this message will be sent to can look at images
    pub fn wants_images(&self) -> bool {
        self.supports_vision || (self.check_tone_appropriateness && self.tone_supports_vision)
    }
}

/// Accepts tracing's level names as well as the `warning`/`critical` spellings common in
/// other bots' configs.
fn parse_log_level(level: &str) -> Result<tracing::Level> {
    match level.trim().to_lowercase().as_str() {
        "warning" => Ok(tracing::Level::WARN),
        "critical" => Ok(tracing::Level::ERROR),
        other => other
            .parse()
            .map_err(|_| anyhow!("Invalid log_level `{}`", level)),
    }
}

pub fn is_vision_model(model: &str) -> bool {
    let model = model.to_lowercase();
    VISION_MODEL_INDICATORS
        .iter()
        .any(|indicator| model.contains(indicator))
}

#[cfg(test)]
pub(crate) fn test_settings(extra: &str) -> Settings {
    let toml = format!(
        "bot_token = \"token\"\nopenai_api_key = \"key\"\nwhitelisted_channels = [1]\n{}",
        extra
    );
    Config::parse(&toml)
        .and_then(Settings::try_from)
        .unwrap()
}
