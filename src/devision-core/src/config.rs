use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_beta_url")]
    pub beta_url: String,
    /// Talk to the beta deployment instead of production
    #[serde(default)]
    pub beta: bool,

    /// API token, sent verbatim as the Authorization header
    #[serde(default)]
    pub token: Option<String>,

    /// Turn every non-2xx response into an error
    #[serde(default = "default_raise_for_status")]
    pub raise_for_status: bool,

    /// Libraries the rtfs endpoint has indexed (compared case-insensitively)
    #[serde(default = "default_libraries")]
    pub libraries: Vec<String>,

    // Some deployments gate the homepage endpoint behind a token
    #[serde(default)]
    pub homepage_requires_token: bool,

    /// Prefix of the File-Name header sent with CDN uploads
    #[serde(default = "default_upload_name_prefix")]
    pub upload_name_prefix: String,

    /// Request timeout; the HTTP client's default when unset
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    #[serde(default)]
    pub insecure_skip_verify: bool,
}

fn default_base_url() -> String {
    "https://idevision.net/".to_string()
}

fn default_beta_url() -> String {
    "https://beta.idevision.net/".to_string()
}

fn default_raise_for_status() -> bool {
    true
}

fn default_libraries() -> Vec<String> {
    ["twitchio", "wavelink", "aiohttp", "discord.py", "discord.py-2", "dpy", "dpy2"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_upload_name_prefix() -> String {
    "devision".to_string()
}

impl Config {
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&contents)?;
        Ok(config)
    }

    /// Base URL of the deployment selected by `beta`
    pub fn origin(&self) -> &str {
        if self.beta {
            &self.beta_url
        } else {
            &self.base_url
        }
    }

    /// Trimmed token, or `None` when absent or blank
    pub fn token(&self) -> Option<&str> {
        self.token
            .as_deref()
            .map(str::trim)
            .filter(|token| !token.is_empty())
    }

    pub fn supports_library(&self, library: &str) -> bool {
        self.libraries
            .iter()
            .any(|supported| supported.eq_ignore_ascii_case(library))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            beta_url: default_beta_url(),
            beta: false,
            token: None,
            raise_for_status: default_raise_for_status(),
            libraries: default_libraries(),
            homepage_requires_token: false,
            upload_name_prefix: default_upload_name_prefix(),
            timeout_secs: None,
            insecure_skip_verify: false,
        }
    }
}
