//! 应用配置：从 config/default.toml 与环境变量加载
//!
//! 加载顺序：先读 TOML 文件，再用环境变量 `TASTE__*` 覆盖（双下划线表示
//! 嵌套，如 `TASTE__GEMINI__MODEL=gemini-2.0-flash`）。API 密钥不走配置
//! 文件，各客户端自行读 GEMINI_API_KEY / QLOO_API_KEY。

use std::path::PathBuf;

use serde::Deserialize;

/// 应用配置根（对应 config/default.toml 的顶层）
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    #[serde(default)]
    pub app: AppSection,
    #[serde(default)]
    pub gemini: GeminiSection,
    #[serde(default)]
    pub qloo: QlooSection,
    #[serde(default)]
    pub ui: UiSection,
}

/// [app] 段：应用名与单类型拉取条数
#[derive(Debug, Clone, Deserialize)]
pub struct AppSection {
    #[serde(default = "default_app_name")]
    pub name: String,
    /// 每种实体类型拉取的推荐条数上限
    #[serde(default = "default_fetch_limit")]
    pub fetch_limit: usize,
}

impl Default for AppSection {
    fn default() -> Self {
        Self {
            name: default_app_name(),
            fetch_limit: default_fetch_limit(),
        }
    }
}

fn default_app_name() -> String {
    "TasteSphere".to_string()
}

fn default_fetch_limit() -> usize {
    5
}

/// [gemini] 段：语言分析服务端点
#[derive(Debug, Clone, Deserialize)]
pub struct GeminiSection {
    #[serde(default = "default_gemini_base_url")]
    pub base_url: String,
    #[serde(default = "default_gemini_model")]
    pub model: String,
    #[serde(default = "default_gemini_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for GeminiSection {
    fn default() -> Self {
        Self {
            base_url: default_gemini_base_url(),
            model: default_gemini_model(),
            timeout_secs: default_gemini_timeout_secs(),
        }
    }
}

fn default_gemini_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_gemini_model() -> String {
    "gemini-2.0-flash".to_string()
}

fn default_gemini_timeout_secs() -> u64 {
    30
}

/// [qloo] 段：品味图谱服务端点
#[derive(Debug, Clone, Deserialize)]
pub struct QlooSection {
    #[serde(default = "default_qloo_base_url")]
    pub base_url: String,
    #[serde(default = "default_qloo_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for QlooSection {
    fn default() -> Self {
        Self {
            base_url: default_qloo_base_url(),
            timeout_secs: default_qloo_timeout_secs(),
        }
    }
}

fn default_qloo_base_url() -> String {
    "https://hackathon.api.qloo.com/v2/insights".to_string()
}

fn default_qloo_timeout_secs() -> u64 {
    15
}

/// [ui] 段：主题与渲染节奏
#[derive(Debug, Clone, Deserialize)]
pub struct UiSection {
    /// dark / light；被 config/theme.toml 中的用户偏好覆盖
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default = "default_tick_rate_ms")]
    pub tick_rate_ms: u64,
}

impl Default for UiSection {
    fn default() -> Self {
        Self {
            theme: default_theme(),
            tick_rate_ms: default_tick_rate_ms(),
        }
    }
}

fn default_theme() -> String {
    "light".to_string()
}

fn default_tick_rate_ms() -> u64 {
    100
}

/// 从 config 目录加载配置，环境变量 TASTE__* 可覆盖
///
/// 1. 按顺序查找 config/default.toml、../config/default.toml、default.toml，找到则作为第一源
/// 2. 若传入 config_path 且文件存在，则追加该文件（可覆盖前面的键）
/// 3. 最后叠加环境变量 TASTE__*（双下划线表示嵌套键）
pub fn load_config(config_path: Option<PathBuf>) -> Result<AppConfig, config::ConfigError> {
    let mut builder = config::Config::builder();

    let default_names = ["config/default", "../config/default", "default"];
    for name in default_names {
        let path = format!("{}.toml", name);
        if std::path::Path::new(&path).exists() {
            builder = builder.add_source(config::File::with_name(name).required(false));
            break;
        }
    }

    if let Some(ref path) = config_path {
        if path.exists() {
            builder = builder.add_source(config::File::from(path.clone()).required(false));
        }
    }

    builder = builder.add_source(
        config::Environment::with_prefix("TASTE")
            .separator("__")
            .try_parsing(true),
    );

    let c = builder.build()?;
    c.try_deserialize()
}
