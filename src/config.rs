//! 配置模块
//!
//! 支持从 JSON 文件加载系统配置，并允许环境变量覆盖

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// 监听地址
    #[serde(default = "default_host")]
    pub host: String,
    /// 监听端口
    #[serde(default = "default_port")]
    pub port: u16,
    /// 工作线程数（0 表示使用 CPU 核心数）
    #[serde(default)]
    pub workers: usize,
    /// 前端静态文件根目录
    #[serde(default = "default_static_dir")]
    pub static_dir: String,
}

/// 上游 HTTP 请求配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// 请求超时时间（秒）
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// 连接超时时间（秒）
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
}

/// 行情数据源配置（Yahoo Finance）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketConfig {
    /// K线接口，后接股票代码；元数据和日线历史都从这里取
    #[serde(default = "default_chart_url")]
    pub chart_url: String,
    /// 历史数据回溯天数（自然日）
    #[serde(default = "default_lookback_days")]
    pub lookback_days: i64,
}

/// 大模型补全服务配置（Groq，OpenAI 兼容接口）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionConfig {
    /// API Key，为空则聊天接口下线
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_completion_base_url")]
    pub base_url: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// 系统提示词
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,
}

/// 应用配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// 服务器配置
    #[serde(default)]
    pub server: ServerConfig,
    /// 上游请求配置
    #[serde(default)]
    pub api: ApiConfig,
    /// 行情数据源配置
    #[serde(default)]
    pub market: MarketConfig,
    /// 补全服务配置
    #[serde(default)]
    pub completion: CompletionConfig,
}

// 默认值函数
fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 5000 }
fn default_static_dir() -> String { "static".to_string() }
fn default_timeout() -> u64 { 10 }
fn default_connect_timeout() -> u64 { 5 }
fn default_chart_url() -> String { "https://query1.finance.yahoo.com/v8/finance/chart".to_string() }
fn default_lookback_days() -> i64 { 30 }
fn default_completion_base_url() -> String { "https://api.groq.com/openai/v1".to_string() }
fn default_model() -> String { "mixtral-8x7b-32768".to_string() }
fn default_temperature() -> f32 { 0.7 }
fn default_max_tokens() -> u32 { 256 }
fn default_system_prompt() -> String {
    "You are a concise, helpful, and ultra-fast AI financial assistant. \
     Provide factual and brief answers related to stocks and finance."
        .to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: 0,
            static_dir: default_static_dir(),
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout(),
            connect_timeout_secs: default_connect_timeout(),
        }
    }
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            chart_url: default_chart_url(),
            lookback_days: default_lookback_days(),
        }
    }
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_completion_base_url(),
            model: default_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            system_prompt: default_system_prompt(),
        }
    }
}

impl CompletionConfig {
    /// 返回可用的 API Key，空字符串视为未配置
    pub fn credential(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }
}

impl AppConfig {
    /// 从 JSON 文件加载配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: AppConfig = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// 加载配置，优先从文件，失败则使用默认值，最后应用环境变量覆盖
    pub fn load() -> Self {
        let mut config = Self::load_file_or_default();
        config.apply_env(|key| std::env::var(key).ok());
        config
    }

    fn load_file_or_default() -> Self {
        let config_paths = ["config.json", "config/config.json"];

        for path in config_paths {
            if Path::new(path).exists() {
                match Self::from_file(path) {
                    Ok(config) => {
                        log::info!("从 {} 加载配置成功", path);
                        return config;
                    }
                    Err(e) => {
                        log::warn!("加载配置文件 {} 失败: {}", path, e);
                    }
                }
            }
        }

        log::info!("使用默认配置");
        Self::default()
    }

    /// 应用环境变量覆盖
    ///
    /// `lookup` 抽象出环境变量读取，便于测试
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("PORT") {
            match port.trim().parse::<u16>() {
                Ok(port) => self.server.port = port,
                Err(e) => log::warn!("PORT 环境变量无效 ({}): {}，继续使用 {}", port, e, self.server.port),
            }
        }
        if let Some(dir) = lookup("STATIC_DIR") {
            self.server.static_dir = dir;
        }
        if let Some(key) = lookup("GROQ_API_KEY") {
            self.completion.api_key = Some(key);
        }
        if let Some(model) = lookup("GROQ_MODEL") {
            self.completion.model = model;
        }
        if let Some(base_url) = lookup("GROQ_BASE_URL") {
            self.completion.base_url = base_url;
        }
    }

    /// 获取服务器绑定地址
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
