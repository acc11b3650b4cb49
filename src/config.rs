/// 程序配置
#[derive(Clone, Debug)]
pub struct Config {
    /// LMS API 基础地址
    pub api_base_url: String,
    /// Bearer 凭证（由登录流程签发，此处只透传，不在本地解析权限）
    pub bearer_token: String,
    /// 要作答的考试 ID（仅二进制入口使用）
    pub exam_id: u64,
    /// 单次请求超时（秒）
    pub request_timeout_secs: u64,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:4000/api".to_string(),
            bearer_token: String::new(),
            exam_id: 1,
            request_timeout_secs: 30,
            verbose_logging: false,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            api_base_url: std::env::var("LMS_API_BASE_URL").unwrap_or(default.api_base_url),
            bearer_token: std::env::var("LMS_TOKEN").unwrap_or(default.bearer_token),
            exam_id: std::env::var("EXAM_ID").ok().and_then(|v| v.parse().ok()).unwrap_or(default.exam_id),
            request_timeout_secs: std::env::var("REQUEST_TIMEOUT_SECS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.request_timeout_secs),
            verbose_logging: std::env::var("VERBOSE_LOGGING").ok().and_then(|v| v.parse().ok()).unwrap_or(default.verbose_logging),
        }
    }
}
