use serde::Deserialize;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Base URL of the recommendation/metadata backend
    #[serde(default = "default_backend_url")]
    pub backend_url: String,

    /// Prefix joined with backend-provided poster paths
    #[serde(default = "default_image_base_url")]
    pub image_base_url: String,

    /// Redis connection URL; the in-memory cache is used when unset
    #[serde(default)]
    pub redis_url: Option<String>,

    /// Seconds a cached backend response stays fresh
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,

    /// Milliseconds allowed for connecting to Redis and for each cache read
    #[serde(default = "default_cache_timeout_ms")]
    pub cache_timeout_ms: u64,

    /// Maximum entries held by the in-memory cache
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: u64,

    /// Timeout applied to every backend request
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Number of cards requested for a category feed
    #[serde(default = "default_home_limit")]
    pub home_limit: u32,

    #[serde(default = "default_top_n")]
    pub tfidf_top_n: u32,

    #[serde(default = "default_top_n")]
    pub hybrid_top_n: u32,

    #[serde(default = "default_top_n")]
    pub genre_limit: u32,

    /// Shortest query (in characters) that triggers a search request
    #[serde(default = "default_min_query_len")]
    pub min_query_len: usize,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_backend_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_image_base_url() -> String {
    "https://image.tmdb.org/t/p/w500".to_string()
}

fn default_cache_ttl_secs() -> u64 {
    300
}

fn default_cache_timeout_ms() -> u64 {
    250
}

fn default_cache_capacity() -> u64 {
    10_000
}

fn default_request_timeout_secs() -> u64 {
    20
}

fn default_home_limit() -> u32 {
    24
}

fn default_top_n() -> u32 {
    12
}

fn default_min_query_len() -> usize {
    2
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend_url: default_backend_url(),
            image_base_url: default_image_base_url(),
            redis_url: None,
            cache_ttl_secs: default_cache_ttl_secs(),
            cache_timeout_ms: default_cache_timeout_ms(),
            cache_capacity: default_cache_capacity(),
            request_timeout_secs: default_request_timeout_secs(),
            home_limit: default_home_limit(),
            tfidf_top_n: default_top_n(),
            hybrid_top_n: default_top_n(),
            genre_limit: default_top_n(),
            min_query_len: default_min_query_len(),
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_iter(std::env::vars())
    }

    /// Load configuration from an explicit set of variables
    pub fn from_iter<I>(vars: I) -> anyhow::Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        envy::from_iter::<_, Config>(vars).map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    /// Address the HTTP listener binds to
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
