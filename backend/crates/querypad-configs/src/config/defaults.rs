// Default value functions

pub fn default_host() -> String {
    "127.0.0.1".to_string()
}

pub fn default_port() -> u16 {
    3000
}

pub fn default_workers() -> usize {
    0
}

pub fn default_true() -> bool {
    true
}

pub fn default_log_level() -> String {
    "info".to_string()
}

pub fn default_logs_path() -> String {
    "./logs".to_string()
}

pub fn default_log_format() -> String {
    "compact".to_string()
}

pub fn default_keepalive_timeout() -> u64 {
    75
}

pub fn default_client_request_timeout() -> u64 {
    5
}

pub fn default_client_disconnect_timeout() -> u64 {
    2
}

pub fn default_backlog() -> u32 {
    2048
}

pub fn default_max_request_body_size() -> usize {
    10 * 1024 * 1024 // 10MB, uploaded CSV travels in the JSON body
}

pub fn default_cors_methods() -> Vec<String> {
    vec!["GET".to_string(), "POST".to_string(), "OPTIONS".to_string()]
}

pub fn default_cors_headers() -> Vec<String> {
    vec![
        "Content-Type".to_string(),
        "Accept".to_string(),
        "Origin".to_string(),
        "X-Requested-With".to_string(),
    ]
}

pub fn default_cors_max_age() -> u64 {
    3600
}

pub fn default_generation_endpoint() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

pub fn default_generation_model() -> String {
    "gemini-2.0-flash".to_string()
}

pub fn default_generation_timeout_secs() -> u64 {
    30
}

/// Worker count used when `server.workers = 0`.
pub fn resolve_workers(configured: usize) -> usize {
    if configured == 0 {
        num_cpus::get()
    } else {
        configured
    }
}
