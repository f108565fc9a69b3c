//! URL helpers for building backend endpoint addresses.
//!
//! The base URL comes from user configuration and may or may not carry a
//! trailing slash; endpoint paths in this crate are written with a leading
//! slash. Both are normalised here so request URLs never contain `//`.

/// Backend liveness endpoint.
pub const HEALTH_ENDPOINT: &str = "/health";
/// Chat submission endpoint.
pub const CHAT_ENDPOINT: &str = "/api/chat";
/// Agent listing endpoint.
pub const AGENTS_ENDPOINT: &str = "/api/agents";
/// Language-model provider status endpoint.
pub const PROVIDERS_ENDPOINT: &str = "/api/llm/providers";
/// Default provider switch endpoint.
pub const SWITCH_ENDPOINT: &str = "/api/llm/switch";

/// Strip trailing slashes from a base URL.
///
/// ```
/// use wayfarer::utils::url::normalize_base_url;
///
/// assert_eq!(normalize_base_url("http://localhost:8000/"), "http://localhost:8000");
/// assert_eq!(normalize_base_url("http://localhost:8000"), "http://localhost:8000");
/// ```
pub fn normalize_base_url(base_url: &str) -> String {
    base_url.trim().trim_end_matches('/').to_string()
}

/// Join a base URL and an endpoint path with exactly one slash.
///
/// ```
/// use wayfarer::utils::url::construct_api_url;
///
/// assert_eq!(
///     construct_api_url("http://localhost:8000/", "/api/chat"),
///     "http://localhost:8000/api/chat"
/// );
/// ```
pub fn construct_api_url(base_url: &str, endpoint: &str) -> String {
    let normalized_base = normalize_base_url(base_url);
    let endpoint = endpoint.trim_start_matches('/');
    format!("{normalized_base}/{endpoint}")
}
