/// Path prefixes of the pages the agent runs on: movie pages, TV episode
/// pages and TV season pages.
pub const ROUTE_PATTERNS: [&str; 3] = ["/v/movie/", "/v/tv/episode/", "/v/tv/season/"];

/// True if a page with this URL path should get the control.
pub fn is_supported_route(path: &str) -> bool {
    ROUTE_PATTERNS
        .iter()
        .any(|pattern| path.starts_with(pattern))
}
