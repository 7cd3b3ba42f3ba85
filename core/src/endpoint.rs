//! Endpoint path → absolute URL.

/// Join `endpoint` onto `host`, inserting a leading `/` when the endpoint
/// lacks one. No encoding is applied and no input is rejected.
pub fn build_api_url(host: &str, endpoint: &str) -> String {
    if endpoint.starts_with('/') {
        format!("{host}{endpoint}")
    } else {
        format!("{host}/{endpoint}")
    }
}
