/// Session cookie for cross-site use by the web client: always `Secure` and `SameSite=None`.
pub fn build_session_cookie(
    name: &str,
    token: &str,
    max_age_secs: u64,
    cookie_domain: &Option<String>,
) -> String {
    let mut cookie = format!(
        "{}={}; HttpOnly; SameSite=None; Secure; Path=/; Max-Age={}",
        name, token, max_age_secs
    );

    if let Some(domain) = cookie_domain {
        cookie.push_str(&format!("; Domain={}", domain));
    }

    cookie
}

pub fn build_clear_cookie(name: &str, cookie_domain: &Option<String>) -> String {
    build_session_cookie(name, "", 0, cookie_domain)
}

pub fn extract_session_token(cookie_header: &str, name: &str) -> Option<String> {
    for part in cookie_header.split(';') {
        let Some((key, value)) = part.trim().split_once('=') else {
            continue;
        };
        if key == name {
            let value = value.trim();
            if !value.is_empty() {
                return Some(value.to_string());
            }
        }
    }
    None
}
