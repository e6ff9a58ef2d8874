use axum::http::{header, HeaderMap};

/// Name of the cookie carrying the auth token.
pub const TOKEN_COOKIE: &str = "token";

/// Set-Cookie value issued on login.
pub fn session_cookie(token: &str) -> String {
    format!("{TOKEN_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax")
}

/// Set-Cookie value that expires the auth cookie (logout / password change).
pub fn expired_cookie() -> String {
    format!("{TOKEN_COOKIE}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
}

/// Pull the auth token out of the request's Cookie header(s).
pub fn token_from_headers(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| {
            let (name, value) = pair.trim().split_once('=')?;
            (name == TOKEN_COOKIE).then(|| value.to_string())
        })
        .next()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with_cookie(raw: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_str(raw).unwrap());
        headers
    }

    #[test]
    fn extracts_token_among_other_cookies() {
        let headers = headers_with_cookie("theme=dark; token=abc.def.ghi; lang=en");
        assert_eq!(token_from_headers(&headers).as_deref(), Some("abc.def.ghi"));
    }

    #[test]
    fn missing_token_cookie_yields_none() {
        let headers = headers_with_cookie("theme=dark; lang=en");
        assert_eq!(token_from_headers(&headers), None);
        assert_eq!(token_from_headers(&HeaderMap::new()), None);
    }

    #[test]
    fn token_cookie_name_must_match_exactly() {
        let headers = headers_with_cookie("token2=nope; xtoken=nope");
        assert_eq!(token_from_headers(&headers), None);
    }

    #[test]
    fn session_cookie_is_http_only() {
        let cookie = session_cookie("abc");
        assert!(cookie.starts_with("token=abc;"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("Path=/"));
    }

    #[test]
    fn expired_cookie_clears_the_value() {
        let cookie = expired_cookie();
        assert!(cookie.starts_with("token=;"));
        assert!(cookie.contains("Max-Age=0"));
    }
}
