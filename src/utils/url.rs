use axum::http::{HeaderMap, header};

/// `proto://host` of the incoming request, honouring `X-Forwarded-Proto`.
/// `None` when the request carries no `Host` header.
pub fn request_origin(headers: &HeaderMap) -> Option<String> {
    let host = headers
        .get("x-forwarded-host")
        .or_else(|| headers.get(header::HOST))
        .and_then(|v| v.to_str().ok())
        .map(|v| v.split(',').next().unwrap_or(v).trim())
        .filter(|v| !v.is_empty())?;

    let proto = headers
        .get("x-forwarded-proto")
        .and_then(|v| v.to_str().ok())
        .map(|v| v.split(',').next().unwrap_or(v).trim())
        .filter(|v| *v == "http" || *v == "https")
        .unwrap_or("http");

    Some(format!("{proto}://{host}"))
}

/// Prefixes relative URLs with the request origin; absolute URLs pass through.
pub fn absolutize(origin: Option<&str>, url: &str) -> String {
    match origin {
        Some(origin) if !url.starts_with("http") => format!("{origin}{url}"),
        _ => url.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_origin_from_host() {
        let mut headers = HeaderMap::new();
        headers.insert(header::HOST, HeaderValue::from_static("localhost:5001"));
        assert_eq!(
            request_origin(&headers).as_deref(),
            Some("http://localhost:5001")
        );
    }

    #[test]
    fn test_origin_behind_proxy() {
        let mut headers = HeaderMap::new();
        headers.insert(header::HOST, HeaderValue::from_static("internal:5001"));
        headers.insert("x-forwarded-host", HeaderValue::from_static("edu.example.com"));
        headers.insert("x-forwarded-proto", HeaderValue::from_static("https, http"));
        assert_eq!(
            request_origin(&headers).as_deref(),
            Some("https://edu.example.com")
        );
    }

    #[test]
    fn test_absolutize() {
        let origin = Some("http://localhost:5001");
        assert_eq!(
            absolutize(origin, "/uploads/logos/a.png"),
            "http://localhost:5001/uploads/logos/a.png"
        );
        assert_eq!(
            absolutize(origin, "https://cdn.example.com/a.png"),
            "https://cdn.example.com/a.png"
        );
        assert_eq!(absolutize(None, "/uploads/a.png"), "/uploads/a.png");
    }
}
