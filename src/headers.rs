use crate::config::SecurityHeaders;
use axum::{
    extract::{Request, State},
    http::{
        header::{CONTENT_SECURITY_POLICY, REFERRER_POLICY, X_CONTENT_TYPE_OPTIONS, X_XSS_PROTECTION},
        HeaderName, HeaderValue,
    },
    middleware::Next,
    response::Response,
};

// Pages may be framed from any origin, so there is no X-Frame-Options and
// frame-ancestors is open.
pub const CONTENT_SECURITY_POLICY_VALUE: &str = "default-src 'self'; \
    style-src 'self' 'unsafe-inline'; \
    script-src 'self'; \
    img-src 'self' data: https:; \
    font-src 'self'; \
    connect-src 'self'; \
    frame-ancestors *; \
    base-uri 'self'";

const X_PERMITTED_CROSS_DOMAIN_POLICIES: HeaderName =
    HeaderName::from_static("x-permitted-cross-domain-policies");

/// The fixed header set, in the order it is applied.
pub fn security_headers() -> [(HeaderName, HeaderValue); 5] {
    [
        (X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff")),
        (X_XSS_PROTECTION, HeaderValue::from_static("1; mode=block")),
        (
            REFERRER_POLICY,
            HeaderValue::from_static("strict-origin-when-cross-origin"),
        ),
        (X_PERMITTED_CROSS_DOMAIN_POLICIES, HeaderValue::from_static("none")),
        (
            CONTENT_SECURITY_POLICY,
            HeaderValue::from_static(CONTENT_SECURITY_POLICY_VALUE),
        ),
    ]
}

/// Middleware that decorates every response with [`security_headers`] when
/// they are enabled. It never rejects a request.
pub async fn apply(
    State(policy): State<SecurityHeaders>,
    request: Request,
    next: Next,
) -> Response {
    let mut response = next.run(request).await;
    if policy.enabled() {
        let headers = response.headers_mut();
        for (name, value) in security_headers() {
            headers.insert(name, value);
        }
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn policy_keeps_framing_open() {
        assert!(CONTENT_SECURITY_POLICY_VALUE.contains("frame-ancestors *"));
        assert!(CONTENT_SECURITY_POLICY_VALUE.contains("img-src 'self' data: https:"));
        assert!(CONTENT_SECURITY_POLICY_VALUE.contains("style-src 'self' 'unsafe-inline'"));
        assert!(!CONTENT_SECURITY_POLICY_VALUE.contains("  "));
    }

    #[test]
    fn header_set_is_fixed() {
        let names: Vec<_> = security_headers()
            .into_iter()
            .map(|(name, _)| name.to_string())
            .collect();
        assert_eq!(
            names,
            [
                "x-content-type-options",
                "x-xss-protection",
                "referrer-policy",
                "x-permitted-cross-domain-policies",
                "content-security-policy",
            ]
        );
    }
}
