pub static DEFAULT_USER_AGENT: &str =
    concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);

/// Name of the form field and cookie Django's CSRF middleware checks.
pub static CSRF_FIELD: &str = "csrfmiddlewaretoken";
pub static CSRF_COOKIE: &str = "csrftoken";
pub static SESSION_COOKIE: &str = "sessionid";

/// Builds a `Cookie` header value from `(name, value)` pairs, percent-encoding the values.
pub fn cookie_header<'a>(cookies: impl IntoIterator<Item = (&'a str, &'a str)>) -> String {
    cookies
        .into_iter()
        .map(|(name, value)| format!("{name}={}", urlencoding::encode(value)))
        .collect::<Vec<_>>()
        .join("; ")
}
