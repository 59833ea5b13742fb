use url::Url;

const MASK: &str = "******";
const APP_ID_LEN: usize = 8;

/// Display form of a target URL with secrets hidden.
///
/// A password in the userinfo is replaced, and a final path segment that
/// looks like an app ID (exactly eight characters) is masked. The query
/// string is dropped.
#[must_use]
pub fn mask_url(url: &Url) -> String {
    let mut masked = format!("{}://", url.scheme());
    if !url.username().is_empty() || url.password().is_some() {
        masked.push_str(url.username());
        if url.password().is_some() {
            masked.push(':');
            masked.push_str(MASK);
        }
        masked.push('@');
    }
    if let Some(host) = url.host_str() {
        masked.push_str(host);
    }
    if let Some(port) = url.port() {
        masked.push(':');
        masked.push_str(&port.to_string());
    }

    let path = url.path();
    match path.rsplit_once('/') {
        Some((prefix, last)) if last.chars().count() == APP_ID_LEN => {
            masked.push_str(prefix);
            masked.push('/');
            masked.push_str(MASK);
        }
        Some(_) | None => masked.push_str(path),
    }
    masked
}
