//! Response header lines collected from libcurl's header callback.

/// Headers of the final response. Redirect hops and interim `100 Continue`
/// responses are discarded when the next status line arrives.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseHeaders {
    pub status_line: Option<String>,
    pub content_length: Option<u64>,
    pub set_cookie: Vec<String>,
}

impl ResponseHeaders {
    pub fn parse<S: AsRef<str>>(lines: &[S]) -> Self {
        let mut headers = ResponseHeaders::default();
        for line in lines {
            let line = line.as_ref().trim();
            if line.is_empty() {
                continue;
            }
            if line.starts_with("HTTP/") {
                headers = ResponseHeaders {
                    status_line: Some(line.to_string()),
                    ..ResponseHeaders::default()
                };
                continue;
            }
            let Some((name, value)) = line.split_once(':') else {
                continue;
            };
            let name = name.trim();
            let value = value.trim();
            if name.eq_ignore_ascii_case("content-length") {
                headers.content_length = value.parse::<u64>().ok();
            } else if name.eq_ignore_ascii_case("set-cookie") {
                headers.set_cookie.push(value.to_string());
            }
        }
        headers
    }

    /// All `Set-Cookie` values joined with `", "`, or `None` if the header was absent.
    pub fn set_cookie_joined(&self) -> Option<String> {
        if self.set_cookie.is_empty() {
            None
        } else {
            Some(self.set_cookie.join(", "))
        }
    }
}
