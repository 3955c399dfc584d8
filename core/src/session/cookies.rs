//! Session cookie helpers
//!
//! Credentials are attached explicitly as a `Cookie` header on each request
//! rather than through a cookie jar, so what a request carries is visible at
//! the call site.

use reqwest::header::{HeaderMap, SET_COOKIE};

/// Cookie carrying the access token
pub const ACCESS_COOKIE: &str = "eastagile_access";

/// Cookie carrying the refresh token
pub const REFRESH_COOKIE: &str = "eastagile_refresh";

/// `Cookie` header value for a single cookie
pub fn cookie_header(name: &str, value: &str) -> String {
  format!("{name}={value}")
}

/// Value of cookie `name` set by a response, if any.
///
/// An empty value is treated as absent.
pub fn cookie_from_headers(headers: &HeaderMap, name: &str) -> Option<String> {
  headers
    .get_all(SET_COOKIE)
    .iter()
    .filter_map(|value| value.to_str().ok())
    .find_map(|raw| parse_set_cookie(raw, name))
}

fn parse_set_cookie(raw: &str, name: &str) -> Option<String> {
  let pair = raw.split(';').next()?;
  let (key, value) = pair.split_once('=')?;
  if key.trim() != name {
    return None;
  }
  let value = value.trim().trim_matches('"');
  (!value.is_empty()).then(|| value.to_string())
}

#[cfg(test)]
mod tests {
  use super::*;
  use reqwest::header::HeaderValue;

  fn headers(values: &[&'static str]) -> HeaderMap {
    let mut headers = HeaderMap::new();
    for value in values {
      headers.append(SET_COOKIE, HeaderValue::from_static(value));
    }
    headers
  }

  #[test]
  fn finds_access_cookie_among_others() {
    let headers = headers(&[
      "csrftoken=abc; Path=/",
      "eastagile_access=new-token; Path=/; HttpOnly; Secure; SameSite=Lax",
    ]);

    assert_eq!(
      cookie_from_headers(&headers, ACCESS_COOKIE),
      Some("new-token".to_string())
    );
  }

  #[test]
  fn prefix_match_is_not_enough() {
    let headers = headers(&["eastagile_access_v2=nope; Path=/"]);
    assert_eq!(cookie_from_headers(&headers, ACCESS_COOKIE), None);
  }

  #[test]
  fn cleared_cookie_counts_as_missing() {
    let headers = headers(&["eastagile_access=; Max-Age=0"]);
    assert_eq!(cookie_from_headers(&headers, ACCESS_COOKIE), None);
  }

  #[test]
  fn quoted_value_is_unwrapped() {
    let headers = headers(&["eastagile_access=\"quoted\"; Path=/"]);
    assert_eq!(
      cookie_from_headers(&headers, ACCESS_COOKIE),
      Some("quoted".to_string())
    );
  }

  #[test]
  fn header_value_is_name_equals_value() {
    assert_eq!(cookie_header(REFRESH_COOKIE, "r1"), "eastagile_refresh=r1");
  }
}
