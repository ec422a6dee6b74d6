use std::fmt;
use std::str::FromStr;

use http::header::COOKIE;
use http::HeaderMap;
use http::Uri;

use super::errors::TokenError;

/// A single place a token may be read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenSource {
    /// `<head name> <token>` in the named header
    Header(String),
    /// Named query string parameter
    Query(String),
    /// Named cookie
    Cookie(String),
}

impl TokenSource {
    fn read(&self, headers: &HeaderMap, uri: &Uri, head_name: &str) -> Result<Option<String>, TokenError> {
        match self {
            TokenSource::Header(name) => read_header(headers, name, head_name),
            TokenSource::Query(name) => Ok(read_query(uri, name)),
            TokenSource::Cookie(name) => Ok(read_cookie(headers, name)),
        }
    }
}

impl fmt::Display for TokenSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenSource::Header(name) => write!(f, "header: {}", name),
            TokenSource::Query(name) => write!(f, "query: {}", name),
            TokenSource::Cookie(name) => write!(f, "cookie: {}", name),
        }
    }
}

/// Ordered list of token sources; the first one holding a token wins.
///
/// Parsed from strings such as `"header: Authorization, query: token, cookie: jwt"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenLookup(Vec<TokenSource>);

impl TokenLookup {
    pub const DEFAULT: &'static str = "header: Authorization, query: token, cookie: jwt";

    pub fn sources(&self) -> &[TokenSource] {
        &self.0
    }

    /// Find the token in a request.
    ///
    /// # Errors
    /// * `TokenMissing` - No configured source carries a token
    /// * `TokenInvalid` - A header is present but does not use the expected scheme,
    ///   and no later source carries a token
    pub fn find(&self, headers: &HeaderMap, uri: &Uri, head_name: &str) -> Result<String, TokenError> {
        let mut malformed = None;

        for source in &self.0 {
            match source.read(headers, uri, head_name) {
                Ok(Some(token)) => return Ok(token),
                Ok(None) => {}
                Err(e) => {
                    malformed.get_or_insert(e);
                }
            }
        }

        Err(malformed.unwrap_or(TokenError::TokenMissing))
    }
}

impl Default for TokenLookup {
    fn default() -> Self {
        Self(vec![
            TokenSource::Header("Authorization".to_string()),
            TokenSource::Query("token".to_string()),
            TokenSource::Cookie("jwt".to_string()),
        ])
    }
}

impl FromStr for TokenLookup {
    type Err = TokenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let sources = s
            .split(',')
            .map(|entry| {
                let (kind, name) = entry
                    .split_once(':')
                    .ok_or_else(|| TokenError::InvalidLookup(format!("expected <source>:<name>, got '{}'", entry.trim())))?;
                let name = name.trim();
                if name.is_empty() {
                    return Err(TokenError::InvalidLookup(format!("missing name in '{}'", entry.trim())));
                }

                match kind.trim() {
                    "header" => Ok(TokenSource::Header(name.to_string())),
                    "query" => Ok(TokenSource::Query(name.to_string())),
                    "cookie" => Ok(TokenSource::Cookie(name.to_string())),
                    other => Err(TokenError::InvalidLookup(format!("unknown source '{}'", other))),
                }
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self(sources))
    }
}

impl fmt::Display for TokenLookup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sources: Vec<String> = self.0.iter().map(ToString::to_string).collect();
        f.write_str(&sources.join(", "))
    }
}

fn read_header(headers: &HeaderMap, name: &str, head_name: &str) -> Result<Option<String>, TokenError> {
    let Some(value) = headers.get(name) else {
        return Ok(None);
    };

    let value = value
        .to_str()
        .map_err(|_| TokenError::TokenInvalid(format!("{} header is not valid text", name)))?;
    if value.is_empty() {
        return Ok(None);
    }

    if head_name.is_empty() {
        return Ok(Some(value.to_string()));
    }

    match value.split_once(' ') {
        Some((scheme, token)) if scheme == head_name && !token.trim().is_empty() => {
            Ok(Some(token.trim().to_string()))
        }
        _ => Err(TokenError::TokenInvalid(format!(
            "{} header must be formatted as '{} <token>'",
            name, head_name
        ))),
    }
}

fn read_query(uri: &Uri, name: &str) -> Option<String> {
    let query = uri.query()?;

    url::form_urlencoded::parse(query.as_bytes())
        .find(|(key, value)| key == name && !value.is_empty())
        .map(|(_, value)| value.into_owned())
}

fn read_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, value)| *key == name && !value.is_empty())
        .map(|(_, value)| value.to_string())
}

#[cfg(test)]
mod tests {
    use http::header::AUTHORIZATION;
    use http::HeaderValue;

    use super::*;

    fn uri(s: &str) -> Uri {
        s.parse().unwrap()
    }

    #[test]
    fn test_parse_lookup() {
        let lookup: TokenLookup = "header: Authorization, query: token, cookie: jwt".parse().unwrap();

        assert_eq!(lookup, TokenLookup::default());
        assert_eq!(lookup.to_string(), TokenLookup::DEFAULT);
    }

    #[test]
    fn test_parse_lookup_errors() {
        assert!(matches!(
            "param: id".parse::<TokenLookup>(),
            Err(TokenError::InvalidLookup(_))
        ));
        assert!(matches!(
            "header".parse::<TokenLookup>(),
            Err(TokenError::InvalidLookup(_))
        ));
        assert!(matches!(
            "query: ".parse::<TokenLookup>(),
            Err(TokenError::InvalidLookup(_))
        ));
    }

    #[test]
    fn test_find_in_header() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer abc.def.ghi"));

        let token = TokenLookup::default().find(&headers, &uri("/users/1"), "Bearer");
        assert_eq!(token, Ok("abc.def.ghi".to_string()));
    }

    #[test]
    fn test_find_in_query_and_cookie() {
        let lookup = TokenLookup::default();

        let token = lookup.find(&HeaderMap::new(), &uri("/users/1?x=1&token=abc.def.ghi"), "Bearer");
        assert_eq!(token, Ok("abc.def.ghi".to_string()));

        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_static("theme=dark; jwt=abc.def.ghi"));
        let token = lookup.find(&headers, &uri("/users/1"), "Bearer");
        assert_eq!(token, Ok("abc.def.ghi".to_string()));
    }

    #[test]
    fn test_first_match_wins() {
        let lookup: TokenLookup = "query: token, header: Authorization".parse().unwrap();
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer from-header"));

        let token = lookup.find(&headers, &uri("/?token=from-query"), "Bearer");
        assert_eq!(token, Ok("from-query".to_string()));
    }

    #[test]
    fn test_missing_token() {
        let result = TokenLookup::default().find(&HeaderMap::new(), &uri("/users/1"), "Bearer");
        assert_eq!(result, Err(TokenError::TokenMissing));
    }

    #[test]
    fn test_wrong_scheme_is_invalid() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic dXNlcjpwYXNz"));

        let result = TokenLookup::default().find(&headers, &uri("/users/1"), "Bearer");
        assert!(matches!(result, Err(TokenError::TokenInvalid(_))));

        // a later source still wins over a malformed header
        let result = TokenLookup::default().find(&headers, &uri("/users/1?token=abc"), "Bearer");
        assert_eq!(result, Ok("abc".to_string()));
    }
}
