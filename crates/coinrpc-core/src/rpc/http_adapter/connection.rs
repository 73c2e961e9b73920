use std::path::Path;

use reqwest::Url;

use crate::error::CoreError;

/// A validated endpoint with any `user:pass@` user-info split off.
#[derive(Debug, PartialEq, Eq)]
pub(super) struct Endpoint {
    pub(super) url: Url,
    pub(super) userinfo: Option<(String, String)>,
}

/// Pick the credentials to send.
///
/// Precedence:
/// 1. explicit `user` + `pass`
/// 2. user-info embedded in the URL
/// 3. cookie file (`username:password`) from `cookie_file`
/// 4. no auth
pub(super) fn resolve_auth(
    user: Option<&str>,
    pass: Option<&str>,
    userinfo: Option<(String, String)>,
    cookie_file: Option<&Path>,
) -> Result<Option<(String, String)>, CoreError> {
    match (user, pass) {
        (Some(u), Some(p)) => return Ok(Some((u.to_owned(), p.to_owned()))),
        (Some(_), None) | (None, Some(_)) => {
            return Err(CoreError::Config(
                "both rpc user and rpc pass must be set together".to_owned(),
            ));
        }
        (None, None) => {}
    }

    if userinfo.is_some() {
        return Ok(userinfo);
    }

    let Some(cookie_file) = cookie_file else {
        return Ok(None);
    };

    let content = std::fs::read_to_string(cookie_file).map_err(|e| {
        CoreError::Config(format!(
            "failed to read rpc cookie file {}: {e}",
            cookie_file.display()
        ))
    })?;
    let line = content
        .lines()
        .next()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .ok_or_else(|| {
            CoreError::Config(format!(
                "rpc cookie file {} is empty",
                cookie_file.display()
            ))
        })?;

    let (cookie_user, cookie_pass) = line.split_once(':').ok_or_else(|| {
        CoreError::Config(format!(
            "rpc cookie file {} must contain `username:password`",
            cookie_file.display()
        ))
    })?;
    if cookie_user.is_empty() || cookie_pass.is_empty() {
        return Err(CoreError::Config(format!(
            "rpc cookie file {} must contain non-empty `username:password`",
            cookie_file.display()
        )));
    }

    Ok(Some((cookie_user.to_owned(), cookie_pass.to_owned())))
}

pub(super) fn parse_connection(connection: &str) -> Result<Endpoint, CoreError> {
    let mut url = Url::parse(connection).map_err(|e| {
        CoreError::Config(format!(
            "invalid connection `{connection}`: expected HTTP(S) URL ({e})"
        ))
    })?;
    match url.scheme() {
        "http" | "https" => {}
        other => {
            return Err(CoreError::Config(format!(
                "unsupported connection scheme `{other}`; expected http or https"
            )))
        }
    }

    let userinfo = match (url.username(), url.password()) {
        ("", None) => None,
        (user, pass) => Some((user.to_owned(), pass.unwrap_or_default().to_owned())),
    };
    if userinfo.is_some() {
        // Both setters only fail for cannot-be-a-base URLs, which http(s) never are.
        let _ = url.set_username("");
        let _ = url.set_password(None);
    }

    Ok(Endpoint { url, userinfo })
}
