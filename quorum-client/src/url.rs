use crate::error::{ClientError, ClientResult};

pub const DEFAULT_PORT: u16 = 6379;

const SCHEME: &str = "redis://";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionInfo {
    pub host: String,
    pub port: u16,
    pub db: i64,
}

/// Parses `redis://host[:port][/db]` or a bare `host[:port]`.
///
/// Credentials and other schemes are rejected.
pub fn parse_url(url: &str) -> ClientResult<ConnectionInfo> {
    let invalid = || ClientError::InvalidUrl(url.to_string());

    let rest = match url.strip_prefix(SCHEME) {
        Some(rest) => rest,
        None if url.contains("://") => return Err(invalid()),
        None => url,
    };

    let rest = rest.split('?').next().unwrap_or_default();
    let (authority, path) = rest.split_once('/').unwrap_or((rest, ""));
    if authority.is_empty() || authority.contains('@') {
        return Err(invalid());
    }

    let (host, port) = match authority.strip_prefix('[') {
        Some(bracketed) => {
            let (host, tail) = bracketed.split_once(']').ok_or_else(invalid)?;
            match tail {
                "" => (host, DEFAULT_PORT),
                _ => {
                    let port = tail.strip_prefix(':').ok_or_else(invalid)?;
                    (host, port.parse::<u16>().map_err(|_| invalid())?)
                }
            }
        }
        None => match authority.rsplit_once(':') {
            Some((host, port)) => (host, port.parse::<u16>().map_err(|_| invalid())?),
            None => (authority, DEFAULT_PORT),
        },
    };

    if host.is_empty() || (host.contains(':') && !authority.starts_with('[')) {
        return Err(invalid());
    }

    let db = match path {
        "" => 0,
        db => db
            .parse::<i64>()
            .ok()
            .filter(|db| *db >= 0)
            .ok_or_else(invalid)?,
    };

    Ok(ConnectionInfo {
        host: host.to_string(),
        port,
        db,
    })
}
