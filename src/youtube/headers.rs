use std::path::Path;

use chrono::Utc;
use reqwest::header::{
    ACCEPT, AUTHORIZATION, CONTENT_TYPE, COOKIE, HeaderMap, HeaderName, HeaderValue,
};
use serde::{Deserialize, Serialize};
use sha1::{Digest, Sha1};

use crate::management::YtMusicSettings;

use super::PlaylistError;

pub const YTMUSIC_ORIGIN: &str = "https://music.youtube.com";

/// Cookies holding the key for the `SAPISIDHASH` authorization, preferred
/// first.
const SAPISID_COOKIES: [&str; 2] = ["SAPISID", "__Secure-3PAPISID"];

/// Value of the `SAPISID` cookie (or its `__Secure-3PAPISID` twin) in a
/// `Cookie` header.
pub fn sapisid(cookie: &str) -> Option<&str> {
    let pairs: Vec<(&str, &str)> = cookie
        .split(';')
        .filter_map(|pair| pair.split_once('='))
        .map(|(name, value)| (name.trim(), value.trim()))
        .collect();

    SAPISID_COOKIES.iter().find_map(|wanted| {
        pairs
            .iter()
            .find(|(name, value)| name == wanted && !value.is_empty())
            .map(|(_, value)| *value)
    })
}

/// `SAPISIDHASH <ts>_<sha1("<ts> <sapisid> <origin>")>`, the authorization
/// a logged-in browser sends at `timestamp`.
pub fn sapisid_hash(sapisid: &str, origin: &str, timestamp: i64) -> String {
    let digest = Sha1::digest(format!("{} {} {}", timestamp, sapisid, origin).as_bytes());
    format!("SAPISIDHASH {}_{:x}", timestamp, digest)
}

/// Request headers of a logged-in YouTube Music browser session.
///
/// Serialized with the exact header names, in the order the browser sends
/// them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthHeaders {
    #[serde(rename = "Accept")]
    pub accept: String,
    #[serde(rename = "Authorization")]
    pub authorization: String,
    #[serde(rename = "Content-Type")]
    pub content_type: String,
    #[serde(rename = "X-Goog-AuthUser")]
    pub auth_user: String,
    #[serde(rename = "x-origin")]
    pub origin: String,
    #[serde(rename = "Cookie")]
    pub cookie: String,
}

impl AuthHeaders {
    pub fn from_settings(settings: &YtMusicSettings) -> Self {
        AuthHeaders {
            accept: "*/*".to_string(),
            authorization: settings.authorization.clone(),
            content_type: "application/json".to_string(),
            auth_user: "0".to_string(),
            origin: YTMUSIC_ORIGIN.to_string(),
            cookie: settings.cookie.clone(),
        }
    }

    pub async fn persist(&self, path: &Path) -> Result<(), PlaylistError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                async_fs::create_dir_all(parent).await?;
            }
        }

        let json = serde_json::to_string_pretty(self)?;
        async_fs::write(path, json).await?;
        Ok(())
    }

    pub async fn load(path: &Path) -> Result<Self, PlaylistError> {
        let content = async_fs::read_to_string(path).await?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Authorization valid at `timestamp`.
    ///
    /// A pasted hash expires, so it is recomputed from the cookie's
    /// `SAPISID`. The stored value is only used when the cookie has none.
    pub fn authorization_at(&self, timestamp: i64) -> String {
        match sapisid(&self.cookie) {
            Some(key) => sapisid_hash(key, &self.origin, timestamp),
            None => self.authorization.clone(),
        }
    }

    /// Converts to request headers with a fresh authorization. Fails if a
    /// pasted value contains characters that are not allowed in an HTTP
    /// header.
    pub fn to_header_map(&self) -> Result<HeaderMap, PlaylistError> {
        self.header_map_at(Utc::now().timestamp())
    }

    pub fn header_map_at(&self, timestamp: i64) -> Result<HeaderMap, PlaylistError> {
        let authorization = self.authorization_at(timestamp);
        let entries = [
            (ACCEPT, &self.accept),
            (AUTHORIZATION, &authorization),
            (CONTENT_TYPE, &self.content_type),
            (HeaderName::from_static("x-goog-authuser"), &self.auth_user),
            (HeaderName::from_static("x-origin"), &self.origin),
            (COOKIE, &self.cookie),
        ];

        let mut map = HeaderMap::new();
        for (name, value) in entries {
            let value = HeaderValue::from_str(value)
                .map_err(|_| PlaylistError::InvalidHeader(name.to_string()))?;
            map.insert(name, value);
        }
        Ok(map)
    }
}
