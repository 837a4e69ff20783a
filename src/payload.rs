//! Push request payload construction
//!
//! Everything needed to turn a title, a message and a bag of string
//! parameters into the JSON document the relay expects. Nothing in here
//! touches the network.

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::value::RawValue;
use std::borrow::Cow;
use std::collections::BTreeMap;

use crate::errors::AppResult;

/// Relay used when no server is configured
pub const DEFAULT_SERVER_URL: &str = "https://api.day.app/";

/// Path segment appended to the server base URL
pub const PUSH_PATH: &str = "push";

pub const PARAM_URL: &str = "url";
pub const PARAM_SOUND: &str = "sound";
pub const PARAM_GROUP: &str = "group";
pub const PARAM_LEVEL: &str = "level";
pub const PARAM_ICON: &str = "icon";
pub const PARAM_ARCHIVE: &str = "archive";
pub const PARAM_AUTO_COPY: &str = "autoCopy";
pub const PARAM_CALL: &str = "call";

/// Extra push parameters, name -> raw string value
///
/// Sorted by key so the encoded body is stable between runs.
pub type PushParams = BTreeMap<String, String>;

/// Parameters of a call-style push: ring repeatedly and keep it in history
pub fn call_params() -> PushParams {
    PushParams::from([
        (PARAM_CALL.to_string(), "1".to_string()),
        (PARAM_ARCHIVE.to_string(), "1".to_string()),
    ])
}

/// Prefix `https://` unless the URL already carries an http(s) scheme
///
/// Empty input is returned unchanged.
pub fn normalize_url(url: &str) -> String {
    if url.is_empty() || url.starts_with("http://") || url.starts_with("https://") {
        url.to_string()
    } else {
        format!("https://{url}")
    }
}

/// Build the push endpoint from a server base URL
pub fn push_endpoint(server_url: &str) -> String {
    if server_url.ends_with('/') {
        format!("{server_url}{PUSH_PATH}")
    } else {
        format!("{server_url}/{PUSH_PATH}")
    }
}

/// Check `[+-]? digits ('.' digits)? ([eE] [+-]? digits)?`
///
/// A match is not always emitted as a number: values such as `+5` or `007`
/// are not valid JSON numbers and go out as strings instead.
pub fn is_numeric_literal(value: &str) -> bool {
    let bytes = value.as_bytes();
    let mut pos = 0;

    let skip_sign = |pos: &mut usize| {
        if matches!(bytes.get(*pos), Some(b'+') | Some(b'-')) {
            *pos += 1;
        }
    };
    let skip_digits = |pos: &mut usize| -> bool {
        let start = *pos;
        while bytes.get(*pos).is_some_and(u8::is_ascii_digit) {
            *pos += 1;
        }
        *pos > start
    };

    skip_sign(&mut pos);
    if !skip_digits(&mut pos) {
        return false;
    }
    if bytes.get(pos) == Some(&b'.') {
        pos += 1;
        if !skip_digits(&mut pos) {
            return false;
        }
    }
    if matches!(bytes.get(pos), Some(b'e') | Some(b'E')) {
        pos += 1;
        skip_sign(&mut pos);
        if !skip_digits(&mut pos) {
            return false;
        }
    }
    pos == bytes.len()
}

/// How a single parameter value lands in the JSON body
#[derive(Debug)]
enum ParamValue<'a> {
    Bool(bool),
    Number(Box<RawValue>),
    Text(Cow<'a, str>),
}

impl<'a> ParamValue<'a> {
    fn classify(key: &str, value: &'a str) -> Self {
        if key == PARAM_URL {
            return Self::Text(Cow::Owned(normalize_url(value)));
        }
        match value {
            "true" => Self::Bool(true),
            "false" => Self::Bool(false),
            _ if is_numeric_literal(value) => {
                // A leading '+' or leading zeros pass the grammar but are not JSON
                match RawValue::from_string(value.to_string()) {
                    Ok(raw) => Self::Number(raw),
                    Err(_) => Self::Text(Cow::Borrowed(value)),
                }
            }
            _ => Self::Text(Cow::Borrowed(value)),
        }
    }
}

impl Serialize for ParamValue<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Bool(flag) => serializer.serialize_bool(*flag),
            Self::Number(raw) => raw.serialize(serializer),
            Self::Text(text) => serializer.serialize_str(text),
        }
    }
}

/// JSON body of a push request
///
/// Field order is fixed: `device_keys`, `title`, `body`, then the extra
/// parameters. `device_keys` is always an array, even for one device.
#[derive(Debug, Clone, Copy)]
pub struct PushBody<'a> {
    pub device_keys: &'a [String],
    pub title: &'a str,
    pub body: &'a str,
    pub params: &'a PushParams,
}

impl Serialize for PushBody<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(3 + self.params.len()))?;
        map.serialize_entry("device_keys", self.device_keys)?;
        map.serialize_entry("title", self.title)?;
        map.serialize_entry("body", self.body)?;
        for (key, value) in self.params {
            map.serialize_entry(key, &ParamValue::classify(key, value))?;
        }
        map.end()
    }
}

impl PushBody<'_> {
    /// Encode to a compact JSON string
    pub fn to_json(&self) -> AppResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Optional fields of an advanced push
///
/// Empty strings count as unset. `archive` and `auto_copy` are always sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushOptions {
    pub url: Option<String>,
    pub sound: Option<String>,
    pub group: Option<String>,
    pub level: Option<String>,
    pub icon: Option<String>,
    pub archive: String,
    pub auto_copy: String,
}

impl Default for PushOptions {
    fn default() -> Self {
        Self {
            url: None,
            sound: None,
            group: None,
            level: None,
            icon: None,
            archive: "1".to_string(),
            auto_copy: "0".to_string(),
        }
    }
}

impl PushOptions {
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn with_sound(mut self, sound: impl Into<String>) -> Self {
        self.sound = Some(sound.into());
        self
    }

    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.level = Some(level.into());
        self
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn with_archive(mut self, archive: impl Into<String>) -> Self {
        self.archive = archive.into();
        self
    }

    pub fn with_auto_copy(mut self, auto_copy: impl Into<String>) -> Self {
        self.auto_copy = auto_copy.into();
        self
    }

    /// Flatten into the parameter mapping sent with the push
    pub fn to_params(&self) -> PushParams {
        let mut params = PushParams::new();

        let optional = [
            (PARAM_URL, &self.url),
            (PARAM_SOUND, &self.sound),
            (PARAM_GROUP, &self.group),
            (PARAM_LEVEL, &self.level),
            (PARAM_ICON, &self.icon),
        ];
        for (key, value) in optional {
            if let Some(value) = value.as_deref().filter(|v| !v.is_empty()) {
                let value = if key == PARAM_URL {
                    normalize_url(value)
                } else {
                    value.to_string()
                };
                params.insert(key.to_string(), value);
            }
        }

        params.insert(PARAM_ARCHIVE.to_string(), self.archive.clone());
        params.insert(PARAM_AUTO_COPY.to_string(), self.auto_copy.clone());
        params
    }
}
