//! # URL Fragment
//!
//! The fragment is the only persisted state: `#key=value&key=value`.
//! Recognized keys are `selected` (`type/id`) and `style` (travel mode).
//! Keys owned by others (the map engine writes `map=zoom/lat/lng`) are
//! carried through untouched.

use std::fmt;

use log::debug;
use url::form_urlencoded;

use crate::access::TravelMode;
use crate::osm::EntityRef;

pub const SELECTED_KEY: &str = "selected";
pub const STYLE_KEY: &str = "style";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fragment {
    params: Vec<(String, String)>,
}

impl Fragment {
    /// Parses `#a=1&b=2` (leading `#` optional) with form decoding:
    /// `%XX` escapes and `+` for space. Pairs without `=` get an empty
    /// value; empty segments are skipped.
    pub fn parse(text: &str) -> Self {
        let query = text.strip_prefix('#').unwrap_or(text);
        let params = form_urlencoded::parse(query.as_bytes())
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        Self { params }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Sets `key`, keeping its position if present; `None` removes it.
    pub fn set(&mut self, key: &str, value: Option<String>) {
        match value {
            Some(value) => match self.params.iter_mut().find(|(k, _)| k == key) {
                Some(entry) => entry.1 = value,
                None => self.params.push((key.to_string(), value)),
            },
            None => self.params.retain(|(k, _)| k != key),
        }
    }

    /// The `selected` entity. Anything but `node|way|relation/<integer>`
    /// is ignored.
    pub fn selected(&self) -> Option<EntityRef> {
        let value = self.get(SELECTED_KEY)?;
        match value.parse() {
            Ok(entity) => Some(entity),
            Err(e) => {
                debug!("Ignoring fragment selection: {}", e);
                None
            }
        }
    }

    /// The `style` travel mode. Unrecognized names are ignored.
    pub fn style(&self) -> Option<TravelMode> {
        let value = self.get(STYLE_KEY)?;
        match value.parse() {
            Ok(mode) => Some(mode),
            Err(e) => {
                debug!("Ignoring fragment style: {}", e);
                None
            }
        }
    }
}

impl fmt::Display for Fragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.params.is_empty() {
            return Ok(());
        }
        f.write_str("#")?;
        for (i, (k, v)) in self.params.iter().enumerate() {
            if i > 0 {
                f.write_str("&")?;
            }
            write!(f, "{}={}", escape(k), escape(v))?;
        }
        Ok(())
    }
}

/// Escapes only what would change meaning on the way back through
/// `parse`, so `selected=way/1` and `map=12/39.5/-111.5` stay readable.
fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '%' | '&' | '=' | '#' | '+' => out.push_str(&format!("%{:02X}", c as u32)),
            ' ' => out.push('+'),
            c if c.is_control() => {
                let mut buf = [0u8; 4];
                for b in c.encode_utf8(&mut buf).bytes() {
                    out.push_str(&format!("%{b:02X}"));
                }
            }
            c => out.push(c),
        }
    }
    out
}
