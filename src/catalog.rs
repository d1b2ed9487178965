// Catalog records: categories, destinations and packages
// Read-only from this crate's side; rows are maintained in the hosted store.

use crate::config::ImageProxyConfig;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::fmt;

/// Decorative symbol kinds for categories. Unknown names fall back to `Mountain`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CategoryIcon {
    Utensils,
    Bed,
    #[default]
    Mountain,
    Heart,
}

impl CategoryIcon {
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "utensils" => CategoryIcon::Utensils,
            "bed" => CategoryIcon::Bed,
            "heart" => CategoryIcon::Heart,
            _ => CategoryIcon::Mountain,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            CategoryIcon::Utensils => "utensils",
            CategoryIcon::Bed => "bed",
            CategoryIcon::Mountain => "mountain",
            CategoryIcon::Heart => "heart",
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            CategoryIcon::Utensils => "🍴",
            CategoryIcon::Bed => "🛏",
            CategoryIcon::Mountain => "⛰",
            CategoryIcon::Heart => "❤",
        }
    }
}

impl<'de> Deserialize<'de> for CategoryIcon {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = Option::<String>::deserialize(deserializer)?;
        Ok(name.as_deref().map(CategoryIcon::from_name).unwrap_or_default())
    }
}

impl Serialize for CategoryIcon {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl fmt::Display for CategoryIcon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Ordered image URLs, normalized once from whatever shape the row stored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageList(Vec<String>);

impl ImageList {
    pub fn new(urls: Vec<String>) -> Self {
        Self(urls)
    }

    /// Accepts null, a bare URL, a JSON-encoded array string, an array of
    /// strings, or an array of records carrying `url` or `src`.
    ///
    /// Array entries are kept up to the first one without a usable URL, so
    /// the leading image is always the row's first entry or nothing.
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Array(items) => Self(items.iter().map_while(image_url_of).collect()),
            Value::String(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    return Self::default();
                }
                if trimmed.starts_with('[') {
                    if let Ok(inner @ Value::Array(_)) = serde_json::from_str::<Value>(trimmed) {
                        return Self::from_value(&inner);
                    }
                }
                Self(vec![trimmed.to_string()])
            }
            Value::Object(_) => Self(image_url_of(value).into_iter().collect()),
            _ => Self::default(),
        }
    }

    pub fn urls(&self) -> &[String] {
        &self.0
    }

    pub fn first(&self) -> Option<&str> {
        self.0.first().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Display URL for the first image: placeholder when empty, proxied
    /// when hosted on the storage host.
    pub fn first_url(&self, proxy: &ImageProxyConfig, width: u32) -> String {
        match self.first() {
            Some(url) => proxied_url(url, proxy, width),
            None => proxy.placeholder.clone(),
        }
    }
}

fn image_url_of(item: &Value) -> Option<String> {
    match item {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Object(fields) => ["url", "src"]
            .iter()
            .filter_map(|key| fields.get(*key).and_then(Value::as_str))
            .map(str::trim)
            .find(|s| !s.is_empty())
            .map(str::to_string),
        _ => None,
    }
}

impl<'de> Deserialize<'de> for ImageList {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(ImageList::from_value(&value))
    }
}

impl Serialize for ImageList {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

/// Rewrites `url` through the resizing proxy when it points at the storage host.
pub fn proxied_url(url: &str, proxy: &ImageProxyConfig, width: u32) -> String {
    if !url.contains(&proxy.storage_host_marker) {
        return url.to_string();
    }

    format!(
        "{}?url={}&w={}&output={}&q={}",
        proxy.proxy_base.trim_end_matches('?'),
        urlencoding::encode(url),
        width,
        urlencoding::encode(&proxy.output_format),
        proxy.quality
    )
}

/// First display image for a raw, not-yet-normalized images field.
pub fn first_image(images: &Value, proxy: &ImageProxyConfig, width: u32) -> String {
    ImageList::from_value(images).first_url(proxy, width)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub slug: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default)]
    pub icon: CategoryIcon,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Destination {
    pub id: String,
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub location: String,
    #[serde(default)]
    pub price_range: Option<String>,
    #[serde(default)]
    pub images: ImageList,
    #[serde(default, deserialize_with = "labels")]
    pub features: Vec<String>,
    pub category_id: Option<String>,
    #[serde(default, deserialize_with = "number_or_zero")]
    pub rating: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_featured: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Package {
    pub id: String,
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub duration_days: u32,
    #[serde(default, deserialize_with = "number_or_zero")]
    pub price: f64,
    #[serde(default, deserialize_with = "labels")]
    pub destinations: Vec<String>,
    #[serde(default, deserialize_with = "labels")]
    pub inclusions: Vec<String>,
    #[serde(default, deserialize_with = "labels")]
    pub exclusions: Vec<String>,
    #[serde(default)]
    pub images: ImageList,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_featured: bool,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub difficulty: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Package {
    pub fn total_for(&self, travellers: u8) -> f64 {
        self.price * f64::from(travellers)
    }
}

// Null reads the same as a missing column.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// Null and missing arrays read as empty; non-string entries are skipped.
fn labels<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Array(items)) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    })
}

fn number_or_zero<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    })
}
