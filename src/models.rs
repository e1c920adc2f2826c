//! Data models and structures
//!
//! Defines the painting themes and rendering parameters, the JSON bodies of
//! the studio HTTP routes, and the environment-driven configuration.

use crate::ai::openai::client::DEFAULT_BASE_URL;
use crate::poll::PollPolicy;
use crate::{Error, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::SocketAddr;
use std::time::Duration;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ValueEnum)]
pub enum Theme {
    Nature,
    Urban,
    Abstract,
    Historical,
    Surreal,
    Futurism,
    Landscape,
}

impl Theme {
    pub const ALL: [Theme; 7] = [
        Theme::Nature,
        Theme::Urban,
        Theme::Abstract,
        Theme::Historical,
        Theme::Surreal,
        Theme::Futurism,
        Theme::Landscape,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Nature => "Nature",
            Theme::Urban => "Urban",
            Theme::Abstract => "Abstract",
            Theme::Historical => "Historical",
            Theme::Surreal => "Surreal",
            Theme::Futurism => "Futurism",
            Theme::Landscape => "Landscape",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, ValueEnum)]
pub enum ImageSize {
    #[serde(rename = "256x256")]
    #[value(name = "256x256")]
    Small,
    #[serde(rename = "512x512")]
    #[value(name = "512x512")]
    Medium,
    #[default]
    #[serde(rename = "1024x1024")]
    #[value(name = "1024x1024")]
    Large,
}

impl ImageSize {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageSize::Small => "256x256",
            ImageSize::Medium => "512x512",
            ImageSize::Large => "1024x1024",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ImageQuality {
    #[default]
    Standard,
    Hd,
}

impl ImageQuality {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageQuality::Standard => "standard",
            ImageQuality::Hd => "hd",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ImageStyle {
    #[default]
    Vivid,
    Natural,
}

impl ImageStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageStyle::Vivid => "vivid",
            ImageStyle::Natural => "natural",
        }
    }
}

/// Rendering parameters chosen in the studio and sent with every image request.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PaintingParameters {
    pub size: ImageSize,
    pub quality: ImageQuality,
    pub style: ImageStyle,
}

// Studio route bodies

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssistantResponse {
    pub assistant_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DescriptionRequest {
    pub theme: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DescriptionResponse {
    pub description: String,
}

/// Image route body. Parameter values are forwarded to the provider as-is.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ImageRequest {
    pub description: String,
    pub size: String,
    pub quality: String,
    pub style: String,
}

impl ImageRequest {
    pub fn new(description: String, params: PaintingParameters) -> Self {
        Self {
            description,
            size: params.size.as_str().to_string(),
            quality: params.quality.as_str().to_string(),
            style: params.style.as_str().to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageResponse {
    pub image_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

// Configuration

const DEFAULT_ASSISTANT_MODEL: &str = "gpt-4-1106-preview";
const DEFAULT_IMAGE_MODEL: &str = "dall-e-2";
const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";

#[derive(Debug, Clone)]
pub struct Config {
    pub openai_api_key: Option<String>,
    pub assistant_id: Option<String>,
    pub openai_base_url: String,
    pub assistant_model: String,
    pub image_model: String,
    pub bind_addr: SocketAddr,
    pub poll: PollPolicy,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let bind_addr = var("BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse::<SocketAddr>()
            .map_err(|e| Error::Config(format!("BIND_ADDR is not a socket address: {}", e)))?;

        let defaults = PollPolicy::default();
        let poll = PollPolicy {
            interval: parse_var(&var, "RUN_POLL_INTERVAL_MS")?
                .map(Duration::from_millis)
                .unwrap_or(defaults.interval),
            backoff: parse_var(&var, "RUN_POLL_BACKOFF")?.unwrap_or(defaults.backoff),
            max_interval: parse_var(&var, "RUN_POLL_MAX_INTERVAL_MS")?
                .map(Duration::from_millis)
                .unwrap_or(defaults.max_interval),
            deadline: parse_var(&var, "RUN_DEADLINE_SECS")?
                .map(Duration::from_secs)
                .unwrap_or(defaults.deadline),
        };
        if poll.interval.is_zero() {
            return Err(Error::Config(
                "RUN_POLL_INTERVAL_MS must be greater than 0".to_string(),
            ));
        }
        if poll.backoff == 0 {
            return Err(Error::Config("RUN_POLL_BACKOFF must be at least 1".to_string()));
        }

        Ok(Self {
            openai_api_key: var("OPENAI_API_KEY"),
            assistant_id: var("ASSISTANT_ID"),
            openai_base_url: var("OPENAI_BASE_URL")
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            assistant_model: var("ASSISTANT_MODEL")
                .unwrap_or_else(|| DEFAULT_ASSISTANT_MODEL.to_string()),
            image_model: var("IMAGE_MODEL").unwrap_or_else(|| DEFAULT_IMAGE_MODEL.to_string()),
            bind_addr,
            poll,
        })
    }
}

fn parse_var<T, F>(var: &F, key: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    var(key)
        .map(|raw| {
            raw.trim()
                .parse::<T>()
                .map_err(|e| Error::Config(format!("{} has invalid value '{}': {}", key, raw, e)))
        })
        .transpose()
}
