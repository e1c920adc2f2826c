//! Client-side orchestration of a painting session
//!
//! [`Studio`] holds everything the user has chosen or received so far and
//! decides which actions are currently available. It talks to the painting
//! routes through a [`PaintingApi`], either over HTTP ([`StudioClient`]) or
//! in-process (the [`App`](crate::app::App) itself).

pub mod client;
pub mod mock;

pub use client::StudioClient;
pub use mock::MockPaintingApi;

use crate::app::App;
use crate::models::{ImageRequest, PaintingParameters, Theme};
use crate::{Error, Result};
use async_trait::async_trait;
use tracing::{debug, error};

pub const RESET_PROMPT: &str =
    "Are you sure you want to reset everything? This will clear all selections and generated content.";

#[async_trait]
pub trait PaintingApi: Send + Sync {
    async fn describe(&self, theme: Theme) -> Result<String>;
    async fn paint(&self, request: &ImageRequest) -> Result<String>;
}

#[async_trait]
impl PaintingApi for App {
    async fn describe(&self, theme: Theme) -> Result<String> {
        App::describe(self, theme.as_str()).await
    }

    async fn paint(&self, request: &ImageRequest) -> Result<String> {
        App::paint(self, request).await
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    ThemeSelected,
    DescriptionLoading,
    DescriptionReady,
    PaintingLoading,
    PaintingReady,
}

/// Handle for one in-flight fetch. A reset invalidates every ticket issued
/// before it, so a late reply cannot leak into the new session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    session: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Studio {
    theme: Option<Theme>,
    description: String,
    image_url: Option<String>,
    params: PaintingParameters,
    describing: bool,
    painting: bool,
    error: Option<String>,
    session: u64,
}

impl Studio {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> Phase {
        if self.painting {
            Phase::PaintingLoading
        } else if self.describing {
            Phase::DescriptionLoading
        } else if self.image_url.is_some() {
            Phase::PaintingReady
        } else if !self.description.is_empty() {
            Phase::DescriptionReady
        } else if self.theme.is_some() {
            Phase::ThemeSelected
        } else {
            Phase::Idle
        }
    }

    pub fn theme(&self) -> Option<Theme> {
        self.theme
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn image_url(&self) -> Option<&str> {
        self.image_url.as_deref()
    }

    pub fn params(&self) -> PaintingParameters {
        self.params
    }

    /// Last failure shown to the user, cleared by the next success or a reset.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn select_theme(&mut self, theme: Option<Theme>) {
        self.theme = theme;
    }

    pub fn set_params(&mut self, params: PaintingParameters) {
        self.params = params;
    }

    /// Replace the description text; allowed at any time except while a
    /// description is being generated.
    pub fn edit_description(&mut self, text: impl Into<String>) -> bool {
        if self.describing {
            return false;
        }
        self.description = text.into();
        true
    }

    pub fn can_generate_description(&self) -> bool {
        self.theme.is_some() && !self.describing
    }

    pub fn can_generate_painting(&self) -> bool {
        !self.description.trim().is_empty() && !self.painting
    }

    fn ticket(&self) -> FetchTicket {
        FetchTicket {
            session: self.session,
        }
    }

    fn is_stale(&self, ticket: FetchTicket, what: &str) -> bool {
        if ticket.session == self.session {
            return false;
        }
        debug!("Dropping {} reply from before the last reset", what);
        true
    }

    /// Mark a description fetch as in flight and return the theme to send.
    pub fn begin_description(&mut self) -> Result<(FetchTicket, Theme)> {
        match self.theme {
            Some(theme) if !self.describing => {
                self.describing = true;
                Ok((self.ticket(), theme))
            }
            Some(_) => Err(Error::InvalidInput(
                "a description is already being generated".to_string(),
            )),
            None => Err(Error::InvalidInput("select a theme first".to_string())),
        }
    }

    /// Apply a description reply. Replies to tickets issued before the last
    /// reset are dropped.
    pub fn finish_description(
        &mut self,
        ticket: FetchTicket,
        result: Result<String>,
    ) -> Result<()> {
        if self.is_stale(ticket, "description") {
            return Ok(());
        }
        self.describing = false;
        match result {
            Ok(description) => {
                self.description = description;
                self.error = None;
                Ok(())
            }
            Err(e) => {
                error!("Error generating description: {}", e);
                self.error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Mark an image fetch as in flight and return the request to send,
    /// carrying the current (possibly edited) description.
    pub fn begin_painting(&mut self) -> Result<(FetchTicket, ImageRequest)> {
        if self.description.trim().is_empty() {
            return Err(Error::InvalidInput("the description is empty".to_string()));
        }
        if self.painting {
            return Err(Error::InvalidInput(
                "a painting is already being generated".to_string(),
            ));
        }
        self.painting = true;
        Ok((
            self.ticket(),
            ImageRequest::new(self.description.clone(), self.params),
        ))
    }

    /// Apply an image reply. Replies to tickets issued before the last reset
    /// are dropped.
    pub fn finish_painting(
        &mut self,
        ticket: FetchTicket,
        result: Result<String>,
    ) -> Result<()> {
        if self.is_stale(ticket, "painting") {
            return Ok(());
        }
        self.painting = false;
        match result {
            Ok(url) => {
                self.image_url = Some(url);
                self.error = None;
                Ok(())
            }
            Err(e) => {
                error!("Error generating painting: {}", e);
                self.error = Some(e.to_string());
                Err(e)
            }
        }
    }

    pub async fn generate_description(&mut self, api: &dyn PaintingApi) -> Result<()> {
        let (ticket, theme) = self.begin_description()?;
        let result = api.describe(theme).await;
        self.finish_description(ticket, result)
    }

    pub async fn generate_painting(&mut self, api: &dyn PaintingApi) -> Result<()> {
        let (ticket, request) = self.begin_painting()?;
        let result = api.paint(&request).await;
        self.finish_painting(ticket, result)
    }

    /// Return to the initial state if `confirm` accepts [`RESET_PROMPT`].
    ///
    /// Fetches still in flight are abandoned; their replies are ignored.
    pub fn reset<F>(&mut self, confirm: F) -> bool
    where
        F: FnOnce(&str) -> bool,
    {
        if !confirm(RESET_PROMPT) {
            return false;
        }
        self.theme = None;
        self.description.clear();
        self.image_url = None;
        self.params = PaintingParameters::default();
        self.error = None;
        self.describing = false;
        self.painting = false;
        self.session = self.session.wrapping_add(1);
        true
    }
}
