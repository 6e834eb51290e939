//! Frame state machine: per-state view construction and button transitions.
//!
//! Frames are stateless, so each inbound click rebuilds the matching view
//! from scratch. The flow is Home -> Check -> Result, with error views
//! branching back in. No view is terminal: every one keeps a button whose
//! route chain leads back to Home.

use thiserror::Error;

use crate::airstack::{Identity, QueryError, UserInfo};
use crate::theme::{Background, Theme};

/// Frame routes a button can post to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Home,
    Check,
    Result,
}

impl Route {
    pub fn path(self) -> &'static str {
        match self {
            Route::Home => "/",
            Route::Check => "/check",
            Route::Result => "/result",
        }
    }
}

/// Errors surfaced to the user as error frames.
#[derive(Debug, Error)]
pub enum FrameError {
    #[error("Unable to retrieve your Farcaster ID. Please ensure you have a valid Farcaster profile.")]
    IdentityUnavailable,

    #[error("Unable to fetch balance: {0}")]
    QueryFailed(#[from] QueryError),
}

impl FrameError {
    /// Where the Retry button of the error frame points. A fresh click is a
    /// fresh independent request; nothing is resumed.
    fn retry_route(&self) -> Route {
        match self {
            FrameError::IdentityUnavailable => Route::Check,
            FrameError::QueryFailed(_) => Route::Result,
        }
    }
}

/// A labeled action rendered as a frame button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Button {
    pub label: String,
    pub target: Route,
}

impl Button {
    fn new(label: &str, target: Route) -> Self {
        Self {
            label: label.to_string(),
            target,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextStyle {
    Title,
    Body,
    Highlight,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextLine {
    pub text: String,
    pub style: TextStyle,
}

impl TextLine {
    fn title(text: String) -> Self {
        Self {
            text,
            style: TextStyle::Title,
        }
    }

    fn body(text: String) -> Self {
        Self {
            text,
            style: TextStyle::Body,
        }
    }

    fn highlight(text: String) -> Self {
        Self {
            text,
            style: TextStyle::Highlight,
        }
    }

    fn error(text: String) -> Self {
        Self {
            text,
            style: TextStyle::Error,
        }
    }
}

/// Renderable description of one frame. Built fresh per response and
/// immutable once returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct View {
    pub background: Background,
    pub avatar: Option<String>,
    pub lines: Vec<TextLine>,
    pub buttons: Vec<Button>,
}

impl View {
    fn new(theme: &Theme) -> Self {
        Self {
            background: theme.background.clone(),
            avatar: None,
            lines: Vec::new(),
            buttons: Vec::new(),
        }
    }

    /// True when any button posts to the given route.
    pub fn has_button_to(&self, route: Route) -> bool {
        self.buttons.iter().any(|b| b.target == route)
    }
}

/// Initial frame: title, instructions, one button into the flow.
pub fn home_view(theme: &Theme) -> View {
    let mut view = View::new(theme);
    view.lines.push(TextLine::title(theme.title.clone()));
    view.lines.push(TextLine::body(format!(
        "Click to check your {} balance",
        theme.token_symbol
    )));
    view.buttons.push(Button::new("Check Balance", Route::Check));
    view
}

/// Echo frame: shows whose balance will be looked up. Never queries.
pub fn check_view(theme: &Theme, identity: &Identity) -> View {
    let mut view = View::new(theme);
    view.lines.push(TextLine::title(theme.title.clone()));
    view.lines.push(TextLine::body(format!(
        "Checking {} balance for {}",
        theme.token_symbol,
        identity.label()
    )));
    view.buttons.push(Button::new("Back", Route::Home));
    view.buttons.push(Button::new("Show Balance", Route::Result));
    view
}

/// Successful lookup. Callers have already ruled out the no-profile case.
pub fn result_view(theme: &Theme, info: &UserInfo) -> View {
    let mut view = View::new(theme);
    view.avatar = info.profile_image.clone();
    view.lines
        .push(TextLine::title(format!("{} Balance", theme.token_symbol)));
    if let Some(name) = &info.profile_name {
        view.lines.push(TextLine::body(format!("Profile: {name}")));
    }
    view.lines.push(TextLine::highlight(format!(
        "Balance: {} {}",
        info.balance, theme.token_symbol
    )));
    view.buttons.push(Button::new("Back", Route::Home));
    view.buttons.push(Button::new("Refresh", Route::Result));
    view
}

/// Lookup succeeded but returned no social profile.
pub fn no_profile_view(theme: &Theme) -> View {
    error_frame(
        theme,
        "No Farcaster profile found for this account.",
        Route::Result,
    )
}

/// Error frame for either error kind, with a retry back into the flow.
pub fn error_view(theme: &Theme, error: &FrameError) -> View {
    error_frame(theme, &error.to_string(), error.retry_route())
}

fn error_frame(theme: &Theme, message: &str, retry: Route) -> View {
    let mut view = View::new(theme);
    view.lines.push(TextLine::error("Error".to_string()));
    view.lines.push(TextLine::body(message.to_string()));
    view.buttons.push(Button::new("Back", Route::Home));
    view.buttons.push(Button::new("Retry", retry));
    view
}
