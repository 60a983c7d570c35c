//! Share-link composition for safety check-ins and general messages.
//!
//! Facebook and X/Twitter get pre-filled web intent URLs. TikTok has no
//! web share intent, so its message is copied to the clipboard instead.

use std::time::Duration;

use guardian_crime_models::Coordinate;
use guardian_fetch::{FetchError, build_url};
use strum_macros::{AsRefStr, Display, EnumString};
use thiserror::Error;

/// Message posted by a safety check-in.
pub const CHECK_IN_MESSAGE: &str =
    "\u{1f6e1}\u{fe0f} Safety Check-in: I'm safe and using Guardian app to stay protected! #StaySafe #Guardian";

/// Delay before the second post of a [`CheckInTarget::Both`] check-in.
pub const BOTH_PLATFORMS_STAGGER: Duration = Duration::from_secs(1);

/// Link shared alongside Facebook posts when `GUARDIAN_APP_URL` is unset.
pub const DEFAULT_APP_URL: &str = "https://github.com/BSteffaniak/guardian";

/// Environment variable holding the link shared with Facebook posts.
pub const APP_URL_ENV_VAR: &str = "GUARDIAN_APP_URL";

/// Shown after a message has been copied for TikTok.
pub const TIKTOK_CLIPBOARD_NOTICE: &str =
    "Message copied to clipboard! You can now paste it in TikTok.";

const FACEBOOK_SHARER_URL: &str = "https://www.facebook.com/sharer/sharer.php";
const TWITTER_INTENT_URL: &str = "https://twitter.com/intent/tweet";

/// Errors from share operations.
#[derive(Debug, Error)]
pub enum ShareError {
    /// The platform tag is not one this operation supports.
    #[error("Unsupported platform: {platform}")]
    UnsupportedSharePlatform {
        /// The tag that was passed in.
        platform: String,
    },

    /// A share URL could not be built.
    #[error("Could not build share link: {0}")]
    Url(#[from] FetchError),

    /// The host could not open or copy the share.
    #[error("Could not deliver share: {message}")]
    Delivery {
        /// Description of the failure.
        message: String,
    },
}

/// A social platform a message can be shared to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, AsRefStr)]
#[strum(ascii_case_insensitive)]
pub enum SharePlatform {
    /// Facebook sharer dialog.
    #[strum(serialize = "facebook")]
    Facebook,
    /// X (formerly Twitter) tweet intent.
    #[strum(serialize = "twitter", serialize = "x")]
    Twitter,
    /// TikTok, via the clipboard.
    #[strum(serialize = "tiktok")]
    TikTok,
}

impl SharePlatform {
    /// Display name.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Facebook => "Facebook",
            Self::Twitter => "X (Twitter)",
            Self::TikTok => "TikTok",
        }
    }
}

/// Where a safety check-in is posted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, AsRefStr)]
#[strum(ascii_case_insensitive)]
pub enum CheckInTarget {
    /// Facebook only.
    #[strum(serialize = "facebook")]
    Facebook,
    /// X/Twitter only.
    #[strum(serialize = "twitter", serialize = "x")]
    Twitter,
    /// Facebook, then X/Twitter a second later.
    #[strum(serialize = "both")]
    Both,
}

impl CheckInTarget {
    /// Every target, in menu order.
    pub const ALL: &[Self] = &[Self::Facebook, Self::Twitter, Self::Both];

    /// Parses a platform tag.
    ///
    /// # Errors
    ///
    /// Returns [`ShareError::UnsupportedSharePlatform`] for unknown tags
    /// (including `"tiktok"`, which cannot carry a check-in).
    pub fn parse(tag: &str) -> Result<Self, ShareError> {
        tag.trim()
            .parse()
            .map_err(|_| ShareError::UnsupportedSharePlatform {
                platform: tag.to_string(),
            })
    }

    /// Display name.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Facebook => "Facebook",
            Self::Twitter => "X",
            Self::Both => "Facebook and X",
        }
    }
}

/// Parses a general-share platform tag.
///
/// # Errors
///
/// Returns [`ShareError::UnsupportedSharePlatform`] for unknown tags.
pub fn parse_platform(tag: &str) -> Result<SharePlatform, ShareError> {
    tag.trim()
        .parse()
        .map_err(|_| ShareError::UnsupportedSharePlatform {
            platform: tag.to_string(),
        })
}

/// Link shared with Facebook posts: `GUARDIAN_APP_URL` or
/// [`DEFAULT_APP_URL`].
#[must_use]
pub fn app_url_from_env() -> String {
    std::env::var(APP_URL_ENV_VAR)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| DEFAULT_APP_URL.to_string())
}

/// One thing the host should do to complete a share.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShareAction {
    /// Open `url` (a browser popup in the web client).
    OpenUrl {
        /// Target platform.
        platform: SharePlatform,
        /// Pre-filled share URL.
        url: String,
    },
    /// Put `text` on the clipboard and show `notice`.
    CopyToClipboard {
        /// Target platform.
        platform: SharePlatform,
        /// Text to copy.
        text: String,
        /// Message for the user once copied.
        notice: &'static str,
    },
}

/// A share action and how long to wait before performing it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareStep {
    /// Wait before this step.
    pub delay: Duration,
    /// What to do.
    pub action: ShareAction,
}

/// Ordered share actions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SharePlan {
    /// Steps in execution order.
    pub steps: Vec<ShareStep>,
}

impl SharePlan {
    fn push(&mut self, delay: Duration, action: ShareAction) {
        self.steps.push(ShareStep { delay, action });
    }
}

/// Performs share actions on behalf of [`execute`].
pub trait ShareSink: Send + Sync {
    /// Opens a share URL.
    ///
    /// # Errors
    ///
    /// Returns [`ShareError::Delivery`] if the URL cannot be opened.
    fn open_url(&self, platform: SharePlatform, url: &str) -> Result<(), ShareError>;

    /// Copies `text` to the clipboard and tells the user `notice`.
    ///
    /// # Errors
    ///
    /// Returns [`ShareError::Delivery`] if the clipboard is unavailable.
    fn copy_to_clipboard(
        &self,
        platform: SharePlatform,
        text: &str,
        notice: &str,
    ) -> Result<(), ShareError>;
}

/// Facebook sharer URL for `message`, with the coordinate appended when
/// given.
///
/// # Errors
///
/// Returns [`ShareError::Url`] if the URL cannot be built.
pub fn facebook_url(
    app_url: &str,
    message: &str,
    at: Option<Coordinate>,
) -> Result<String, ShareError> {
    let mut quote = message.to_string();
    if let Some(at) = at {
        quote.push_str(&format!(" I'm currently at coordinates: {at}"));
    }
    Ok(build_url(
        FACEBOOK_SHARER_URL,
        &[],
        &[("u", app_url), ("quote", &quote)],
    )?)
}

/// Tweet intent URL for `message`, with the coordinate appended when
/// given.
///
/// # Errors
///
/// Returns [`ShareError::Url`] if the URL cannot be built.
pub fn twitter_url(message: &str, at: Option<Coordinate>) -> Result<String, ShareError> {
    let mut text = message.to_string();
    if let Some(at) = at {
        text.push_str(&format!(" \u{1f4cd} Current location: {at}"));
    }
    Ok(build_url(TWITTER_INTENT_URL, &[], &[("text", &text)])?)
}

/// Plan for a safety check-in at `at`, posted to `target`.
///
/// # Errors
///
/// Returns [`ShareError::Url`] if a share URL cannot be built.
pub fn plan_check_in(
    target: CheckInTarget,
    at: Coordinate,
    app_url: &str,
) -> Result<SharePlan, ShareError> {
    let mut plan = SharePlan::default();
    if matches!(target, CheckInTarget::Facebook | CheckInTarget::Both) {
        plan.push(
            Duration::ZERO,
            ShareAction::OpenUrl {
                platform: SharePlatform::Facebook,
                url: facebook_url(app_url, CHECK_IN_MESSAGE, Some(at))?,
            },
        );
    }
    if matches!(target, CheckInTarget::Twitter | CheckInTarget::Both) {
        let delay = if target == CheckInTarget::Both {
            BOTH_PLATFORMS_STAGGER
        } else {
            Duration::ZERO
        };
        plan.push(
            delay,
            ShareAction::OpenUrl {
                platform: SharePlatform::Twitter,
                url: twitter_url(CHECK_IN_MESSAGE, Some(at))?,
            },
        );
    }
    Ok(plan)
}

/// Plan for sharing an arbitrary `message` without a location.
///
/// # Errors
///
/// Returns [`ShareError::Url`] if a share URL cannot be built.
pub fn plan_message(
    platform: SharePlatform,
    message: &str,
    app_url: &str,
) -> Result<SharePlan, ShareError> {
    let action = match platform {
        SharePlatform::Facebook => ShareAction::OpenUrl {
            platform,
            url: facebook_url(app_url, message, None)?,
        },
        SharePlatform::Twitter => ShareAction::OpenUrl {
            platform,
            url: twitter_url(message, None)?,
        },
        SharePlatform::TikTok => ShareAction::CopyToClipboard {
            platform,
            text: message.to_string(),
            notice: TIKTOK_CLIPBOARD_NOTICE,
        },
    };
    let mut plan = SharePlan::default();
    plan.push(Duration::ZERO, action);
    Ok(plan)
}

/// Runs `plan` against `sink`, honouring each step's delay.
///
/// # Errors
///
/// Stops at and returns the first [`ShareError`] from `sink`.
pub async fn execute(plan: &SharePlan, sink: &dyn ShareSink) -> Result<(), ShareError> {
    for step in &plan.steps {
        if !step.delay.is_zero() {
            tokio::time::sleep(step.delay).await;
        }
        match &step.action {
            ShareAction::OpenUrl { platform, url } => {
                log::debug!("Opening {} share link", platform.label());
                sink.open_url(*platform, url)?;
            }
            ShareAction::CopyToClipboard {
                platform,
                text,
                notice,
            } => {
                log::debug!("Copying {} share text", platform.label());
                sink.copy_to_clipboard(*platform, text, notice)?;
            }
        }
    }
    Ok(())
}
