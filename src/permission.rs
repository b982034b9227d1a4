//! Motion-sensor capability gate
//!
//! Some platforms only deliver orientation events after the user grants an
//! explicit permission. The probe is synchronous; the request blocks until
//! the platform answers.

use std::time::Duration;

use crossbeam_channel::{Receiver, Sender, bounded};
use serde::Serialize;

use crate::error::{Result, TiltError};

/// Platform answer to a permission request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionStatus {
    Granted,
    Denied,
    /// The user dismissed the prompt without choosing
    Default,
}

impl std::str::FromStr for PermissionStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim() {
            "granted" => Ok(Self::Granted),
            "denied" => Ok(Self::Denied),
            "default" => Ok(Self::Default),
            other => Err(format!("unknown permission status: {}", other)),
        }
    }
}

/// Platform permission capability
pub trait PermissionProvider {
    /// Whether orientation events are gated behind an explicit grant
    fn requires_permission(&self) -> bool;

    /// Ask the platform for access, blocking until it answers
    fn request_permission(&mut self) -> Result<PermissionStatus>;
}

/// Platforms that deliver orientation events unconditionally
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPermissionRequired;

impl PermissionProvider for NoPermissionRequired {
    fn requires_permission(&self) -> bool {
        false
    }

    fn request_permission(&mut self) -> Result<PermissionStatus> {
        Ok(PermissionStatus::Granted)
    }
}

/// Permission answered by the host over a channel
///
/// `request_permission` sends a prompt on the request channel and waits for
/// the host's reply. A closed reply channel or an expired timeout is an error.
/// A prompt left unread by a timed-out request is withdrawn before the next one.
pub struct ChannelPermission {
    prompt_tx: Sender<()>,
    unread_prompts: Receiver<()>,
    reply_rx: Receiver<PermissionStatus>,
    timeout: Option<Duration>,
}

/// Host side of a `ChannelPermission`
pub struct PermissionPrompter {
    pub prompts: Receiver<()>,
    pub replies: Sender<PermissionStatus>,
}

impl ChannelPermission {
    pub fn new(timeout: Option<Duration>) -> (Self, PermissionPrompter) {
        let (prompt_tx, prompt_rx) = bounded(1);
        let (reply_tx, reply_rx) = bounded(1);
        (
            Self {
                prompt_tx,
                unread_prompts: prompt_rx.clone(),
                reply_rx,
                timeout,
            },
            PermissionPrompter {
                prompts: prompt_rx,
                replies: reply_tx,
            },
        )
    }
}

impl PermissionProvider for ChannelPermission {
    fn requires_permission(&self) -> bool {
        true
    }

    fn request_permission(&mut self) -> Result<PermissionStatus> {
        // Drop any stale prompt or answer from an abandoned earlier request
        while self.unread_prompts.try_recv().is_ok() {}
        while self.reply_rx.try_recv().is_ok() {}

        self.prompt_tx
            .try_send(())
            .map_err(|e| TiltError::PermissionUnavailable(format!("prompt not delivered: {}", e)))?;

        match self.timeout {
            Some(timeout) => self
                .reply_rx
                .recv_timeout(timeout)
                .map_err(|e| TiltError::PermissionUnavailable(e.to_string())),
            None => self
                .reply_rx
                .recv()
                .map_err(|e| TiltError::PermissionUnavailable(e.to_string())),
        }
    }
}

/// Tracks whether orientation events may be consumed
#[derive(Debug, Clone, Copy)]
pub struct CapabilityGate {
    requires_permission: bool,
    granted: bool,
}

impl CapabilityGate {
    /// Probe the platform once
    pub fn probe(provider: &dyn PermissionProvider) -> Self {
        Self {
            requires_permission: provider.requires_permission(),
            granted: false,
        }
    }

    /// Gate for a platform that never asks
    pub fn open() -> Self {
        Self {
            requires_permission: false,
            granted: true,
        }
    }

    pub fn is_open(&self) -> bool {
        !self.requires_permission || self.granted
    }

    pub fn requires_permission(&self) -> bool {
        self.requires_permission
    }

    /// Request access and record the outcome
    ///
    /// Never fails: a denial or platform error leaves the gate closed and is
    /// logged. Returns whether the gate is open afterwards.
    pub fn request(&mut self, provider: &mut dyn PermissionProvider) -> bool {
        if !self.requires_permission {
            self.granted = true;
            return true;
        }

        match provider.request_permission() {
            Ok(PermissionStatus::Granted) => {
                log::info!("Motion permission granted");
                self.granted = true;
            }
            Ok(status) => {
                log::warn!("Motion permission not granted: {:?}", status);
            }
            Err(e) => {
                log::error!("Error requesting motion permission: {}", e);
            }
        }
        self.granted
    }
}
