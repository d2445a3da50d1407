//! Capability descriptor
//!
//! Which parts of a [`Notification`](crate::domain::Notification) a backend honors.

use std::collections::BTreeSet;
use std::fmt;

/// Notification functionality a platform may support
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Capability {
    /// Custom app name
    AppName,
    Title,
    Message,
    /// Different urgency levels
    Urgency,
    /// Custom icons
    Icon,
    /// Icons from a user-provided file
    IconFile,
    /// Named system icons
    IconName,
    /// At least two buttons
    Buttons,
    ReplyField,
    /// Attachments; allowed file types vary by platform
    Attachment,
    OnDispatched,
    /// Telling a user close apart from a programmatic clear
    OnCleared,
    OnClicked,
    OnDismissed,
    /// Custom sounds
    Sound,
    /// Sounds from a user-provided file
    SoundFile,
    /// Named system sounds
    SoundName,
    /// Grouping notifications by thread
    Thread,
    Timeout,
}

impl Capability {
    pub const ALL: [Capability; 19] = [
        Self::AppName,
        Self::Title,
        Self::Message,
        Self::Urgency,
        Self::Icon,
        Self::IconFile,
        Self::IconName,
        Self::Buttons,
        Self::ReplyField,
        Self::Attachment,
        Self::OnDispatched,
        Self::OnCleared,
        Self::OnClicked,
        Self::OnDismissed,
        Self::Sound,
        Self::SoundFile,
        Self::SoundName,
        Self::Thread,
        Self::Timeout,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::AppName => "app_name",
            Self::Title => "title",
            Self::Message => "message",
            Self::Urgency => "urgency",
            Self::Icon => "icon",
            Self::IconFile => "icon_file",
            Self::IconName => "icon_name",
            Self::Buttons => "buttons",
            Self::ReplyField => "reply_field",
            Self::Attachment => "attachment",
            Self::OnDispatched => "on_dispatched",
            Self::OnCleared => "on_cleared",
            Self::OnClicked => "on_clicked",
            Self::OnDismissed => "on_dismissed",
            Self::Sound => "sound",
            Self::SoundFile => "sound_file",
            Self::SoundName => "sound_name",
            Self::Thread => "thread",
            Self::Timeout => "timeout",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An immutable set of capabilities
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Capabilities(BTreeSet<Capability>);

impl Capabilities {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn contains(&self, capability: Capability) -> bool {
        self.0.contains(&capability)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = Capability> + '_ {
        self.0.iter().copied()
    }

    /// A copy with `capability` added
    pub fn with(mut self, capability: Capability) -> Self {
        self.0.insert(capability);
        self
    }

    /// A copy with `capability` removed
    pub fn without(mut self, capability: Capability) -> Self {
        self.0.remove(&capability);
        self
    }
}

impl FromIterator<Capability> for Capabilities {
    fn from_iter<I: IntoIterator<Item = Capability>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<const N: usize> From<[Capability; N]> for Capabilities {
    fn from(capabilities: [Capability; N]) -> Self {
        capabilities.into_iter().collect()
    }
}

impl fmt::Display for Capabilities {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.0.iter().map(Capability::as_str).collect();
        write!(f, "{}", names.join(", "))
    }
}
