//! Resource capability flags.
//!
//! A [`Capabilities`] value decides which resource clients a [`Client`](crate::Client)
//! may hand out. Provider differences (OpenAI vs. GooseAI) are expressed as
//! different capability sets rather than different client types.

use std::{collections::BTreeMap, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::errors::ValidationError;

/// A resource group that can be enabled or disabled per client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    Completions,
    Edits,
    Embeddings,
    Files,
    FineTunes,
    Images,
    Models,
    Engines,
    Moderations,
}

impl Capability {
    pub const ALL: [Capability; 9] = [
        Capability::Completions,
        Capability::Edits,
        Capability::Embeddings,
        Capability::Files,
        Capability::FineTunes,
        Capability::Images,
        Capability::Models,
        Capability::Engines,
        Capability::Moderations,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Capability::Completions => "completions",
            Capability::Edits => "edits",
            Capability::Embeddings => "embeddings",
            Capability::Files => "files",
            Capability::FineTunes => "fine_tunes",
            Capability::Images => "images",
            Capability::Models => "models",
            Capability::Engines => "engines",
            Capability::Moderations => "moderations",
        }
    }

    const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Capability {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        Capability::ALL
            .into_iter()
            .find(|cap| cap.as_str() == name)
            .ok_or_else(|| {
                ValidationError::new(format!("unknown capability {name:?}"))
                    .with_field("capabilities")
            })
    }
}

/// Everything enabled except the legacy `engines` resource.
pub const DEFAULT_CAPABILITIES: Capabilities = Capabilities {
    flags: [true, true, true, true, true, true, true, false, true],
};

/// Fixed set of capability flags, read-only once a client is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    try_from = "BTreeMap<String, bool>",
    into = "BTreeMap<String, bool>"
)]
pub struct Capabilities {
    flags: [bool; 9],
}

impl Default for Capabilities {
    fn default() -> Self {
        DEFAULT_CAPABILITIES
    }
}

impl Capabilities {
    pub const fn none() -> Self {
        Self { flags: [false; 9] }
    }

    /// GooseAI serves completions and the `engines` catalog only.
    pub const fn goose_ai() -> Self {
        Self::none()
            .with(Capability::Completions, true)
            .with(Capability::Engines, true)
    }

    pub const fn with(mut self, capability: Capability, enabled: bool) -> Self {
        self.flags[capability.index()] = enabled;
        self
    }

    pub const fn enable(self, capability: Capability) -> Self {
        self.with(capability, true)
    }

    pub const fn disable(self, capability: Capability) -> Self {
        self.with(capability, false)
    }

    pub const fn is_enabled(&self, capability: Capability) -> bool {
        self.flags[capability.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (Capability, bool)> + '_ {
        Capability::ALL.into_iter().map(|cap| (cap, self.is_enabled(cap)))
    }

    /// Applies name -> flag overrides on top of [`DEFAULT_CAPABILITIES`].
    ///
    /// Names missing from the map keep their default; unknown names are rejected.
    pub fn from_names<I, K>(entries: I) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = (K, bool)>,
        K: AsRef<str>,
    {
        let mut caps = DEFAULT_CAPABILITIES;
        for (name, enabled) in entries {
            caps = caps.with(name.as_ref().parse()?, enabled);
        }
        Ok(caps)
    }
}

impl FromIterator<(Capability, bool)> for Capabilities {
    fn from_iter<T: IntoIterator<Item = (Capability, bool)>>(iter: T) -> Self {
        iter.into_iter()
            .fold(DEFAULT_CAPABILITIES, |caps, (cap, enabled)| caps.with(cap, enabled))
    }
}

impl TryFrom<BTreeMap<String, bool>> for Capabilities {
    type Error = ValidationError;

    fn try_from(map: BTreeMap<String, bool>) -> Result<Self, Self::Error> {
        Capabilities::from_names(map)
    }
}

impl From<Capabilities> for BTreeMap<String, bool> {
    fn from(caps: Capabilities) -> Self {
        caps.iter()
            .map(|(cap, enabled)| (cap.as_str().to_string(), enabled))
            .collect()
    }
}
