use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Language level the parser accepts. Constructs newer than the selected
/// version are rejected as unexpected tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub enum PhpVersion {
    #[serde(rename = "5.3")]
    Php53,
    #[serde(rename = "5.4")]
    Php54,
    #[serde(rename = "5.5")]
    Php55,
    #[serde(rename = "5.6")]
    Php56,
    #[default]
    #[serde(rename = "7.0")]
    Php70,
}

/// Syntax that only exists from a given version on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feature {
    BinaryLiterals,
    ShortArraySyntax,
    Traits,
    CallableTypeHint,
    StaticClosures,
    Finally,
    Generators,
    ClassNameResolution,
    Variadics,
    ArgumentUnpacking,
    PowOperator,
    ScalarTypeHints,
    ReturnTypes,
    NullCoalescing,
    SpaceshipOperator,
}

impl Feature {
    pub fn min_version(self) -> PhpVersion {
        match self {
            Feature::BinaryLiterals
            | Feature::ShortArraySyntax
            | Feature::Traits
            | Feature::CallableTypeHint
            | Feature::StaticClosures => PhpVersion::Php54,
            Feature::Finally | Feature::Generators | Feature::ClassNameResolution => PhpVersion::Php55,
            Feature::Variadics | Feature::ArgumentUnpacking | Feature::PowOperator => PhpVersion::Php56,
            Feature::ScalarTypeHints
            | Feature::ReturnTypes
            | Feature::NullCoalescing
            | Feature::SpaceshipOperator => PhpVersion::Php70,
        }
    }
}

impl PhpVersion {
    pub fn supports(self, feature: Feature) -> bool {
        self >= feature.min_version()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PhpVersion::Php53 => "5.3",
            PhpVersion::Php54 => "5.4",
            PhpVersion::Php55 => "5.5",
            PhpVersion::Php56 => "5.6",
            PhpVersion::Php70 => "7.0",
        }
    }
}

impl fmt::Display for PhpVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unsupported PHP version `{0}`")]
pub struct UnknownVersion(pub String);

impl FromStr for PhpVersion {
    type Err = UnknownVersion;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "5.3" => Ok(PhpVersion::Php53),
            "5.4" => Ok(PhpVersion::Php54),
            "5.5" => Ok(PhpVersion::Php55),
            "5.6" => Ok(PhpVersion::Php56),
            "7.0" | "7" => Ok(PhpVersion::Php70),
            other => Err(UnknownVersion(other.to_string())),
        }
    }
}
