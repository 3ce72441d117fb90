//! Build target platforms
//!
//! The platform only selects the output directory name; packaging itself is
//! platform independent.

use std::fmt;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Target platform for a packaging run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Android,
    #[value(name = "ios")]
    #[serde(rename = "ios")]
    IOs,
    Windows,
    Windows64,
    #[value(name = "osx", alias = "macos")]
    #[serde(rename = "osx")]
    Osx,
}

impl Platform {
    /// Directory name used under the output root
    pub fn target_name(self) -> &'static str {
        match self {
            Platform::Android => "Android",
            Platform::IOs => "iOS",
            Platform::Windows => "Windows",
            Platform::Windows64 => "Windows64",
            Platform::Osx => "OSX",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.target_name())
    }
}
