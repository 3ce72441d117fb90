//! Command implementations for the assetpack CLI

pub mod build;
pub mod completions;
pub mod compress;
pub mod helpers;
pub mod list;
pub mod manifest;
pub mod status;
pub mod version;
