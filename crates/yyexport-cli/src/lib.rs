//! yyexport CLI library.
//!
//! Manifest loading, file-backed texture resolution, output writing and the
//! command implementations behind the `yyexport` binary.

pub mod commands;
pub mod manifest;
pub mod output;
pub mod textures;
