//! Deterministic resource id generation.
//!
//! Project files reference frames, keyframes and layers by GUID. The ids are
//! derived from a seed string with BLAKE3 so that converting the same game
//! data twice yields byte-identical project files:
//!
//! ```text
//! id = guid(BLAKE3(seed)[0..16])
//! ```

/// Derives a GUID-formatted id from a seed string.
///
/// The first 16 bytes of the BLAKE3 hash are rendered as lowercase
/// `8-4-4-4-12` hex groups. Distinct seeds give distinct ids for every
/// practical purpose; uniqueness of the seeds themselves is the caller's job.
///
/// # Example
/// ```
/// use yyexport_spec::generate_id;
///
/// let id = generate_id("spr_player.0");
/// assert_eq!(id.len(), 36);
/// assert_eq!(id, generate_id("spr_player.0"));
/// ```
pub fn generate_id(seed: &str) -> String {
    let hash = blake3::hash(seed.as_bytes());
    let b = hash.as_bytes();
    format!(
        "{:02x}{:02x}{:02x}{:02x}-{:02x}{:02x}-{:02x}{:02x}-{:02x}{:02x}-{:02x}{:02x}{:02x}{:02x}{:02x}{:02x}",
        b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7],
        b[8], b[9], b[10], b[11], b[12], b[13], b[14], b[15]
    )
}
