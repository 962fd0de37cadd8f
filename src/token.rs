// src/token.rs
//! Name/token checksum shared by the link generator and the landing page.
//!
//! Not a credential: 32-bit rolling hash with a salt that ships in every page.
//! The exact arithmetic has to stay as it is or links already handed out stop
//! validating.

pub const SECRET: &str = "valentine-secret-2024";

/// `hash * 31 + unit` over the UTF-16 code units of `name + SECRET`,
/// wrapping as a signed 32-bit integer, printed as `|hash|` in lowercase hex.
pub fn generate_token(name: &str) -> String {
    let hash = name
        .encode_utf16()
        .chain(SECRET.encode_utf16())
        .fold(0i32, |hash, unit| {
            hash.wrapping_shl(5)
                .wrapping_sub(hash)
                .wrapping_add(i32::from(unit))
        });
    format!("{:x}", hash.unsigned_abs())
}

pub fn validate_token(name: &str, supplied: &str) -> bool {
    supplied == generate_token(name)
}
