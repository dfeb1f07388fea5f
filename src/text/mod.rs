//! Text preparation and registry-driven matching.

pub mod matcher;
pub mod normalize;

pub use matcher::{find_candidates, Matcher, TechMatch, Token, MAX_WINDOW};
pub use normalize::{looks_like_code, normalize, strip_code_noise};
