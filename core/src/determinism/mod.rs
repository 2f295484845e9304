pub mod fingerprint;
pub mod json_canonical;
