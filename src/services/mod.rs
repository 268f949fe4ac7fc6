pub mod archive;
pub mod relay;
pub mod scratch;
pub mod skip_rules;
pub mod source;
