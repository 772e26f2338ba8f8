pub mod secret;
pub mod snowflake;
pub mod validation;
