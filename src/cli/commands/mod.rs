pub mod detect;
pub mod policy;
pub mod token;
