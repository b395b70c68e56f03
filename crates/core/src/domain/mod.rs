pub mod record;
pub mod supplier;
