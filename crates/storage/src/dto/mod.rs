pub mod common;
pub mod weight_record;
