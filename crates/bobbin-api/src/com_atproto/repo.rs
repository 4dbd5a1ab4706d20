pub mod create_record;
pub mod strong_ref;
