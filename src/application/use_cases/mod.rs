pub mod admin_auth;
pub mod filename;
pub mod upload_intake;
