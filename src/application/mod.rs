pub mod use_cases;

pub use use_cases::admin_auth::AdminAuthUseCase;
pub use use_cases::upload_intake::UploadIntakeUseCase;
