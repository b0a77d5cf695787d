pub mod complex_service;
pub mod contact_info_service;
pub mod error;
pub mod notification_service;
pub mod user_service;

pub use complex_service::ComplexService;
pub use contact_info_service::ContactInfoService;
pub use error::ServiceError;
pub use notification_service::NotificationService;
pub use user_service::UserService;
