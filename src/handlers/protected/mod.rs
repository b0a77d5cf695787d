// handlers/protected/mod.rs - Protected handlers (JWT authentication required)
//
// Every handler here runs behind `jwt_auth_middleware` and receives the
// caller as an `Extension<Actor>`, which it passes on to the services.
pub mod auth;
pub mod complexes;
pub mod contact_info;
pub mod notifications;
pub mod users;

pub use auth::whoami;
pub use complexes::{building_create, building_delete, complex_create, complex_delete, complex_update};
pub use contact_info::{
    contact_info_create, contact_info_create_for_building, contact_info_delete, contact_info_update,
};
pub use notifications::{notification_create, notification_delete, notification_list};
pub use users::user_create;
