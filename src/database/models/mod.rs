pub mod complex;
pub mod contact_info;
pub mod notification;
pub mod user;

pub use complex::{Building, Complex, ComplexPatch, NewBuilding, NewComplex};
pub use contact_info::{ContactFields, ContactInfoRecord, NewContactInfo};
pub use notification::{NewNotification, Notification};
pub use user::{BuildingMembership, NewUser, User};
