//! Domain model: users, addresses and request bodies

mod address;
mod request;
mod user;

pub use address::Address;
pub use request::{CreateUserRequest, NewUser, UpdateUserRequest, UserChanges, ValidationError};
pub use user::{Gender, UnknownVariant, User, UserField, UserStatus, UserType};
