pub mod push;
pub mod store;
pub mod time;

pub use push::{DeliveryError, PushSender};
pub use store::{RegistrationStore, StoreError};
pub use time::TimeProvider;
