pub mod contact;
pub mod health;

pub use contact::{ContactRequest, ContactResponse, Submission};
pub use health::HealthResponse;
