//! Data models for marketplace entities.
//!
//! This module contains the wire-shape structs the backend returns:
//!
//! - `Gym`, `Coach`: marketplace listings
//! - `Course`, `Exercise`: a coach's programs with embedded exercises
//! - `Reel`: short user videos with base64 or URL payloads
//! - `Event`: upcoming events
//! - `PaymentRequest`/`PaymentResponse`, `UserUpdate`: submitted forms

pub mod coach;
pub mod course;
pub mod event;
pub mod gym;
pub mod payment;
pub mod reel;
pub mod user;

pub use coach::Coach;
pub use course::{Course, Exercise};
pub use event::Event;
pub use gym::Gym;
pub use payment::{PaymentRequest, PaymentResponse};
pub use reel::Reel;
pub use user::UserUpdate;
