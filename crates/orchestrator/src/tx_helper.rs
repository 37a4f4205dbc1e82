pub mod calls;
pub mod client;
pub mod events;
pub mod submit;
