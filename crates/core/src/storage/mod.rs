pub mod auth;
pub mod cloud;
pub mod local;
pub mod memory;
pub mod record;
pub mod subscription;
pub mod traits;
