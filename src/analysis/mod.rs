pub mod booking;
pub mod event;
pub mod handler;
pub mod keys;
pub mod regions;
pub mod registry;
pub mod systematics;
pub mod variables;
