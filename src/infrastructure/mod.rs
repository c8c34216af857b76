pub mod container;
pub mod database;
pub mod external_services;
pub mod memory;

pub use container::AppContainer;
