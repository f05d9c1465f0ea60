pub mod favorites;
pub mod store;

pub use favorites::FavoriteStore;
pub use store::{StoreMessage, WeatherStore};
