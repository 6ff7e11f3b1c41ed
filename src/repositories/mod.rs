pub mod detail_cache;
pub mod filter_store;
pub mod geolocation;
pub mod google_places_repo;
pub mod liked_store;
