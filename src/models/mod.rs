pub mod card;
pub mod filter;
pub mod google_places;
pub mod restaurant;
