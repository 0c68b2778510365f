//! Инфраструктурный слой вокруг движка:
//! - RNG-реализации для тасовки колоды;
//! - генерация id партий.

pub mod ids;
pub mod rng;

pub use ids::new_game_id;
pub use rng::*;
