pub mod appearance;
pub mod keyboard;
pub mod skylight;
