pub mod closes;
pub mod stats;
