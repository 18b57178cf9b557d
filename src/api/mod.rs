pub mod client;
pub mod normalize;
pub mod results;
pub mod surveys;
