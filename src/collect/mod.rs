pub mod round;

pub use round::CollectionRound;
