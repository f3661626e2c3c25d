//! Two-party conversations between assistant instances.

pub mod driver;
pub mod interrupt;
pub mod speaker;
pub mod turn;

pub use driver::{
    ConversationDriver, ConversationEvent, ConversationOptions, ConversationReport, DriverState,
};
pub use interrupt::Interrupt;
pub use speaker::{Personality, Seat, Speaker};
pub use turn::Turn;
