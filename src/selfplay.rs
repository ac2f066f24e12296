//! Self-play training: driver, label synthesis, exploration schedule, session

pub mod driver;
pub mod labels;
pub mod schedule;
pub mod session;

pub use driver::{Driver, DriverConfig, FinishedGame, MoveRecord};
pub use labels::{LabelValues, TrainingExample, synthesize};
pub use schedule::ExplorationSchedule;
pub use session::{Session, SessionConfig, TrainingResult};
