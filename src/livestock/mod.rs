pub mod gestation;
pub mod herd;
pub mod types;

pub use gestation::GestationStatus;
pub use herd::{HerdBucket, HerdSummary};
pub use types::{
    Animal, Category, Gender, LactationPeriod, ReproductiveEvent, ReproductiveEventType,
};
