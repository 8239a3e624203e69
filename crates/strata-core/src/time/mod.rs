//! Time interval algebra and julian-day conversions.

mod julian;
mod ops;
mod period;

pub use julian::{
    datetime_to_fractional_julian_day, datetime_to_julian_day, fractional_julian_day_to_datetime,
    julian_day_to_datetime,
};
pub use ops::{envelop, fuse_successive, holes};
pub use period::Period;
