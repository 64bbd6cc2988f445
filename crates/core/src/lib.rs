pub mod field;
pub mod numeric;
pub mod reading;

pub use field::Field;
pub use numeric::{is_unsigned_decimal, NumericToken};
pub use reading::{CompleteReadings, ReadingsError, SensorReadings};
