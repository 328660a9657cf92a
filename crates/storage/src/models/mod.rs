mod weight_record;

pub use weight_record::{NewWeightRecord, WeightRecord};
