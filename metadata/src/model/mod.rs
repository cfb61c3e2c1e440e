//! The metadata model: data sets of decoded elements,
//! and their grouping into instances, series and studies.

mod dataset;
mod element;
mod instance;
mod sequence;
mod series;
mod study;

pub use self::dataset::DataSet;
pub use self::element::{Element, PersonName, Scalar, Value, ValueRef};
pub use self::instance::Instance;
pub use self::sequence::{Sequence, SequenceItem};
pub use self::series::Series;
pub use self::study::{SeriesOrder, Study, UnknownSeriesOrder};
