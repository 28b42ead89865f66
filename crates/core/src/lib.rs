pub mod confidence;
pub mod geometry;
pub mod line;
pub mod result;

pub use confidence::{round2, to_percent};
pub use geometry::{BoundingPolygon, Point};
pub use line::RecognizedLine;
pub use result::{
    ExtractionResult, MeasurementEntry, MeasurementResult, SanitizedLine, UnknownValue,
    NO_TEXT_MESSAGE,
};
