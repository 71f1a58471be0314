pub mod anomaly;
pub mod cell;
pub mod sheet;
pub mod signals;

pub use anomaly::{
    Anomaly, AnomalyEntry, AnomalyMap, AnomalyMetadata, AnomalyType, CellKey, Severity,
};
pub use cell::CellValue;
pub use sheet::{
    Row, Sheet, Workbook, CONTRACT_COLUMN_INDEX, FILE_COLUMN_INDEX, FIRST_EDITABLE_INDEX,
};
pub use signals::{
    FieldSignalMap, FieldStatus, ModificationRecord, ModificationType, RowSignalMap, RowStatus,
    SignalMaps,
};
