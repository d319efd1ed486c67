pub mod compare;
pub mod explain;
pub mod export;
pub mod resistance;
pub mod scenario;
pub mod simulate;
