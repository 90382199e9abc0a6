pub mod observability;
pub mod processors;
pub mod storage;
pub mod vision;
