mod local_working_store;

pub use local_working_store::LocalWorkingStore;
