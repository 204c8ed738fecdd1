//! One module per action group. Each handler performs its store operation and returns
//! the TEXT body shown to the citizen.

pub mod forms;
pub mod garbage;
pub mod parks;
