pub mod agents;
pub mod serve;
pub mod webset;
