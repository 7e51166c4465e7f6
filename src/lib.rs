pub mod cli;
pub mod error;
pub mod model;
pub mod output;
pub mod proc_net;
pub mod process;
pub mod resolver;
