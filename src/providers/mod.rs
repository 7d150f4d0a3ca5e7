pub mod dynect;
pub mod http;
pub mod ultradns;
