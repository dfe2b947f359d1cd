// Adapters layer: concrete implementations of the domain ports (HTTP source, local storage).

pub mod http;
pub mod storage;
