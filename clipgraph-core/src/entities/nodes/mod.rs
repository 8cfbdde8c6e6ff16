pub mod node_store;
