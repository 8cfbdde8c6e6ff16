pub mod edge_store;
