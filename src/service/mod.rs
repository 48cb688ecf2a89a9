pub mod stations;
