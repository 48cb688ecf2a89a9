pub mod stations;

#[cfg(test)]
pub mod fixtures;
