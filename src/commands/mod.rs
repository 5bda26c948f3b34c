pub mod add;
pub mod delete;
pub mod query;

#[cfg(test)]
pub mod testing;
