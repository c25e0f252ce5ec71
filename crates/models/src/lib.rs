pub mod errors;
pub mod db;
pub mod incident;
pub mod user;

#[cfg(test)]
mod tests;
