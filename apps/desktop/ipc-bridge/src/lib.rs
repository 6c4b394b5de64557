// Library exports for testing
// The binary (main.rs) imports these as well

pub mod capabilities;
pub mod error;
pub mod logger;
pub mod paths;
pub mod smoke;

#[cfg(test)]
mod tests;
