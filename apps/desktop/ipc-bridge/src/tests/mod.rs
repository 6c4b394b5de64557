mod capabilities;
mod error;
mod logger;
