mod app;
mod config;
mod error;
mod helpers;
mod host;
mod loopback;
mod proxy;
mod scenarios;
