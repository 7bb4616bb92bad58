pub mod band;
pub mod chart;
pub mod config;
pub mod feed;
pub mod http_cache;
pub mod http_client;
pub mod scale;
pub mod scoreboard;
pub mod standings;
pub mod state;
pub mod surface;
pub mod svg;
pub mod teams;
