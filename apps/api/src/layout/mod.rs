// Text layout: greedy wrap and the card layout strategies.
// Everything here is pure; shaping and rasterization live in `render`.

pub mod strategy;
pub mod wrap;

pub use strategy::LayoutStrategy;
