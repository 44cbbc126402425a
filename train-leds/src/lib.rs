//! Live train positions on an LED map.
//!
//! Polls the Metra positions feed, places every train on the nearest LED of
//! a surveyed strip layout, and renders the result as a console strip and
//! as commands for a physical LED controller.

pub mod app;
pub mod config;
pub mod cycle;
pub mod domain;
pub mod feed;
pub mod geo;
pub mod geometry;
pub mod matching;
pub mod render;
pub mod sink;
pub mod web;
