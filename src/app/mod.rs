// Application layer: file-driven workflows built on the engine.

pub mod batch;
