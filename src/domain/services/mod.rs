//! Domain services - pure logic over entities, no I/O

pub mod suite;
